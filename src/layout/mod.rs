//! Force-directed layout of state graphs
//!
//! States are seeded as a tree along the edges that discovered them,
//! then relaxed so that the distance between any two states approaches
//! the length of the shortest path between them.
//! Relaxation is incremental, [`LayoutSolver::advance`] spends a bounded
//! amount of time per call and can be resumed on the next frame.

mod view;
#[cfg(test)]
mod test;

pub use view::ViewFrame;

use crate::explorer::{StateGraph, StateNodeId};
use bevy::{math::DVec2, platform::time::Instant};
use std::{collections::VecDeque, f64::consts::PI, time::Duration};
use view::ViewTargets;

/// Tuning of a [`LayoutSolver`]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LayoutOptions {
	/// Wall-clock time one call of [`LayoutSolver::advance`] may spend relaxing.
	/// A zero budget leaves the points where they are.
	pub frame_budget: Duration,
	/// Fraction of the accumulated force applied to a point per step
	pub step_multiplier: f64,
	/// The layout is stable once no squared force exceeds this
	pub stability_threshold: f64,
	/// Ideal distance of states that are not connected, and the cap of all others
	pub distance_ceiling: f64,
	/// Speed at which the view follows the layout, per second
	pub smoothing_rate: f64,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			frame_budget: Duration::from_millis(10),
			step_multiplier: 0.1,
			stability_threshold: 1e-4,
			distance_ceiling: 200.0,
			smoothing_rate: 5.0,
		}
	}
}

/// Pairs of points visited before [`LayoutSolver::advance`] checks the clock again
const PAIRS_PER_CHUNK: usize = 4096;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutPhase {
	/// Points sit where the tree seeding put them
	Seeding,
	Relaxing,
	/// Forces fell below the threshold at least once
	Stabilized,
}

/// Layout of one state graph.
/// A new solver has to be created whenever the graph is explored again.
#[derive(Clone, Debug)]
pub struct LayoutSolver {
	options: LayoutOptions,
	points: Vec<DVec2>,
	/// Scratch buffer of per-point forces
	forces: Vec<DVec2>,
	/// Ideal distances, row-major `points.len()` by `points.len()`
	distances: Vec<f64>,
	phase: LayoutPhase,
	/// Average length of the edges between neighbouring states
	segment_length: f64,
	targets: ViewTargets,
	view: ViewFrame,
	pass: RelaxationPass,
}

/// Progress through the pairs of the relaxation step in flight
#[derive(Clone, Copy, Debug, Default)]
struct RelaxationPass {
	/// Next row of the lower triangle of pairs
	row: usize,
	shape: Shape,
}

/// Measurements of the point set gathered pair by pair
#[derive(Clone, Copy, Debug, Default)]
struct Shape {
	segment_sum: f64,
	segment_count: usize,
	extreme_length: f64,
	extremes: (DVec2, DVec2),
}

impl Shape {
	fn add_pair(&mut self, a: DVec2, b: DVec2, length: f64, ideal: f64) {
		if ideal == 1.0 {
			self.segment_count += 1;
			self.segment_sum += length;
		}
		if length > self.extreme_length {
			self.extreme_length = length;
			self.extremes = (a, b);
		}
	}
}

impl LayoutSolver {
	/// Lays out a graph with a fresh view
	pub fn new(graph: &StateGraph, options: LayoutOptions) -> Self {
		Self::with_view(graph, options, ViewFrame::default())
	}

	/// Lays out a graph, continuing from the view of a previous layout.
	/// A view that was never initialized is placed on the new layout right away.
	pub fn with_view(graph: &StateGraph, options: LayoutOptions, view: ViewFrame) -> Self {
		let mut solver = Self::seeded(graph, options, view);
		solver.advance(0.0001);
		if !view.initialized {
			solver.view.snap_to(solver.targets);
		}
		solver
	}

	/// Seeds the layout without relaxing it
	pub fn seeded(graph: &StateGraph, options: LayoutOptions, view: ViewFrame) -> Self {
		let count = graph.nodes().len();
		let mut solver = Self {
			options,
			points: seed_points(graph),
			forces: vec![DVec2::ZERO; count],
			distances: ideal_distances(graph, options.distance_ceiling),
			phase: LayoutPhase::Seeding,
			segment_length: 1.0,
			targets: ViewTargets::default(),
			view,
			pass: RelaxationPass::default(),
		};
		let shape = solver.measure();
		solver.aim_view(shape);
		log::debug!("Seeded layout of {count} states");
		solver
	}

	fn distance(&self, i: usize, j: usize) -> f64 {
		self.distances[i * self.points.len() + j]
	}

	/// Runs the rest of the current relaxation step, returns whether the layout is stabilized
	pub fn step(&mut self) -> bool {
		loop {
			if let Some(stabilized) = self.relax_chunk() {
				return stabilized;
			}
		}
	}

	/// Accumulates forces over the next chunk of pairs.
	/// Once the last pair has been visited the points are moved,
	/// and the result tells whether the layout is stabilized.
	fn relax_chunk(&mut self) -> Option<bool> {
		let count = self.points.len();
		let mut visited = 0;
		while self.pass.row < count && visited < PAIRS_PER_CHUNK {
			let i = self.pass.row;
			for j in 0..i {
				let (a, b) = (self.points[i], self.points[j]);
				let vector = b - a;
				let length = vector.length();
				let ideal = self.distance(i, j);
				self.pass.shape.add_pair(a, b, length, ideal);
				if length == 0.0 {
					continue;
				}
				// Far pairs matter less than close ones, and there are more of them
				let adjust = (ideal - length) / (ideal * ideal);
				let force = vector / length * adjust;
				self.forces[i] -= force;
				self.forces[j] += force;
			}
			visited += i;
			self.pass.row += 1;
		}
		(self.pass.row == count).then(|| self.finish_pass())
	}

	fn finish_pass(&mut self) -> bool {
		let shape = std::mem::take(&mut self.pass).shape;
		self.aim_view(shape);

		let mut max_force = 0.0_f64;
		for (point, force) in self.points.iter_mut().zip(&mut self.forces) {
			*point += *force * self.options.step_multiplier;
			max_force = max_force.max(force.length_squared());
			*force = DVec2::ZERO;
		}
		if max_force < self.options.stability_threshold {
			if self.phase != LayoutPhase::Stabilized {
				log::debug!("Layout of {} states stabilized", self.points.len());
			}
			self.phase = LayoutPhase::Stabilized;
			self.view.initialized = true;
		} else if self.phase == LayoutPhase::Seeding {
			self.phase = LayoutPhase::Relaxing;
		}
		self.is_stabilized()
	}

	/// Relaxes the layout within the frame budget, then moves the view
	/// towards the layout. Until some layout seen through the view has stabilized
	/// the view follows right away, afterwards it waits for this one to stabilize.
	///
	/// A relaxation step over a large graph may be spread across several calls.
	/// Each call with a nonzero budget visits at least one chunk of pairs.
	pub fn advance(&mut self, delta_time: f64) {
		if !self.options.frame_budget.is_zero() {
			let started = Instant::now();
			loop {
				let stabilized = self.relax_chunk() == Some(true);
				if stabilized || started.elapsed() >= self.options.frame_budget {
					break;
				}
			}
		}

		if self.view.initialized && !self.is_stabilized() {
			return;
		}
		let t = (delta_time * self.options.smoothing_rate).min(1.0);
		self.view.approach(self.targets, t);
	}

	/// Measures the current points in one go
	fn measure(&self) -> Shape {
		let mut shape = Shape::default();
		for i in 0..self.points.len() {
			for j in 0..i {
				let (a, b) = (self.points[i], self.points[j]);
				shape.add_pair(a, b, a.distance(b), self.distance(i, j));
			}
		}
		shape
	}

	/// Recomputes the view targets from a measurement of the points.
	/// The farthest pair of points gives the main axis and the diameter,
	/// pairs of neighbouring states give the unit length.
	fn aim_view(&mut self, shape: Shape) {
		if shape.segment_count == 0 {
			self.targets = ViewTargets::default();
			return;
		}
		self.segment_length = shape.segment_sum / shape.segment_count as f64;
		let extremes = shape.extremes;
		let center = (extremes.0 + extremes.1) * 0.5;
		let main_axis = extremes.1 - extremes.0;
		let diameter = main_axis.length();
		let main_axis = main_axis / diameter;
		let side_axis = main_axis.perp();

		let (min, max) = self.points.iter().fold((f64::MAX, f64::MIN), |(min, max), point| {
			let offset = (*point - center).dot(side_axis);
			(min.min(offset), max.max(offset))
		});

		self.targets = ViewTargets {
			center: center + side_axis * (min + max) * 0.5,
			angle: main_axis.x.atan2(-main_axis.y),
			diameter: diameter / self.segment_length,
		};
	}

	pub fn phase(&self) -> LayoutPhase {
		self.phase
	}

	pub fn is_stabilized(&self) -> bool {
		self.phase == LayoutPhase::Stabilized
	}

	pub fn segment_length(&self) -> f64 {
		self.segment_length
	}

	pub fn view(&self) -> ViewFrame {
		self.view
	}

	/// Gives up the view so the next layout can continue from it
	pub fn into_view(self) -> ViewFrame {
		self.view
	}

	/// Raw position of a state in the layout
	pub fn point(&self, id: StateNodeId) -> Option<DVec2> {
		self.points.get(id.0).copied()
	}

	/// Position of a state as seen through the view
	pub fn projected_point(&self, id: StateNodeId) -> Option<DVec2> {
		self.point(id)
			.map(|point| self.view.project(point, self.segment_length))
	}
}

/// Places every state at unit distance from the state that discovered it,
/// fanning the children out opposite to the direction they were reached from
fn seed_points(graph: &StateGraph) -> Vec<DVec2> {
	let mut points = vec![DVec2::ZERO; graph.nodes().len()];
	let mut stack = Vec::new();
	if graph.node(graph.start()).is_some() {
		stack.push((graph.start(), DVec2::ZERO, 0.0));
	}
	while let Some((id, point, angle)) = stack.pop() {
		points[id.0] = point;
		let children = graph
			.outgoing(id)
			.filter(|(_, edge)| edge.direct_path)
			.map(|(_, edge)| edge.to)
			.collect::<Vec<_>>();
		let count = children.len() as f64;
		for (index, child) in children.into_iter().enumerate() {
			let child_angle = angle - PI + PI * 2.0 * (index as f64 + 1.0) / (count + 1.0);
			stack.push((child, point + DVec2::from_angle(child_angle), child_angle));
		}
	}
	points
}

/// Shortest path lengths between all pairs of states, ignoring edge direction,
/// capped at `ceiling`
fn ideal_distances(graph: &StateGraph, ceiling: f64) -> Vec<f64> {
	let count = graph.nodes().len();
	let mut neighbours = vec![Vec::new(); count];
	for edge in graph.edges() {
		neighbours[edge.from.0].push(edge.to.0);
		neighbours[edge.to.0].push(edge.from.0);
	}

	let mut distances = vec![ceiling; count * count];
	let mut hops = vec![None; count];
	let mut queue = VecDeque::new();
	for origin in 0..count {
		hops.fill(None);
		hops[origin] = Some(0_usize);
		queue.push_back(origin);
		while let Some(current) = queue.pop_front() {
			let Some(distance) = hops[current] else {
				continue;
			};
			distances[origin * count + current] = (distance as f64).min(ceiling);
			for &next in &neighbours[current] {
				if hops[next].is_none() {
					hops[next] = Some(distance + 1);
					queue.push_back(next);
				}
			}
		}
	}
	distances
}
