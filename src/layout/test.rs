use super::*;
use crate::{puzzle::NodeId, state::PuzzleState, transitions::ActionKind};

const EPSILON: f64 = 1e-9;

/// Builds a graph from `(from, to, direct)` edges between `count` states
fn graph(count: usize, edges: &[(usize, usize, bool)]) -> StateGraph {
	let mut graph = StateGraph::default();
	for step in 0..count {
		graph.insert_node(PuzzleState::default(), step);
	}
	for &(from, to, direct) in edges {
		graph.connect(
			StateNodeId(from),
			StateNodeId(to),
			ActionKind::Walk,
			NodeId(0),
			direct,
		);
	}
	graph
}

/// Start with two children that are also connected to each other
fn triangle() -> StateGraph {
	graph(3, &[(0, 1, true), (0, 2, true), (1, 2, false)])
}

fn chain() -> StateGraph {
	graph(4, &[(0, 1, true), (1, 2, true), (2, 3, true)])
}

/// States in a row, each discovered by the previous one
fn line(count: usize) -> StateGraph {
	let edges = (1..count).map(|i| (i - 1, i, true)).collect::<Vec<_>>();
	graph(count, &edges)
}

/// A square grid discovered along its first row, then down every column
fn grid(size: usize) -> StateGraph {
	let index = |x: usize, y: usize| y * size + x;
	let mut edges = Vec::new();
	for y in 0..size {
		for x in 0..size {
			if x + 1 < size {
				edges.push((index(x, y), index(x + 1, y), y == 0));
			}
			if y + 1 < size {
				edges.push((index(x, y), index(x, y + 1), true));
			}
		}
	}
	graph(size * size, &edges)
}

fn frozen() -> LayoutOptions {
	LayoutOptions {
		frame_budget: Duration::ZERO,
		..Default::default()
	}
}

fn assert_close(a: DVec2, b: DVec2) {
	assert!(a.distance(b) < EPSILON, "{a} != {b}");
}

#[test]
fn seeding_fans_children_out() {
	let solver = LayoutSolver::seeded(&triangle(), frozen(), ViewFrame::default());
	assert_eq!(solver.phase(), LayoutPhase::Seeding);
	let half = 3.0_f64.sqrt() / 2.0;
	assert_close(solver.point(StateNodeId(0)).unwrap(), DVec2::ZERO);
	assert_close(solver.point(StateNodeId(1)).unwrap(), DVec2::new(0.5, -half));
	assert_close(solver.point(StateNodeId(2)).unwrap(), DVec2::new(0.5, half));
}

#[test]
fn distances_ignore_direction_and_are_capped() {
	let graph = graph(4, &[(0, 1, true), (0, 2, true), (1, 2, false)]);
	let distances = ideal_distances(&graph, 200.0);
	let at = |i: usize, j: usize| distances[i * 4 + j];
	assert_eq!(at(2, 1), 1.0);
	assert_eq!(at(1, 0), 1.0);
	assert_eq!(at(0, 3), 200.0);
	assert_eq!(ideal_distances(&chain(), 2.0)[3], 2.0);
}

#[test]
fn triangle_converges_to_unit_sides() {
	let mut solver = LayoutSolver::seeded(&triangle(), frozen(), ViewFrame::default());
	let mut steps = 0;
	while !solver.step() {
		steps += 1;
		assert!(steps < 10_000, "layout did not stabilize");
	}
	assert_eq!(solver.phase(), LayoutPhase::Stabilized);
	for (i, j) in [(0, 1), (0, 2), (1, 2)] {
		let a = solver.point(StateNodeId(i)).unwrap();
		let b = solver.point(StateNodeId(j)).unwrap();
		assert!((a.distance(b) - 1.0).abs() < 0.05);
	}
	assert!((solver.segment_length() - 1.0).abs() < 0.05);
}

#[test]
fn relaxing_starts_after_the_first_unstable_step() {
	let mut solver = LayoutSolver::seeded(&triangle(), frozen(), ViewFrame::default());
	assert!(!solver.step());
	assert_eq!(solver.phase(), LayoutPhase::Relaxing);
}

#[test]
fn seeded_chain_is_already_at_rest() {
	let mut solver = LayoutSolver::seeded(&chain(), frozen(), ViewFrame::default());
	assert!(solver.step());
	assert!(solver.view().initialized);
}

#[test]
fn advance_spreads_relaxation_over_frames() {
	let options = LayoutOptions {
		frame_budget: Duration::from_millis(2),
		..Default::default()
	};
	let seed = LayoutSolver::seeded(&grid(16), options, ViewFrame::default());
	let mut solver = seed.clone();

	let started = Instant::now();
	solver.advance(0.016);
	assert!(started.elapsed() < Duration::from_millis(250));
	assert_eq!(solver.phase(), LayoutPhase::Relaxing);
	assert_ne!(solver.points, seed.points);

	let mut frames = 1;
	while !solver.is_stabilized() {
		solver.advance(0.016);
		frames += 1;
		assert!(frames < 100_000, "layout did not stabilize");
	}
	assert!(frames > 1);
	assert!(solver.view().initialized);

	for _ in 0..400 {
		solver.advance(0.016);
	}
	let view = solver.view();
	assert!(view.center.distance(solver.targets.center) < 1e-2);
	assert!((view.diameter - solver.targets.diameter).abs() < 1e-2);
}

#[test]
fn large_steps_are_split_into_chunks() {
	let mut solver = LayoutSolver::seeded(&line(200), frozen(), ViewFrame::default());
	let seed = solver.points.clone();
	let mut chunks = 1;
	while solver.relax_chunk().is_none() {
		assert_eq!(solver.phase(), LayoutPhase::Seeding);
		assert_eq!(solver.points, seed);
		chunks += 1;
	}
	// 19900 pairs, at least 4096 of them per chunk
	assert_eq!(chunks, 5);
	assert!(solver.is_stabilized());
}

#[test]
fn step_finishes_a_chunked_pass() {
	let mut chunked = LayoutSolver::seeded(&grid(10), frozen(), ViewFrame::default());
	let mut whole = chunked.clone();
	assert_eq!(chunked.relax_chunk(), None);
	assert_eq!(chunked.step(), whole.step());
	assert_eq!(chunked.points, whole.points);
	assert_eq!(chunked.phase(), LayoutPhase::Relaxing);
}

#[test]
fn fresh_view_snaps_to_the_layout() {
	let solver = LayoutSolver::new(&chain(), LayoutOptions::default());
	assert!(solver.is_stabilized());
	let view = solver.view();
	assert_close(view.center, DVec2::new(1.5, 0.0));
	assert!((view.diameter - 3.0).abs() < EPSILON);
	// The main axis ends up vertical
	assert_close(
		solver.projected_point(StateNodeId(0)).unwrap(),
		DVec2::new(0.0, -1.5),
	);
	assert_close(
		solver.projected_point(StateNodeId(3)).unwrap(),
		DVec2::new(0.0, 1.5),
	);
}

#[test]
fn unknown_states_have_no_point() {
	let solver = LayoutSolver::new(&chain(), LayoutOptions::default());
	assert_eq!(solver.point(StateNodeId(4)), None);
	assert_eq!(solver.projected_point(StateNodeId(17)), None);
}

#[test]
fn empty_graph_has_no_points() {
	let solver = LayoutSolver::new(&StateGraph::default(), LayoutOptions::default());
	assert_eq!(solver.projected_point(StateNodeId(0)), None);
	assert_eq!(solver.view().diameter, 0.0);
}

#[test]
fn initialized_view_waits_for_stabilization() {
	let previous = ViewFrame {
		center: DVec2::new(7.0, 7.0),
		angle: 0.25,
		diameter: 9.0,
		initialized: true,
	};
	let mut solver = LayoutSolver::seeded(&triangle(), frozen(), previous);
	solver.advance(1.0);
	assert_eq!(solver.view(), previous);

	while !solver.step() {}
	solver.advance(1.0);
	let view = solver.into_view();
	assert_ne!(view, previous);
	assert!((view.diameter - 1.0).abs() < 0.1);
}

#[test]
fn uninitialized_view_follows_right_away() {
	let mut solver = LayoutSolver::seeded(&triangle(), frozen(), ViewFrame::default());
	solver.advance(1.0);
	assert_eq!(solver.phase(), LayoutPhase::Seeding);
	assert_eq!(solver.view().center, solver.targets.center);
	assert_eq!(solver.view().diameter, solver.targets.diameter);
}

#[test]
fn view_turns_by_less_than_a_quarter() {
	let mut view = ViewFrame::default();
	view.approach(
		ViewTargets {
			angle: 3.0,
			..Default::default()
		},
		1.0,
	);
	assert!((view.angle - (3.0 - PI)).abs() < EPSILON);
}
