//! Defines the text presentation of puzzle state graphs

use super::graph::{StateGraph, StateNode};
use crate::{layout::LayoutSolver, puzzle::Puzzle, state::PuzzleState};
use itertools::Itertools as _;
use std::io::Write;

impl Puzzle {
	/// Short description of a state, e.g. `Player@A Ball@C | Gate A-B: Open`
	pub fn describe_state(&self, state: &PuzzleState) -> String {
		let items = self
			.items()
			.iter()
			.filter_map(|item| {
				let node = self.node(self.item_node(state, item.id)?)?;
				Some(format!("{}@{}", item.kind, node.name))
			})
			.join(" ");
		let elements = self
			.dynamic_elements()
			.iter()
			.filter_map(|element| {
				let value = self.element_value(state, element.id)?;
				Some(format!(
					"{} {}: {}",
					element.kind,
					self.container_name(element.container)?,
					element.kind.describe_value(value)
				))
			})
			.join(", ");
		if elements.is_empty() {
			items
		} else {
			format!("{items} | {elements}")
		}
	}
}

impl StateGraph {
	/// Writes the counters, then one line per state followed by its actions.
	/// Projected layout coordinates are included when a solver is given.
	pub fn write_report(
		&self,
		puzzle: &Puzzle,
		layout: Option<&LayoutSolver>,
		writer: &mut impl Write,
	) -> std::io::Result<()> {
		let summary = self.summary();
		writeln!(writer, "Puzzle: {}", puzzle.name)?;
		writeln!(writer, "States: {}", summary.state_count)?;
		writeln!(writer, "Goal states: {}", summary.goal_states)?;
		writeln!(writer, "Explored all: {}", summary.explored_all)?;
		writeln!(writer, "Longest path: {}", summary.longest_path_steps)?;
		match summary.goal_path_steps {
			Some(steps) => writeln!(writer, "Shortest solution: {steps}")?,
			None => writeln!(writer, "Shortest solution: none")?,
		}

		for node in self.nodes() {
			write!(
				writer,
				"\n#{} step {} [{}] {}",
				node.id.0,
				node.step,
				node_flags(node),
				puzzle.describe_state(&node.state)
			)?;
			if let Some(point) = layout.and_then(|layout| layout.projected_point(node.id)) {
				write!(writer, " at ({:.3}, {:.3})", point.x, point.y)?;
			}
			writeln!(writer)?;
			for (_, edge) in self.outgoing(node.id) {
				let place = puzzle
					.node(edge.action_node)
					.map_or("?", |node| node.name.as_str());
				writeln!(
					writer,
					"\t{} ({place}) -> #{}{}",
					edge.action,
					edge.to.0,
					if edge.direct_path { "" } else { " (merge)" }
				)?;
			}
		}
		Ok(())
	}
}

fn node_flags(node: &StateNode) -> String {
	[
		(node.id.0 == 0, "start"),
		(node.goal, "goal"),
		(node.goal_path, "goal path"),
		(node.stuck, "stuck"),
	]
	.into_iter()
	.filter(|(set, _)| *set)
	.map(|(_, name)| name)
	.join(", ")
}
