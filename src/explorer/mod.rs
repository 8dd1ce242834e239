//! Tools for exploring the state space

mod graph;
mod presentation;

use crate::{
	format::parse_puzzle,
	layout::{LayoutOptions, LayoutSolver},
	puzzle::Puzzle,
};
use std::io::Write;

pub use graph::{
	ExplorationSummary, ExplorerOptions, StateEdge, StateEdgeId, StateGraph, StateNode,
	StateNodeId,
};

/// Builds the graph of every state of a puzzle reachable within `options.max_depth` actions
pub fn explore(puzzle: &Puzzle, options: ExplorerOptions) -> StateGraph {
	StateGraph::traverse_state_graph(puzzle, options)
}

/// Layout steps run before a report is written, if the layout does not settle sooner
const MAX_LAYOUT_STEPS: usize = 5000;

/// Parses a puzzle definition, explores its state space
/// and writes a report including a settled layout of the state graph
pub fn run_state_explorer(
	puzzle_source: &str,
	output: &mut impl Write,
	options: ExplorerOptions,
) -> Result<(), String> {
	let puzzle = parse_puzzle(puzzle_source).map_err(|e| format!("Could not read puzzle: {e}"))?;
	let graph = explore(&puzzle, options);

	let mut layout = LayoutSolver::new(&graph, LayoutOptions::default());
	for _ in 0..MAX_LAYOUT_STEPS {
		if layout.step() {
			break;
		}
	}
	if !layout.is_stabilized() {
		log::info!("Layout did not settle after {MAX_LAYOUT_STEPS} steps");
	}

	graph
		.write_report(&puzzle, Some(&layout), output)
		.map_err(|e| format!("Could not save explorer result: {e}"))
}
