//! Explores the state graph by simulating every action of a puzzle

use crate::{
	puzzle::{NodeId, Puzzle},
	state::{PuzzleState, StateKey},
	transitions::{ActionKind, RuleTable},
};
use bevy::platform::collections::{hash_map::Entry, HashMap};
use std::collections::VecDeque;

/// Parameters of an exploration
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExplorerOptions {
	/// States this many steps away from the start are not expanded
	pub max_depth: usize,
}

impl Default for ExplorerOptions {
	fn default() -> Self {
		Self { max_depth: 200 }
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateNodeId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateEdgeId(pub usize);

/// A reachable state and what is known about it
#[derive(Clone, Debug)]
pub struct StateNode {
	/// Order of discovery, also the index of the node in its graph
	pub id: StateNodeId,
	pub state: PuzzleState,
	/// All players stand on goals
	pub goal: bool,
	/// The state lies on a shortest path from the start to a goal
	pub goal_path: bool,
	/// No sequence of actions leads to a goal
	pub stuck: bool,
	/// Breadth-first depth from the start state
	pub step: usize,
	pub incoming: Vec<StateEdgeId>,
	pub outgoing: Vec<StateEdgeId>,
}

/// An action leading from one state to another
#[derive(Clone, Debug)]
pub struct StateEdge {
	pub action: ActionKind,
	/// Puzzle node where the action takes place
	pub action_node: NodeId,
	pub from: StateNodeId,
	pub to: StateNodeId,
	/// True if the edge discovered its target state,
	/// false if it leads into a state discovered before
	pub direct_path: bool,
}

/// Counters describing an exploration as a whole
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ExplorationSummary {
	pub state_count: usize,
	pub goal_states: usize,
	/// False if the depth limit cut the exploration short
	pub explored_all: bool,
	pub longest_path_steps: usize,
	/// Depth of the shallowest goal, if any goal was found
	pub goal_path_steps: Option<usize>,
}

/// Graph of the state space of a puzzle
#[derive(Clone, Debug, Default)]
pub struct StateGraph {
	nodes: Vec<StateNode>,
	edges: Vec<StateEdge>,
	summary: ExplorationSummary,
}

impl StateGraph {
	/// Builds the graph of every state reachable within `options.max_depth` actions
	pub fn traverse_state_graph(puzzle: &Puzzle, options: ExplorerOptions) -> Self {
		let rules = RuleTable::new(puzzle);
		let mut graph = Self::default();
		let mut states = HashMap::<StateKey, StateNodeId>::default();
		let mut queue = VecDeque::new();
		let mut goal_nodes = Vec::new();
		graph.summary.explored_all = true;

		let start = graph.insert_node(puzzle.start_state(), 0);
		states.insert(rules.state_key(&graph.nodes[start.0].state), start);
		graph.classify(&rules, start);
		queue.push_back(start);

		while let Some(id) = queue.pop_front() {
			let node = &graph.nodes[id.0];
			if node.goal {
				goal_nodes.push(id);
				continue;
			}
			if node.step >= options.max_depth {
				graph.summary.explored_all = false;
				continue;
			}
			let step = node.step + 1;
			for transition in rules.transitions(&node.state) {
				match states.entry(rules.state_key(&transition.state)) {
					Entry::Occupied(entry) => {
						graph.connect(
							id,
							*entry.get(),
							transition.action,
							transition.action_node,
							false,
						);
					}
					Entry::Vacant(entry) => {
						let new_id = graph.insert_node(transition.state, step);
						entry.insert(new_id);
						graph.connect(
							id,
							new_id,
							transition.action,
							transition.action_node,
							true,
						);
						graph.classify(&rules, new_id);
						queue.push_back(new_id);
					}
				}
			}
		}

		let merge_sources = graph.mark_goal_paths(&goal_nodes);
		graph.clear_stuck(merge_sources);
		graph.summary.state_count = graph.nodes.len();

		if !graph.summary.explored_all {
			log::warn!(
				"Exploration of {:?} stopped at depth {}",
				puzzle.name,
				options.max_depth
			);
		}
		log::debug!(
			"Explored {} states of {:?}, {} of them goals",
			graph.summary.state_count,
			puzzle.name,
			graph.summary.goal_states
		);
		graph
	}

	pub(crate) fn insert_node(&mut self, state: PuzzleState, step: usize) -> StateNodeId {
		let id = StateNodeId(self.nodes.len());
		self.nodes.push(StateNode {
			id,
			state,
			goal: false,
			goal_path: false,
			stuck: true,
			step,
			incoming: Vec::new(),
			outgoing: Vec::new(),
		});
		id
	}

	pub(crate) fn connect(
		&mut self,
		from: StateNodeId,
		to: StateNodeId,
		action: ActionKind,
		action_node: NodeId,
		direct_path: bool,
	) -> StateEdgeId {
		let id = StateEdgeId(self.edges.len());
		self.edges.push(StateEdge {
			action,
			action_node,
			from,
			to,
			direct_path,
		});
		self.nodes[from.0].outgoing.push(id);
		self.nodes[to.0].incoming.push(id);
		id
	}

	/// Decides whether a freshly discovered node is a goal and updates the counters
	fn classify(&mut self, rules: &RuleTable, id: StateNodeId) {
		let node = &mut self.nodes[id.0];
		node.goal = rules.is_goal(&node.state);
		let summary = &mut self.summary;
		summary.longest_path_steps = summary.longest_path_steps.max(node.step);
		if node.goal {
			summary.goal_states += 1;
			summary.goal_path_steps = Some(
				summary
					.goal_path_steps
					.map_or(node.step, |steps| steps.min(node.step)),
			);
		}
	}

	/// Walks from every goal back along direct edges, marking the way as a goal path.
	/// A walk ends at a node marked by an earlier walk.
	/// Returns the sources of merge edges met on the way,
	/// which can reach a goal without lying on a direct path to one.
	fn mark_goal_paths(&mut self, goal_nodes: &[StateNodeId]) -> VecDeque<StateNodeId> {
		let mut merge_sources = VecDeque::new();
		for &goal in goal_nodes.iter().rev() {
			let mut current = Some(goal);
			while let Some(id) = current {
				let node = &mut self.nodes[id.0];
				if node.goal_path {
					break;
				}
				node.goal_path = true;
				node.stuck = false;

				current = None;
				for &edge in &self.nodes[id.0].incoming {
					let edge = &self.edges[edge.0];
					if edge.direct_path {
						current = Some(edge.from);
					} else {
						merge_sources.push_back(edge.from);
					}
				}
			}
		}
		merge_sources
	}

	/// Clears the stuck flag of everything that can reach one of the given nodes
	fn clear_stuck(&mut self, mut queue: VecDeque<StateNodeId>) {
		while let Some(id) = queue.pop_front() {
			let node = &mut self.nodes[id.0];
			if !node.stuck {
				continue;
			}
			node.stuck = false;
			queue.extend(
				self.nodes[id.0]
					.incoming
					.iter()
					.map(|edge| self.edges[edge.0].from),
			);
		}
	}

	pub fn summary(&self) -> ExplorationSummary {
		self.summary
	}

	pub fn start(&self) -> StateNodeId {
		StateNodeId(0)
	}

	/// All nodes, ordered by id
	pub fn nodes(&self) -> &[StateNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[StateEdge] {
		&self.edges
	}

	pub fn node(&self, id: StateNodeId) -> Option<&StateNode> {
		self.nodes.get(id.0)
	}

	pub fn edge(&self, id: StateEdgeId) -> Option<&StateEdge> {
		self.edges.get(id.0)
	}

	/// Actions available in a state, with the ids of their edges
	pub fn outgoing(&self, id: StateNodeId) -> impl Iterator<Item = (StateEdgeId, &StateEdge)> {
		self.node(id)
			.into_iter()
			.flat_map(|node| &node.outgoing)
			.map(move |&edge| (edge, &self.edges[edge.0]))
	}

	pub fn incoming(&self, id: StateNodeId) -> impl Iterator<Item = (StateEdgeId, &StateEdge)> {
		self.node(id)
			.into_iter()
			.flat_map(|node| &node.incoming)
			.map(move |&edge| (edge, &self.edges[edge.0]))
	}
}
