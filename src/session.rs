//! Playing through an explored state graph by hand

use crate::{
	explorer::{StateEdge, StateEdgeId, StateGraph, StateNode, StateNodeId},
	puzzle::{NodeId, Puzzle},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionError {
	/// The edge does not leave the current state
	NotAnOutgoingAction(StateEdgeId),
}

/// Actions leaving a state, grouped by the puzzle node where they take place
pub type NodeActions<'a> = Vec<(NodeId, Vec<(StateEdgeId, &'a StateEdge)>)>;

/// Position within a state graph and the way taken to get there
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlaySession {
	current: StateNodeId,
	/// States left behind, most recent last
	history: Vec<StateNodeId>,
}

impl PlaySession {
	pub fn new(graph: &StateGraph) -> Self {
		Self {
			current: graph.start(),
			history: Vec::new(),
		}
	}

	pub fn current(&self) -> StateNodeId {
		self.current
	}

	pub fn current_node<'a>(&self, graph: &'a StateGraph) -> Option<&'a StateNode> {
		graph.node(self.current)
	}

	pub fn history(&self) -> &[StateNodeId] {
		&self.history
	}

	pub fn actions<'a>(&self, graph: &'a StateGraph) -> Vec<(StateEdgeId, &'a StateEdge)> {
		graph.outgoing(self.current).collect()
	}

	/// Available actions per puzzle node, in the order of the puzzle's nodes
	pub fn actions_by_node<'a>(&self, graph: &'a StateGraph, puzzle: &Puzzle) -> NodeActions<'a> {
		let actions = self.actions(graph);
		puzzle
			.nodes()
			.iter()
			.filter_map(|node| {
				let here = actions
					.iter()
					.filter(|(_, action)| action.action_node == node.id)
					.copied()
					.collect::<Vec<_>>();
				(!here.is_empty()).then_some((node.id, here))
			})
			.collect()
	}

	/// Follows an action leaving the current state
	pub fn take(&mut self, graph: &StateGraph, edge: StateEdgeId) -> Result<StateNodeId, SessionError> {
		let Some(action) = graph.edge(edge).filter(|action| action.from == self.current) else {
			return Err(SessionError::NotAnOutgoingAction(edge));
		};
		self.history.push(self.current);
		self.current = action.to;
		log::debug!("{} -> state #{}", action.action, self.current.0);
		Ok(self.current)
	}

	/// Returns to the previous state, if there is one
	pub fn undo(&mut self) -> bool {
		if let Some(previous) = self.history.pop() {
			self.current = previous;
			true
		} else {
			log::warn!("Undo requested, but no actions have been taken");
			false
		}
	}

	pub fn restart(&mut self, graph: &StateGraph) {
		self.current = graph.start();
		self.history.clear();
	}
}

impl std::error::Error for SessionError {}

impl std::fmt::Display for SessionError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotAnOutgoingAction(edge) => {
				write!(f, "Action #{} does not leave the current state.", edge.0)
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{explorer::ExplorerOptions, format::parse_puzzle, transitions::ActionKind};

	fn corridor() -> (Puzzle, StateGraph) {
		let puzzle = parse_puzzle(
			"Corridor\nNode A { pos:0,0 }\nNode B { pos:1,0 }\nNode C { pos:2,0 }\nEdge A-B { }\nEdge B-C { }\nGoal C { }\nPlayer A { }\n",
		)
		.unwrap();
		let graph = StateGraph::traverse_state_graph(&puzzle, ExplorerOptions::default());
		(puzzle, graph)
	}

	#[test]
	fn walks_to_the_goal_and_back() {
		let (puzzle, graph) = corridor();
		let mut session = PlaySession::new(&graph);
		assert_eq!(session.current(), graph.start());

		let [(first, _)] = session.actions(&graph)[..] else {
			panic!("expected a single action");
		};
		session.take(&graph, first).unwrap();
		assert_eq!(session.history(), &[graph.start()]);

		let grouped = session.actions_by_node(&graph, &puzzle);
		let names = grouped
			.iter()
			.map(|(node, actions)| (puzzle.node(*node).unwrap().name.as_str(), actions.len()))
			.collect::<Vec<_>>();
		assert_eq!(names, vec![("A", 1), ("C", 1)]);

		let (to_goal, action) = grouped[1].1[0];
		assert_eq!(action.action, ActionKind::Walk);
		session.take(&graph, to_goal).unwrap();
		assert!(session.current_node(&graph).unwrap().goal);

		assert!(session.undo());
		assert!(session.undo());
		assert_eq!(session.current(), graph.start());
		assert!(!session.undo());
	}

	#[test]
	fn only_actions_of_the_current_state_can_be_taken() {
		let (_, graph) = corridor();
		let mut session = PlaySession::new(&graph);
		let (first, _) = session.actions(&graph)[0];
		session.take(&graph, first).unwrap();
		assert_eq!(
			session.take(&graph, first),
			Err(SessionError::NotAnOutgoingAction(first))
		);
		assert_eq!(
			session.take(&graph, StateEdgeId(99)),
			Err(SessionError::NotAnOutgoingAction(StateEdgeId(99)))
		);
		assert_eq!(session.history().len(), 1);
	}

	#[test]
	fn restart_forgets_the_way() {
		let (_, graph) = corridor();
		let mut session = PlaySession::new(&graph);
		let (first, _) = session.actions(&graph)[0];
		session.take(&graph, first).unwrap();
		session.restart(&graph);
		assert_eq!(session, PlaySession::new(&graph));
	}
}
