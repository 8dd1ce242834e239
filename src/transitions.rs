//! Legal actions leading from one puzzle state to the next
//!
//! A [`RuleTable`] resolves the element of every node and edge of a [`Puzzle`] once,
//! so that enumerating the actions of a state only touches plain indices.

use crate::{
	puzzle::{Crossing, ElementKind, ItemKind, NodeId, Occupancy, Placement, Puzzle},
	state::{PuzzleState, StateKey},
};

/// Kinds of actions a player can take
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ActionKind {
	/// Walk to an adjacent node
	Walk,
	/// Walk to an adjacent node carrying a ball along
	BringBall,
	/// Push a ball to an adjacent node without following it
	PushBall,
	/// Flip a toggle on an adjacent node that can be seen
	ShootToggle,
	/// Flip a toggle the player stands on
	PressToggle,
}

impl ActionKind {
	pub fn label(self) -> &'static str {
		match self {
			Self::Walk => "Go here",
			Self::BringBall => "Bring ball here",
			Self::PushBall => "Push ball here",
			Self::ShootToggle => "Shoot toggle",
			Self::PressToggle => "Press toggle",
		}
	}
}

impl std::fmt::Display for ActionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// A candidate successor of a state
#[derive(Clone, PartialEq, Debug)]
pub struct Transition {
	pub action: ActionKind,
	/// Puzzle node where the action takes place
	pub action_node: NodeId,
	/// State after the action, with trigger updates already applied
	pub state: PuzzleState,
}

#[derive(Clone, Copy, Debug)]
struct ResolvedElement {
	kind: ElementKind,
	/// Index of the element's value in a state, for dynamic elements
	value_index: Option<usize>,
}

#[derive(Clone, Debug)]
struct NodeRules {
	id: NodeId,
	element: ResolvedElement,
	/// Value indices of the receivers notified by this node's trigger
	receivers: Vec<usize>,
}

#[derive(Clone, Debug)]
struct EdgeRules {
	a: usize,
	b: usize,
	element: ResolvedElement,
}

/// Movement rules of a puzzle, resolved to indices
#[derive(Clone, Debug)]
pub struct RuleTable {
	nodes: Vec<NodeRules>,
	edges: Vec<EdgeRules>,
	item_kinds: Vec<ItemKind>,
}

impl RuleTable {
	pub fn new(puzzle: &Puzzle) -> Self {
		let resolve = |element, placement| {
			match puzzle.element(element) {
				Some(element) => ResolvedElement {
					kind: element.kind,
					value_index: puzzle.dynamic_index(element.id),
				},
				None => ResolvedElement::default_for(placement),
			}
		};
		let nodes = puzzle
			.nodes()
			.iter()
			.map(|node| NodeRules {
				id: node.id,
				element: node
					.element
					.map(|element| resolve(element, Placement::Node))
					.unwrap_or(ResolvedElement::default_for(Placement::Node)),
				receivers: node
					.receivers
					.iter()
					.filter_map(|&receiver| puzzle.dynamic_index(receiver))
					.collect(),
			})
			.collect();
		let edges = puzzle
			.edges()
			.iter()
			.filter_map(|edge| {
				Some(EdgeRules {
					a: puzzle.node_index(edge.node_a)?,
					b: puzzle.node_index(edge.node_b)?,
					element: edge
						.element
						.map(|element| resolve(element, Placement::Edge))
						.unwrap_or(ResolvedElement::default_for(Placement::Edge)),
				})
			})
			.collect();
		Self {
			nodes,
			edges,
			item_kinds: puzzle.item_kinds(),
		}
	}

	pub fn state_key(&self, state: &PuzzleState) -> StateKey {
		state.key(&self.item_kinds)
	}

	/// True if there is at least one player and all players stand on goals
	pub fn is_goal(&self, state: &PuzzleState) -> bool {
		let mut any_players = false;
		for (item, _) in self
			.item_kinds
			.iter()
			.enumerate()
			.filter(|&(_, &kind)| kind == ItemKind::Player)
		{
			any_players = true;
			let on_goal = state
				.item_node(item)
				.and_then(|node| self.nodes.get(node))
				.is_some_and(|node| node.element.kind == ElementKind::Goal);
			if !on_goal {
				return false;
			}
		}
		any_players
	}

	/// Indices of the items of a kind lying on a node
	fn items_in<'a>(
		&'a self,
		state: &'a PuzzleState,
		node: usize,
		kind: ItemKind,
	) -> impl Iterator<Item = usize> + 'a {
		self.item_kinds
			.iter()
			.enumerate()
			.filter(move |&(item, &item_kind)| {
				item_kind == kind && state.item_node(item) == Some(node)
			})
			.map(|(item, _)| item)
	}

	fn crossing(
		&self,
		element: ResolvedElement,
		state: &PuzzleState,
		origin: usize,
		forward: bool,
	) -> Crossing {
		Crossing {
			forward,
			value: element
				.value_index
				.and_then(|index| state.element_value(index))
				.unwrap_or(false),
			origin_has_ball: self.items_in(state, origin, ItemKind::Ball).next().is_some(),
		}
	}

	/// Flips the toggle on a node and every receiver it notifies
	fn trigger_toggle(&self, state: &mut PuzzleState, node: usize) {
		let node = &self.nodes[node];
		if let Some(index) = node.element.value_index {
			let value = state.element_value(index).unwrap_or(false);
			state.set_element_value(index, !value);
		}
		for &receiver in &node.receivers {
			let value = state.element_value(receiver).unwrap_or(false);
			state.set_element_value(receiver, !value);
		}
	}

	/// Sets the trigger on a node and every receiver it notifies,
	/// unless the trigger already has the value
	fn trigger_value(&self, state: &mut PuzzleState, node: usize, value: bool) {
		let node = &self.nodes[node];
		let Some(index) = node.element.value_index else {
			return;
		};
		if state.element_value(index) == Some(value) {
			return;
		}
		state.set_element_value(index, value);
		for &receiver in &node.receivers {
			state.set_element_value(receiver, value);
		}
	}

	/// Lets buttons and plates react to the items standing on them
	pub fn update_triggers(&self, state: &mut PuzzleState) {
		for (index, node) in self.nodes.iter().enumerate() {
			let occupancy = Occupancy {
				has_player: self.items_in(state, index, ItemKind::Player).next().is_some(),
				has_ball: self.items_in(state, index, ItemKind::Ball).next().is_some(),
			};
			if let Some(value) = node.element.kind.update_state(occupancy) {
				self.trigger_value(state, index, value);
			}
		}
	}

	/// Enumerates every legal action from a state, in a fixed order:
	/// node actions in node order, then edge actions in edge order,
	/// each edge crossed forward before backward.
	pub fn transitions(&self, state: &PuzzleState) -> Vec<Transition> {
		let mut transitions = Vec::new();

		for (index, node) in self.nodes.iter().enumerate() {
			if node.element.kind == ElementKind::Toggle
				&& self.items_in(state, index, ItemKind::Player).next().is_some()
			{
				let mut next = state.clone();
				self.trigger_toggle(&mut next, index);
				transitions.push(Transition {
					action: ActionKind::PressToggle,
					action_node: node.id,
					state: next,
				});
			}
		}

		for edge in &self.edges {
			self.crossing_transitions(state, edge, edge.a, edge.b, true, &mut transitions);
			self.crossing_transitions(state, edge, edge.b, edge.a, false, &mut transitions);
		}

		for transition in &mut transitions {
			self.update_triggers(&mut transition.state);
		}
		transitions
	}

	fn crossing_transitions(
		&self,
		state: &PuzzleState,
		edge: &EdgeRules,
		from: usize,
		to: usize,
		forward: bool,
		transitions: &mut Vec<Transition>,
	) {
		let target = &self.nodes[to];
		let via_edge = self.crossing(edge.element, state, from, forward);
		let via_node = self.crossing(target.element, state, from, forward);
		let (edge_kind, node_kind) = (edge.element.kind, target.element.kind);
		let ball = self.items_in(state, from, ItemKind::Ball).next();

		let mut push = |action, next| {
			transitions.push(Transition {
				action,
				action_node: target.id,
				state: next,
			})
		};

		for player in self.items_in(state, from, ItemKind::Player) {
			if edge_kind.can_walk(via_edge) && node_kind.can_walk(via_node) {
				let mut next = state.clone();
				next.set_item_node(player, to);
				push(ActionKind::Walk, next);
			}

			if let Some(ball) = ball {
				if edge_kind.can_take_ball(via_edge) && node_kind.can_take_ball(via_node) {
					let mut next = state.clone();
					next.set_item_node(player, to);
					next.set_item_node(ball, to);
					push(ActionKind::BringBall, next);
				}
				if edge_kind.can_push_ball(via_edge) && node_kind.can_push_ball(via_node) {
					let mut next = state.clone();
					next.set_item_node(ball, to);
					push(ActionKind::PushBall, next);
				}
			}

			if node_kind == ElementKind::Toggle
				&& edge_kind.can_see(via_edge)
				&& node_kind.can_see(via_node)
			{
				let mut next = state.clone();
				self.trigger_toggle(&mut next, to);
				push(ActionKind::ShootToggle, next);
			}
		}
	}
}

impl ResolvedElement {
	fn default_for(placement: Placement) -> Self {
		Self {
			kind: match placement {
				Placement::Node => ElementKind::DefaultNode,
				Placement::Edge => ElementKind::DefaultEdge,
			},
			value_index: None,
		}
	}
}
