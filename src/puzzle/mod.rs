//! Static definition of a puzzle: nodes, edges, elements and items
//!
//! The definition is edited through the methods of [`Puzzle`],
//! which reject inconsistent edits and cascade removals.
//! Lookups with ids that no longer exist resolve to `None` or do nothing.

pub mod element;
mod error;

pub use element::{Crossing, ElementKind, Occupancy, Placement};
pub use error::PuzzleError;

use crate::state::{PuzzleState, StateKey};
use bevy::math::IVec2;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ElementId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ItemId(pub usize);

/// Something that can hold an element
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Container {
	Node(NodeId),
	Edge(EdgeId),
}

impl std::fmt::Display for Container {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Node(id) => write!(f, "node {}", id.0),
			Self::Edge(id) => write!(f, "edge {}", id.0),
		}
	}
}

/// Kinds of movable items
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ItemKind {
	Player,
	Ball,
}

impl ItemKind {
	pub fn name(self) -> &'static str {
		match self {
			Self::Player => "Player",
			Self::Ball => "Ball",
		}
	}
}

impl std::fmt::Display for ItemKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Clone, PartialEq, Debug)]
pub struct PuzzleNode {
	pub id: NodeId,
	pub name: String,
	/// Position of the node in the editor, only used for presentation
	pub position: IVec2,
	pub element: Option<ElementId>,
	/// Receiver elements notified when the trigger on this node changes
	pub receivers: Vec<ElementId>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PuzzleEdge {
	pub id: EdgeId,
	/// Origin of forward crossings
	pub node_a: NodeId,
	pub node_b: NodeId,
	pub element: Option<ElementId>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Element {
	pub id: ElementId,
	pub kind: ElementKind,
	pub container: Container,
	/// Value of a dynamic element in the start state
	pub default_on: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Item {
	pub id: ItemId,
	pub kind: ItemKind,
	/// Where the item lies in the start state
	pub default_node: NodeId,
}

/// Puzzle definition owned by the caller
#[derive(Clone, Debug, Default)]
pub struct Puzzle {
	pub name: String,
	nodes: Vec<PuzzleNode>,
	edges: Vec<PuzzleEdge>,
	static_elements: Vec<Element>,
	/// Dynamic elements in the order their values appear in a [`PuzzleState`]
	dynamic_elements: Vec<Element>,
	items: Vec<Item>,
	next_id: usize,
}

fn is_valid_node_name(name: &str) -> bool {
	let mut chars = name.chars();
	chars
		.next()
		.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Puzzle {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	fn allocate_id(&mut self) -> usize {
		let id = self.next_id;
		self.next_id += 1;
		id
	}

	pub fn nodes(&self) -> &[PuzzleNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[PuzzleEdge] {
		&self.edges
	}

	pub fn static_elements(&self) -> &[Element] {
		&self.static_elements
	}

	pub fn dynamic_elements(&self) -> &[Element] {
		&self.dynamic_elements
	}

	pub fn elements(&self) -> impl Iterator<Item = &Element> {
		self.static_elements.iter().chain(&self.dynamic_elements)
	}

	pub fn items(&self) -> &[Item] {
		&self.items
	}

	pub fn node_index(&self, id: NodeId) -> Option<usize> {
		self.nodes.iter().position(|node| node.id == id)
	}

	pub fn node(&self, id: NodeId) -> Option<&PuzzleNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	pub fn node_by_name(&self, name: &str) -> Option<&PuzzleNode> {
		self.nodes.iter().find(|node| node.name == name)
	}

	pub fn edge(&self, id: EdgeId) -> Option<&PuzzleEdge> {
		self.edges.iter().find(|edge| edge.id == id)
	}

	/// Finds the edge connecting two nodes, in either direction
	pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&PuzzleEdge> {
		self.edges.iter().find(|edge| {
			(edge.node_a == a && edge.node_b == b) || (edge.node_a == b && edge.node_b == a)
		})
	}

	pub fn element(&self, id: ElementId) -> Option<&Element> {
		self.elements().find(|element| element.id == id)
	}

	fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
		self.static_elements
			.iter_mut()
			.chain(&mut self.dynamic_elements)
			.find(|element| element.id == id)
	}

	/// Position of a dynamic element's value in [`PuzzleState`]
	pub fn dynamic_index(&self, id: ElementId) -> Option<usize> {
		self.dynamic_elements
			.iter()
			.position(|element| element.id == id)
	}

	pub fn item(&self, id: ItemId) -> Option<&Item> {
		self.items.iter().find(|item| item.id == id)
	}

	pub fn container_element(&self, container: Container) -> Option<ElementId> {
		match container {
			Container::Node(id) => self.node(id)?.element,
			Container::Edge(id) => self.edge(id)?.element,
		}
	}

	/// Name of a container as used in the text format:
	/// the node name, or `A-B` for an edge
	pub fn container_name(&self, container: Container) -> Option<String> {
		match container {
			Container::Node(id) => Some(self.node(id)?.name.clone()),
			Container::Edge(id) => {
				let edge = self.edge(id)?;
				Some(format!(
					"{}-{}",
					self.node(edge.node_a)?.name,
					self.node(edge.node_b)?.name
				))
			}
		}
	}

	fn first_free_name(&self) -> String {
		if let Some(letter) =
			('A'..='Z').find(|&letter| !self.nodes.iter().any(|n| n.name.starts_with(letter)))
		{
			return letter.to_string();
		}
		let mut number = self.next_id;
		loop {
			let name = format!("N{number}");
			if self.node_by_name(&name).is_none() {
				return name;
			}
			number += 1;
		}
	}

	/// Adds a node. An empty name is replaced by the first capital letter
	/// that no other node name starts with.
	pub fn add_node(&mut self, name: &str, position: IVec2) -> Result<NodeId, PuzzleError> {
		let name = if name.is_empty() {
			self.first_free_name()
		} else if !is_valid_node_name(name) {
			return Err(PuzzleError::InvalidNodeName(name.to_owned()));
		} else if self.node_by_name(name).is_some() {
			return Err(PuzzleError::DuplicateNodeName(name.to_owned()));
		} else {
			name.to_owned()
		};
		let id = NodeId(self.allocate_id());
		self.nodes.push(PuzzleNode {
			id,
			name,
			position,
			element: None,
			receivers: Vec::new(),
		});
		Ok(id)
	}

	pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), PuzzleError> {
		if !is_valid_node_name(name) {
			return Err(PuzzleError::InvalidNodeName(name.to_owned()));
		}
		if self.node_by_name(name).is_some_and(|node| node.id != id) {
			return Err(PuzzleError::DuplicateNodeName(name.to_owned()));
		}
		let node = self
			.nodes
			.iter_mut()
			.find(|node| node.id == id)
			.ok_or(PuzzleError::UnknownNode(id))?;
		node.name = name.to_owned();
		Ok(())
	}

	/// Moves a node in the editor, does nothing if the node is gone
	pub fn set_node_position(&mut self, id: NodeId, position: IVec2) {
		if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
			node.position = position;
		}
	}

	/// Removes a node together with its edges, its element
	/// and the items that start on it
	pub fn remove_node(&mut self, id: NodeId) -> bool {
		let Some(index) = self.node_index(id) else {
			return false;
		};
		let incident = self
			.edges
			.iter()
			.filter(|edge| edge.node_a == id || edge.node_b == id)
			.map(|edge| edge.id)
			.collect::<Vec<_>>();
		for edge in incident {
			self.remove_edge(edge);
		}
		if let Some(element) = self.nodes[index].element {
			self.remove_element(element);
		}
		self.items.retain(|item| item.default_node != id);
		self.nodes.retain(|node| node.id != id);
		true
	}

	pub fn add_edge(&mut self, node_a: NodeId, node_b: NodeId) -> Result<EdgeId, PuzzleError> {
		for node in [node_a, node_b] {
			if self.node(node).is_none() {
				return Err(PuzzleError::UnknownNode(node));
			}
		}
		if node_a == node_b {
			return Err(PuzzleError::SelfEdge(node_a));
		}
		if self.edge_between(node_a, node_b).is_some() {
			return Err(PuzzleError::DuplicateEdge(node_a, node_b));
		}
		let id = EdgeId(self.allocate_id());
		self.edges.push(PuzzleEdge {
			id,
			node_a,
			node_b,
			element: None,
		});
		Ok(id)
	}

	/// Removes an edge together with its element
	pub fn remove_edge(&mut self, id: EdgeId) -> bool {
		let Some(edge) = self.edge(id) else {
			return false;
		};
		if let Some(element) = edge.element {
			self.remove_element(element);
		}
		self.edges.retain(|edge| edge.id != id);
		true
	}

	pub fn add_element(
		&mut self,
		container: Container,
		kind: ElementKind,
		default_on: bool,
	) -> Result<ElementId, PuzzleError> {
		let placement = match container {
			Container::Node(id) => {
				let node = self.node(id).ok_or(PuzzleError::UnknownNode(id))?;
				if node.element.is_some() {
					return Err(PuzzleError::ContainerOccupied(container));
				}
				Placement::Node
			}
			Container::Edge(id) => {
				let edge = self.edge(id).ok_or(PuzzleError::UnknownEdge(id))?;
				if edge.element.is_some() {
					return Err(PuzzleError::ContainerOccupied(container));
				}
				Placement::Edge
			}
		};
		if kind.placement() != placement {
			return Err(PuzzleError::WrongPlacement { kind, container });
		}

		let id = ElementId(self.allocate_id());
		let element = Element {
			id,
			kind,
			container,
			default_on: default_on && kind.is_dynamic(),
		};
		if kind.is_dynamic() {
			self.dynamic_elements.push(element);
		} else {
			self.static_elements.push(element);
		}
		match container {
			Container::Node(node) => {
				if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node) {
					node.element = Some(id);
				}
			}
			Container::Edge(edge) => {
				if let Some(edge) = self.edges.iter_mut().find(|e| e.id == edge) {
					edge.element = Some(id);
				}
			}
		}
		Ok(id)
	}

	/// Changes the start value of a dynamic element, does nothing for static ones
	pub fn set_element_default(&mut self, id: ElementId, on: bool) {
		if let Some(element) = self.element_mut(id) {
			element.default_on = on && element.kind.is_dynamic();
		}
	}

	/// Removes an element from its container and from every receiver list,
	/// along with the receiver links of the node it was placed on
	pub fn remove_element(&mut self, id: ElementId) -> bool {
		let Some(element) = self.element(id) else {
			return false;
		};
		let container = element.container;
		for node in &mut self.nodes {
			if container == Container::Node(node.id) {
				node.receivers.clear();
			}
			node.receivers.retain(|&receiver| receiver != id);
			if node.element == Some(id) {
				node.element = None;
			}
		}
		for edge in &mut self.edges {
			if edge.element == Some(id) {
				edge.element = None;
			}
		}
		self.static_elements.retain(|element| element.id != id);
		self.dynamic_elements.retain(|element| element.id != id);
		true
	}

	pub fn add_item(&mut self, kind: ItemKind, default_node: NodeId) -> Result<ItemId, PuzzleError> {
		if self.node(default_node).is_none() {
			return Err(PuzzleError::UnknownNode(default_node));
		}
		let id = ItemId(self.allocate_id());
		self.items.push(Item {
			id,
			kind,
			default_node,
		});
		Ok(id)
	}

	pub fn remove_item(&mut self, id: ItemId) -> bool {
		let count = self.items.len();
		self.items.retain(|item| item.id != id);
		self.items.len() != count
	}

	/// Makes the trigger on `node` notify `receiver`
	pub fn add_receiver(&mut self, node: NodeId, receiver: ElementId) -> Result<(), PuzzleError> {
		let trigger = self
			.node(node)
			.ok_or(PuzzleError::UnknownNode(node))?
			.element
			.and_then(|element| self.element(element));
		if !trigger.is_some_and(|element| element.kind.is_trigger()) {
			return Err(PuzzleError::NotATrigger(node));
		}
		let receiver_element = self
			.element(receiver)
			.ok_or(PuzzleError::UnknownElement(receiver))?;
		if !receiver_element.kind.is_receiver() {
			return Err(PuzzleError::NotAReceiver(receiver));
		}
		let Some(node_data) = self.nodes.iter_mut().find(|n| n.id == node) else {
			return Err(PuzzleError::UnknownNode(node));
		};
		if node_data.receivers.contains(&receiver) {
			return Err(PuzzleError::ReceiverAlreadyLinked { node, receiver });
		}
		node_data.receivers.push(receiver);
		Ok(())
	}

	pub fn remove_receiver(&mut self, node: NodeId, receiver: ElementId) -> bool {
		let Some(node) = self.nodes.iter_mut().find(|n| n.id == node) else {
			return false;
		};
		let count = node.receivers.len();
		node.receivers.retain(|&r| r != receiver);
		node.receivers.len() != count
	}

	/// Kinds of all items, in the order their locations appear in a [`PuzzleState`]
	pub fn item_kinds(&self) -> Vec<ItemKind> {
		self.items.iter().map(|item| item.kind).collect()
	}

	/// State with every dynamic element at its default value
	/// and every item on its default node
	pub fn start_state(&self) -> PuzzleState {
		PuzzleState::new(
			self.dynamic_elements
				.iter()
				.map(|element| element.default_on)
				.collect(),
			self.items
				.iter()
				.map(|item| self.node_index(item.default_node).unwrap_or_default())
				.collect(),
		)
	}

	pub fn state_key(&self, state: &PuzzleState) -> StateKey {
		state.key(&self.item_kinds())
	}

	pub fn element_value(&self, state: &PuzzleState, element: ElementId) -> Option<bool> {
		state.element_value(self.dynamic_index(element)?)
	}

	pub fn set_element_value(&self, state: &mut PuzzleState, element: ElementId, value: bool) {
		if let Some(index) = self.dynamic_index(element) {
			state.set_element_value(index, value);
		}
	}

	pub fn item_node(&self, state: &PuzzleState, item: ItemId) -> Option<NodeId> {
		let index = self.items.iter().position(|i| i.id == item)?;
		let node_index = state.item_node(index)?;
		Some(self.nodes.get(node_index)?.id)
	}

	pub fn set_item_node(&self, state: &mut PuzzleState, item: ItemId, node: NodeId) {
		let item_index = self.items.iter().position(|i| i.id == item);
		let node_index = self.node_index(node);
		if let (Some(item_index), Some(node_index)) = (item_index, node_index) {
			state.set_item_node(item_index, node_index);
		}
	}

	/// Items of the given kind (or of any kind) lying on a node in a state
	pub fn items_in_node(
		&self,
		state: &PuzzleState,
		node: NodeId,
		kind: Option<ItemKind>,
	) -> Vec<ItemId> {
		let Some(node_index) = self.node_index(node) else {
			return Vec::new();
		};
		self.items
			.iter()
			.enumerate()
			.filter(|(i, item)| {
				kind.is_none_or(|kind| item.kind == kind) && state.item_node(*i) == Some(node_index)
			})
			.map(|(_, item)| item.id)
			.collect()
	}
}
