use super::*;

/// Reasons for rejecting an edit of a [`Puzzle`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PuzzleError {
	/// A node id does not refer to a node of the puzzle
	UnknownNode(NodeId),
	/// An edge id does not refer to an edge of the puzzle
	UnknownEdge(EdgeId),
	/// An element id does not refer to an element of the puzzle
	UnknownElement(ElementId),
	/// A node name is not an identifier
	InvalidNodeName(String),
	/// Another node already uses the name
	DuplicateNodeName(String),
	/// An edge was requested between a node and itself
	SelfEdge(NodeId),
	/// The two nodes are already connected by an edge
	DuplicateEdge(NodeId, NodeId),
	/// An element kind was placed on the wrong kind of container
	WrongPlacement {
		kind: ElementKind,
		container: Container,
	},
	/// The container already holds an element
	ContainerOccupied(Container),
	/// Receivers can only be linked to a node that holds a trigger element
	NotATrigger(NodeId),
	/// Only receiver elements can be notified by triggers
	NotAReceiver(ElementId),
	/// The receiver is already notified by the node
	ReceiverAlreadyLinked { node: NodeId, receiver: ElementId },
}

impl std::error::Error for PuzzleError {}

impl std::fmt::Display for PuzzleError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnknownNode(id) => write!(f, "Node {} does not exist.", id.0),
			Self::UnknownEdge(id) => write!(f, "Edge {} does not exist.", id.0),
			Self::UnknownElement(id) => write!(f, "Element {} does not exist.", id.0),
			Self::InvalidNodeName(name) => write!(f, "{name:?} is not a valid node name."),
			Self::DuplicateNodeName(name) => write!(f, "Node name {name:?} is already taken."),
			Self::SelfEdge(id) => write!(f, "Node {} cannot be connected to itself.", id.0),
			Self::DuplicateEdge(a, b) => {
				write!(f, "Nodes {} and {} are already connected.", a.0, b.0)
			}
			Self::WrongPlacement { kind, container } => {
				write!(f, "{kind} cannot be placed on {container}.")
			}
			Self::ContainerOccupied(container) => {
				write!(f, "{container} already holds an element.")
			}
			Self::NotATrigger(id) => write!(f, "Node {} does not hold a trigger.", id.0),
			Self::NotAReceiver(id) => write!(f, "Element {} is not a receiver.", id.0),
			Self::ReceiverAlreadyLinked { node, receiver } => write!(
				f,
				"Element {} is already notified by node {}.",
				receiver.0, node.0
			),
		}
	}
}
