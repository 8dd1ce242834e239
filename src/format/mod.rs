//! Line-oriented text form of puzzle definitions
//!
//! ```text
//! Tutorial
//! Node A { pos:0,0 notify:A-B }
//! Node B { pos:1,0 }
//! Edge A-B { }
//! Goal B { }
//! Toggle A { off }
//! Gate A-B { off }
//! Player A { }
//! ```
//!
//! The first line names the puzzle, every other line declares one entity
//! as `Kind Name { fields }`. Blank lines and lines starting with `#` are skipped.
//! Edges and edge elements are named by their nodes, `A-B`,
//! node elements and items by the node they sit on.

mod lex;
#[cfg(test)]
mod test;

use crate::puzzle::{Container, ElementId, ElementKind, ItemKind, NodeId, Puzzle, PuzzleError};
use bevy::math::IVec2;
use itertools::Itertools as _;
use lex::{lex_line, Token};

pub use lex::LexErrorCode;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FormatErrorCode {
	/// The input has no lines at all
	MissingName,
	/// A line contains something that is not a token
	InvalidToken(LexErrorCode, String),
	/// A line does not match `Kind Name { fields }`
	MalformedStatement,
	UnknownKind(String),
	UnknownNode(String),
	UnknownEdge(String),
	/// The kind expects the other form of name (`A` versus `A-B`)
	WrongNameForm(String),
	/// A field that the entity does not have, or a field with a bad value
	UnexpectedField(String),
	/// A notified container holds no element
	UnknownReceiver(String),
	/// The definition itself rejected the entity
	Definition(PuzzleError),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FormatError {
	pub code: FormatErrorCode,
	/// 1-based number of the offending line
	pub line_number: usize,
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum EntityName {
	Node(String),
	Edge(String, String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EntityKind {
	Node,
	Edge,
	Element(ElementKind),
	Item(ItemKind),
}

/// Entity created by a line, kept until its fields are applied
#[derive(Clone, Copy, Debug)]
enum Entity {
	Node(NodeId),
	Element(ElementId),
	Other,
}

#[derive(Clone, Debug)]
struct Statement {
	kind: EntityKind,
	name: EntityName,
	fields: Vec<Token>,
}

impl EntityKind {
	fn from_name(name: &str) -> Option<Self> {
		// Older definitions spell kinds with a prefix, e.g. `PuzzleNode`
		let name = name
			.strip_prefix("Puzzle")
			.filter(|rest| !rest.is_empty())
			.unwrap_or(name);
		match name {
			"Node" => Some(Self::Node),
			"Edge" => Some(Self::Edge),
			"Player" => Some(Self::Item(ItemKind::Player)),
			"Ball" => Some(Self::Item(ItemKind::Ball)),
			_ => ElementKind::from_name(name).map(Self::Element),
		}
	}
}

/// Reads a name (`A` or `A-B`) from the front of a token list
fn take_name(tokens: &[Token]) -> Option<(EntityName, &[Token])> {
	match tokens {
		[Token::Identifier(a), Token::Minus, Token::Identifier(b), rest @ ..] => {
			Some((EntityName::Edge(a.clone(), b.clone()), rest))
		}
		[Token::Identifier(a), rest @ ..] => Some((EntityName::Node(a.clone()), rest)),
		_ => None,
	}
}

fn parse_statement(tokens: Vec<Token>) -> Result<Statement, FormatErrorCode> {
	let [Token::Identifier(kind_name), rest @ ..] = tokens.as_slice() else {
		return Err(FormatErrorCode::MalformedStatement);
	};
	let kind = EntityKind::from_name(kind_name)
		.ok_or_else(|| FormatErrorCode::UnknownKind(kind_name.clone()))?;
	let (name, rest) = take_name(rest).ok_or(FormatErrorCode::MalformedStatement)?;
	let [Token::OpenBrace, fields @ .., Token::CloseBrace] = rest else {
		return Err(FormatErrorCode::MalformedStatement);
	};
	Ok(Statement {
		kind,
		name,
		fields: fields.to_vec(),
	})
}

fn find_node(puzzle: &Puzzle, name: &str) -> Result<NodeId, FormatErrorCode> {
	puzzle
		.node_by_name(name)
		.map(|node| node.id)
		.ok_or_else(|| FormatErrorCode::UnknownNode(name.to_owned()))
}

/// Resolves a name to a container, edges have to match in direction
fn find_container(puzzle: &Puzzle, name: &EntityName) -> Result<Container, FormatErrorCode> {
	match name {
		EntityName::Node(node) => find_node(puzzle, node).map(Container::Node),
		EntityName::Edge(a, b) => {
			let (a, b) = (find_node(puzzle, a)?, find_node(puzzle, b)?);
			puzzle
				.edges()
				.iter()
				.find(|edge| edge.node_a == a && edge.node_b == b)
				.map(|edge| Container::Edge(edge.id))
				.ok_or_else(|| FormatErrorCode::UnknownEdge(name.to_string()))
		}
	}
}

fn add_entity(
	puzzle: &mut Puzzle,
	kind: EntityKind,
	name: &EntityName,
) -> Result<Entity, FormatErrorCode> {
	Ok(match (kind, name) {
		(EntityKind::Node, EntityName::Node(name)) => {
			Entity::Node(puzzle.add_node(name, IVec2::ZERO)?)
		}
		(EntityKind::Edge, EntityName::Edge(a, b)) => {
			let (a, b) = (find_node(puzzle, a)?, find_node(puzzle, b)?);
			puzzle.add_edge(a, b)?;
			Entity::Other
		}
		(EntityKind::Element(kind), name) => {
			let container = find_container(puzzle, name)?;
			Entity::Element(puzzle.add_element(container, kind, false)?)
		}
		(EntityKind::Item(kind), EntityName::Node(node)) => {
			let node = find_node(puzzle, node)?;
			puzzle.add_item(kind, node)?;
			Entity::Other
		}
		(_, name) => return Err(FormatErrorCode::WrongNameForm(name.to_string())),
	})
}

fn apply_node_fields(
	puzzle: &mut Puzzle,
	node: NodeId,
	mut fields: &[Token],
) -> Result<(), FormatErrorCode> {
	while !fields.is_empty() {
		fields = match fields {
			[Token::Identifier(key), Token::Colon, Token::IntLiteral(x), Token::Comma, Token::IntLiteral(y), rest @ ..]
				if key == "pos" =>
			{
				puzzle.set_node_position(node, IVec2::new(*x, *y));
				rest
			}
			[Token::Identifier(key), Token::Colon, rest @ ..] if key == "notify" => {
				let mut rest = rest;
				loop {
					let (name, after) = take_name(rest)
						.ok_or_else(|| FormatErrorCode::UnexpectedField(key.clone()))?;
					let receiver = puzzle
						.container_element(find_container(puzzle, &name)?)
						.ok_or_else(|| FormatErrorCode::UnknownReceiver(name.to_string()))?;
					puzzle.add_receiver(node, receiver)?;
					match after {
						[Token::Comma, more @ ..] => rest = more,
						_ => break after,
					}
				}
			}
			[token, ..] => return Err(FormatErrorCode::UnexpectedField(token.to_string())),
			[] => break,
		};
	}
	Ok(())
}

fn apply_fields(puzzle: &mut Puzzle, entity: Entity, fields: &[Token]) -> Result<(), FormatErrorCode> {
	match entity {
		Entity::Node(node) => apply_node_fields(puzzle, node, fields),
		Entity::Element(element)
			if puzzle
				.element(element)
				.is_some_and(|element| element.kind.is_dynamic()) =>
		{
			match fields {
				[] => Ok(()),
				[Token::Identifier(value)] if value == "on" || value == "off" => {
					puzzle.set_element_default(element, value == "on");
					Ok(())
				}
				[token, ..] => Err(FormatErrorCode::UnexpectedField(token.to_string())),
			}
		}
		Entity::Element(_) | Entity::Other => match fields {
			[] => Ok(()),
			[token, ..] => Err(FormatErrorCode::UnexpectedField(token.to_string())),
		},
	}
}

/// Reads a puzzle definition.
///
/// All entities are created first and their fields applied afterwards,
/// so a node may notify receivers declared on later lines.
pub fn parse_puzzle(source: &str) -> Result<Puzzle, FormatError> {
	let mut lines = source
		.lines()
		.enumerate()
		.map(|(index, line)| (index + 1, line.trim()));
	let Some((_, name)) = lines.next() else {
		return Err(FormatErrorCode::MissingName.at_line(1));
	};
	let mut puzzle = Puzzle::new(name);

	let mut pending = Vec::new();
	for (line_number, line) in lines.filter(|(_, line)| !(line.is_empty() || line.starts_with('#'))) {
		let statement = lex_line(line)
			.map_err(|(code, slice)| FormatErrorCode::InvalidToken(code, slice))
			.and_then(parse_statement)
			.map_err(|code| code.at_line(line_number))?;
		let entity = add_entity(&mut puzzle, statement.kind, &statement.name)
			.map_err(|code| code.at_line(line_number))?;
		pending.push((line_number, entity, statement.fields));
	}
	for (line_number, entity, fields) in pending {
		apply_fields(&mut puzzle, entity, &fields).map_err(|code| code.at_line(line_number))?;
	}

	log::debug!(
		"Read puzzle {:?} with {} nodes, {} edges and {} items",
		puzzle.name,
		puzzle.nodes().len(),
		puzzle.edges().len(),
		puzzle.items().len()
	);
	Ok(puzzle)
}

/// Writes the text form that [`parse_puzzle`] reads back
impl std::fmt::Display for Puzzle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{}", self.name)?;
		for node in self.nodes() {
			write!(f, "Node {} {{ pos:{},{}", node.name, node.position.x, node.position.y)?;
			let receivers = node
				.receivers
				.iter()
				.filter_map(|&receiver| self.element(receiver))
				.filter_map(|receiver| self.container_name(receiver.container))
				.join(",");
			if !receivers.is_empty() {
				write!(f, " notify:{receivers}")?;
			}
			writeln!(f, " }}")?;
		}
		for edge in self.edges() {
			if let Some(name) = self.container_name(Container::Edge(edge.id)) {
				writeln!(f, "Edge {name} {{ }}")?;
			}
		}
		for element in self.static_elements() {
			if let Some(name) = self.container_name(element.container) {
				writeln!(f, "{} {name} {{ }}", element.kind)?;
			}
		}
		for element in self.dynamic_elements() {
			if let Some(name) = self.container_name(element.container) {
				let value = if element.default_on { "on" } else { "off" };
				writeln!(f, "{} {name} {{ {value} }}", element.kind)?;
			}
		}
		for item in self.items() {
			if let Some(node) = self.node(item.default_node) {
				writeln!(f, "{} {} {{ }}", item.kind, node.name)?;
			}
		}
		Ok(())
	}
}

impl FormatErrorCode {
	pub fn at_line(self, line_number: usize) -> FormatError {
		FormatError {
			code: self,
			line_number,
		}
	}
}

impl From<PuzzleError> for FormatErrorCode {
	fn from(error: PuzzleError) -> Self {
		Self::Definition(error)
	}
}

impl std::fmt::Display for EntityName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Node(name) => f.write_str(name),
			Self::Edge(a, b) => write!(f, "{a}-{b}"),
		}
	}
}

impl std::error::Error for FormatError {}

impl std::fmt::Display for FormatErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MissingName => write!(f, "The puzzle has no name line."),
			Self::InvalidToken(code, slice) => write!(f, "{code} {slice:?}."),
			Self::MalformedStatement => {
				write!(f, "Line does not match the pattern `Kind Name {{ fields }}`.")
			}
			Self::UnknownKind(kind) => write!(f, "Unknown kind {kind}."),
			Self::UnknownNode(name) => write!(f, "There is no node named {name}."),
			Self::UnknownEdge(name) => write!(f, "There is no edge {name}."),
			Self::WrongNameForm(name) => write!(f, "{name} is the wrong kind of name for this entity."),
			Self::UnexpectedField(field) => write!(f, "Unexpected field {field}."),
			Self::UnknownReceiver(name) => write!(f, "{name} holds no element to notify."),
			Self::Definition(error) => write!(f, "{error}"),
		}
	}
}

impl std::fmt::Display for FormatError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Line {}: {}", self.line_number, self.code)
	}
}
