use super::*;
use crate::puzzle::ElementKind;

const GATED: &str = "Gated
Node A { pos:0,0 notify:B-C }
Node B { pos:2,-1 }
Node C { pos:4,0 }
Edge A-B { }
Edge B-C { }
Goal C { }
Toggle A { off }
Gate B-C { on }
Player A { }
Ball B { }
";

fn error_code(source: &str) -> (FormatErrorCode, usize) {
	let error = parse_puzzle(source).unwrap_err();
	(error.code, error.line_number)
}

#[test]
fn reads_every_entity() {
	let puzzle = parse_puzzle(GATED).unwrap();
	assert_eq!(puzzle.name, "Gated");
	assert_eq!(puzzle.nodes().len(), 3);
	assert_eq!(puzzle.edges().len(), 2);
	assert_eq!(puzzle.items().len(), 2);

	let b = puzzle.node_by_name("B").unwrap();
	assert_eq!(b.position, IVec2::new(2, -1));

	let gate = &puzzle.dynamic_elements()[1];
	assert_eq!(gate.kind, ElementKind::Gate);
	assert!(gate.default_on);
	assert_eq!(puzzle.container_name(gate.container).as_deref(), Some("B-C"));
	assert_eq!(puzzle.node_by_name("A").unwrap().receivers, vec![gate.id]);

	let toggle = &puzzle.dynamic_elements()[0];
	assert_eq!(toggle.kind, ElementKind::Toggle);
	assert!(!toggle.default_on);
	assert_eq!(puzzle.static_elements()[0].kind, ElementKind::Goal);
}

#[test]
fn writes_what_it_reads() {
	let puzzle = parse_puzzle(GATED).unwrap();
	assert_eq!(puzzle.to_string(), GATED);
}

#[test]
fn accepts_prefixed_kinds_comments_and_blank_lines() {
	let puzzle = parse_puzzle(
		"Old\n\n# written by an older editor\nPuzzleNode A { pos:0,0 }\nPuzzlePlayer A { }\n",
	)
	.unwrap();
	assert_eq!(puzzle.nodes().len(), 1);
	assert_eq!(puzzle.items()[0].kind, ItemKind::Player);
}

#[test]
fn receivers_may_be_declared_later() {
	let puzzle = parse_puzzle(
		"Later\nNode A { pos:0,0 notify:B }\nNode B { pos:1,0 }\nButton A { }\nBridge B { off }\n",
	)
	.unwrap();
	let bridge = puzzle.dynamic_elements()[1].id;
	assert_eq!(puzzle.node_by_name("A").unwrap().receivers, vec![bridge]);
}

#[test]
fn empty_source_has_no_name() {
	assert_eq!(error_code(""), (FormatErrorCode::MissingName, 1));
}

#[test]
fn errors_carry_line_numbers() {
	assert_eq!(
		error_code("P\nNode A { pos:0,0 }\nEdge A-B { }\n"),
		(FormatErrorCode::UnknownNode("B".to_owned()), 3)
	);
	assert_eq!(
		error_code("P\nNode A { pos:0,0 }\n\nTeleporter A { }\n"),
		(FormatErrorCode::UnknownKind("Teleporter".to_owned()), 4)
	);
	assert_eq!(
		error_code("P\nNode A { pos:0,0\n"),
		(FormatErrorCode::MalformedStatement, 2)
	);
}

#[test]
fn rejects_bad_characters() {
	assert!(matches!(
		error_code("P\nNode A { pos:0;0 }\n"),
		(FormatErrorCode::InvalidToken(LexErrorCode::UnexpectedCharacter, _), 2)
	));
}

#[test]
fn rejects_definitions_the_puzzle_refuses() {
	assert!(matches!(
		error_code("P\nNode A { pos:0,0 }\nEdge A-A { }\n"),
		(FormatErrorCode::Definition(PuzzleError::SelfEdge(_)), 3)
	));
	assert!(matches!(
		error_code("P\nNode A { pos:0,0 }\nNode B { pos:1,0 }\nEdge A-B { }\nGate A { off }\n"),
		(FormatErrorCode::Definition(PuzzleError::WrongPlacement { .. }), 5)
	));
	assert!(matches!(
		error_code("P\nNode A { pos:0,0 notify:A }\nGoal A { }\n"),
		(FormatErrorCode::Definition(PuzzleError::NotATrigger(_)), 2)
	));
}

#[test]
fn rejects_misplaced_names_and_fields() {
	assert_eq!(
		error_code("P\nNode A { pos:0,0 }\nNode B { pos:1,0 }\nEdge B-A { }\nWall A-B { }\n"),
		(FormatErrorCode::UnknownEdge("A-B".to_owned()), 5)
	);
	assert_eq!(
		error_code("P\nNode A { pos:0,0 }\nPlayer A-A { }\n"),
		(FormatErrorCode::WrongNameForm("A-A".to_owned()), 3)
	);
	assert_eq!(
		error_code("P\nNode A { pos:0,0 }\nGoal A { on }\n"),
		(FormatErrorCode::UnexpectedField("on".to_owned()), 3)
	);
	assert_eq!(
		error_code("P\nNode A { pos:0,0 notify:B }\nNode B { pos:1,0 }\nButton A { }\n"),
		(FormatErrorCode::UnknownReceiver("B".to_owned()), 2)
	);
}

#[test]
fn error_message_names_the_line() {
	let error = parse_puzzle("P\nNode A { pos:0,0 }\nEdge A-B { }\n").unwrap_err();
	assert_eq!(error.to_string(), "Line 3: There is no node named B.");
}
