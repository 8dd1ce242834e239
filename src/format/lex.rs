//! Tokenization of single lines of a puzzle definition

use logos::Logos;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LexErrorCode {
	#[default]
	UnexpectedCharacter,
	IntParseFailure,
}

#[derive(Logos, Clone, PartialEq, Eq, Debug)]
#[logos(skip r"[ \t\r]+")]
#[logos(error = LexErrorCode)]
pub enum Token {
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
	Identifier(String),

	#[regex(r"-?[0-9]+", |lex| lex.slice().parse())]
	IntLiteral(i32),

	#[token("{")]
	OpenBrace,
	#[token("}")]
	CloseBrace,
	#[token("-")]
	Minus,
	#[token(":")]
	Colon,
	#[token(",")]
	Comma,
}

/// Splits a line into tokens, failing with the offending slice
pub fn lex_line(line: &str) -> Result<Vec<Token>, (LexErrorCode, String)> {
	let mut lexer = Token::lexer(line);
	let mut tokens = Vec::new();
	while let Some(token) = lexer.next() {
		match token {
			Ok(token) => tokens.push(token),
			Err(code) => return Err((code, lexer.slice().to_owned())),
		}
	}
	Ok(tokens)
}

impl From<std::num::ParseIntError> for LexErrorCode {
	fn from(_: std::num::ParseIntError) -> Self {
		Self::IntParseFailure
	}
}

impl std::fmt::Display for LexErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnexpectedCharacter => f.write_str("Unexpected character"),
			Self::IntParseFailure => f.write_str("Invalid integer literal"),
		}
	}
}

impl std::fmt::Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Identifier(name) => f.write_str(name),
			Self::IntLiteral(value) => write!(f, "{value}"),
			Self::OpenBrace => f.write_str("{"),
			Self::CloseBrace => f.write_str("}"),
			Self::Minus => f.write_str("-"),
			Self::Colon => f.write_str(":"),
			Self::Comma => f.write_str(","),
		}
	}
}
