use crate::scanner::Token;

/// A syntax error located at the offending token.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error {location}: {message}")]
pub struct ParseError {
	line:     usize,
	/// `at end` for the end of input, `at '<lexeme>'` otherwise.
	location: String,
	message:  String,
}

impl ParseError {
	pub fn new(token: &Token, message: impl Into<String>) -> Self {
		let location = if token.is_eof() { "at end".to_string() } else { format!("at '{}'", token.lexeme) };
		Self { line: token.line, location, message: message.into() }
	}

	pub fn line(&self) -> usize { self.line }

	pub fn message(&self) -> &str { &self.message }

	pub fn is_at_end(&self) -> bool { self.location == "at end" }
}
