/// A specific scanning error with its source location and type.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}, offset {offset}] {type}")]
pub struct ScanError {
	/// The line number where the error occurred.
	line:   usize,
	/// Byte offset of the offending character.
	offset: usize,
	/// The type of scanning error.
	r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(line: usize, offset: usize, r#type: ScanErrorType) -> Self { Self { line, offset, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn offset(&self) -> usize { self.offset }

	pub fn r#type(&self) -> &ScanErrorType { &self.r#type }
}

/// Types of scanning errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanErrorType {
	/// A character that cannot start any token.
	UnexpectedCharacter(char),
	/// End of input reached before the closing `"`.
	UnterminatedString,
}

impl std::fmt::Display for ScanErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorType::*;
		match self {
			UnexpectedCharacter(c) => {
				write!(f, "Unexpected character '{c}'")
			}
			UnterminatedString => {
				write!(f, "Unterminated string")
			}
		}
	}
}
