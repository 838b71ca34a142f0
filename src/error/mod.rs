pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;

use std::path::PathBuf;

use crate::error::{interpreter::RuntimeError, parser::ParseError, resolver::CompileError, scanner::ScanError};

/// LoxError is the top-level error type for the Lox interpreter.
///
/// Each pipeline stage fails with its own variant, so the caller can tell a
/// static error from a runtime one when deciding how to exit.
#[derive(thiserror::Error, Debug)]
pub enum LoxError {
	/// Internal interpreter error, should never happen
	#[error("InternalError: {0:#}")]
	InternalError(#[from] anyhow::Error),
	/// The script given on the command line is missing
	#[error("file {} does not exist", .0.display())]
	FileNotFound(PathBuf),
	/// Errors encountered during scanning
	#[error("{}", join_lines(.0))]
	ScanErrors(Vec<ScanError>),
	/// Errors encountered during parsing
	#[error("{}", join_lines(.0))]
	ParseErrors(Vec<ParseError>),
	/// Static errors found by the resolver
	#[error("{}", join_lines(.0))]
	CompileErrors(Vec<CompileError>),
	/// Error encountered during interpretation
	#[error("Runtime error: {0}")]
	RuntimeError(#[from] RuntimeError),
}

impl LoxError {
	/// Process exit code for this error, following the sysexits convention.
	pub fn exit_code(&self) -> u8 {
		match self {
			LoxError::ScanErrors(_) | LoxError::ParseErrors(_) | LoxError::CompileErrors(_) => 65,
			LoxError::FileNotFound(_) => 66,
			LoxError::RuntimeError(_) | LoxError::InternalError(_) => 70,
		}
	}
}

fn join_lines<E: std::fmt::Display>(errors: &[E]) -> String {
	errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		error::{interpreter::RuntimeErrorType, resolver::CompileErrorType, scanner::ScanErrorType},
		scanner::{Token, TokenType},
	};

	#[test]
	fn exit_codes_by_stage() {
		let token = Token::new(TokenType::Identifier, "a", None, 3, 0);
		assert_eq!(LoxError::ScanErrors(vec![ScanError::new(1, 0, ScanErrorType::UnterminatedString)]).exit_code(), 65);
		assert_eq!(LoxError::ParseErrors(vec![ParseError::new(&token, "Expect ';'.")]).exit_code(), 65);
		assert_eq!(
			LoxError::CompileErrors(vec![CompileError::new(&token, CompileErrorType::AlreadyDeclared)]).exit_code(),
			65
		);
		assert_eq!(LoxError::FileNotFound(PathBuf::from("missing.lox")).exit_code(), 66);
		assert_eq!(LoxError::from(RuntimeError::new(&token, RuntimeErrorType::DivisionByZero)).exit_code(), 70);
	}

	#[test]
	fn messages_carry_location() {
		let token = Token::new(TokenType::Identifier, "a", None, 3, 0);
		let error = LoxError::CompileErrors(vec![CompileError::new(&token, CompileErrorType::SelfReferencingInitializer)]);
		assert_eq!(error.to_string(), "[line 3] Error at 'a': Can't read local variable in its own initializer.");

		let eof = Token::eof(7, 40);
		assert_eq!(ParseError::new(&eof, "Expect expression.").to_string(), "[line 7] Error at end: Expect expression.");

		let errors = vec![
			ScanError::new(1, 4, ScanErrorType::UnexpectedCharacter('@')),
			ScanError::new(2, 9, ScanErrorType::UnterminatedString),
		];
		assert_eq!(
			LoxError::ScanErrors(errors).to_string(),
			"[line 1, offset 4] Unexpected character '@'\n[line 2, offset 9] Unterminated string"
		);
	}
}
