use crate::scanner::Token;

/// A static error found by the resolver before anything is evaluated.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}] Error at '{lexeme}': {type}")]
pub struct CompileError {
	line:   usize,
	lexeme: String,
	r#type: CompileErrorType,
}

impl CompileError {
	pub fn new(token: &Token, r#type: CompileErrorType) -> Self {
		Self { line: token.line, lexeme: token.lexeme.clone(), r#type }
	}

	pub fn line(&self) -> usize { self.line }

	pub fn r#type(&self) -> &CompileErrorType { &self.r#type }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileErrorType {
	#[error("Can't read local variable in its own initializer.")]
	SelfReferencingInitializer,
	#[error("Already a variable with this name in this scope.")]
	AlreadyDeclared,
	#[error("Can't return from top-level code.")]
	ReturnOutsideFunction,
}
