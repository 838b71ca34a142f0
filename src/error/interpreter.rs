use crate::scanner::Token;

/// An error raised while evaluating a program.
#[derive(thiserror::Error, Debug)]
#[error("[line {line}] {type}")]
pub struct RuntimeError {
	line:   usize,
	r#type: RuntimeErrorType,
}

impl RuntimeError {
	pub fn new(token: &Token, r#type: RuntimeErrorType) -> Self { Self { line: token.line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn r#type(&self) -> &RuntimeErrorType { &self.r#type }
}

#[derive(thiserror::Error, Debug)]
/// Errors that can occur during interpretation
pub enum RuntimeErrorType {
	/// Unary `-` applied to a non-number
	#[error("Operand of '{0}' must be a number.")]
	OperandMustBeNumber(String),
	/// Arithmetic on non-numbers
	#[error("Operands of '{0}' must be numbers.")]
	OperandsMustBeNumbers(String),
	/// Ordering between values of different kinds
	#[error("Operands of '{0}' must be two numbers or two strings.")]
	OperandsNotComparable(String),
	/// `+` with a non-string left operand and a non-number on either side
	#[error("Operands of '{0}' must be two numbers, or a string followed by any value.")]
	InvalidAddition(String),
	/// An operator token the evaluator has no rule for
	#[error("Unsupported binary operator '{0}'.")]
	UnsupportedOperator(String),
	#[error("Division by zero.")]
	DivisionByZero,
	#[error("Undefined variable '{0}'.")]
	UndefinedVariable(String),
	#[error("Can only call functions, not '{0}'.")]
	NotCallable(String),
	#[error("Expected {expected} arguments but got {got}.")]
	ArityMismatch { expected: usize, got: usize },
	/// Lox calls nested past the interpreter's limit
	#[error("Stack overflow.")]
	StackOverflow,
	/// The `print` sink refused the write
	#[error("Failed to write output: {0}")]
	Output(#[from] std::io::Error),
}
