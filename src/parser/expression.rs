//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `-123 *
//! (45.67)` as nested nodes.

use std::sync::atomic::{AtomicUsize, Ordering};

use Expression::*;

use crate::scanner::Token;

/// Identity of a variable-referencing expression node.
///
/// The resolver keys its distance table by node identity, not by structure:
/// two `a` references in different scopes look the same but must resolve
/// independently. Ids are unique for the whole process so that ASTs parsed
/// on different REPL lines can share one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

impl ExprId {
	pub fn fresh() -> Self { Self(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed)) }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
	And,
	Or,
}

#[allow(clippy::enum_variant_names)]
/// Expression AST nodes
#[derive(Debug)]
pub enum Expression {
	Literal(LiteralValue),
	Grouping(Box<Expression>),
	Unary { operator: Token, right: Box<Expression> },
	Binary { left: Box<Expression>, operator: Token, right: Box<Expression> },
	Logical { left: Box<Expression>, operator: LogicalOperator, right: Box<Expression> },
	Variable { id: ExprId, name: Token },
	Assign { id: ExprId, target: Token, value: Box<Expression> },
	/// `paren` is the closing parenthesis, kept to locate call errors.
	Call { callee: Box<Expression>, paren: Token, arguments: Vec<Expression> },
}

impl Expression {
	pub fn unary(operator: Token, right: Box<Self>) -> Box<Self> { Box::new(Unary { operator, right }) }

	pub fn binary(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Binary { left, operator, right })
	}

	pub fn grouping(expr: Box<Self>) -> Box<Self> { Box::new(Grouping(expr)) }

	pub fn variable(name: Token) -> Box<Self> { Box::new(Variable { id: ExprId::fresh(), name }) }

	pub fn assign(target: Token, value: Box<Self>) -> Box<Self> {
		Box::new(Assign { id: ExprId::fresh(), target, value })
	}

	pub fn logical(left: Box<Self>, operator: LogicalOperator, right: Box<Self>) -> Box<Self> {
		Box::new(Logical { left, operator, right })
	}

	pub fn call(callee: Box<Self>, paren: Token, arguments: Vec<Self>) -> Box<Self> {
		Box::new(Call { callee, paren, arguments })
	}

	pub fn literal(value: LiteralValue) -> Box<Self> { Box::new(Literal(value)) }
}

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Number(f64),
	String(String),
	Boolean(bool),
	Nil,
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal(lit) => write!(f, "{lit}"),
			Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
			Binary { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Grouping(expression) => write!(f, "(group {expression})"),
			Variable { name, .. } => write!(f, "{}", name.lexeme),
			Assign { target, value, .. } => write!(f, "(= {} {value})", target.lexeme),
			Logical { left, operator, right } => write!(f, "({operator} {left} {right})"),
			Call { callee, arguments, .. } => write!(
				f,
				"(call {callee}{})",
				arguments.iter().map(|arg| format!(" {arg}")).collect::<Vec<String>>().join("")
			),
		}
	}
}

impl std::fmt::Display for LogicalOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LogicalOperator::And => write!(f, "and"),
			LogicalOperator::Or => write!(f, "or"),
		}
	}
}

impl std::fmt::Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Number(n) => write!(f, "{n}"),
			LiteralValue::String(s) => write!(f, "\"{s}\""),
			LiteralValue::Boolean(b) => write!(f, "{b}"),
			LiteralValue::Nil => write!(f, "nil"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::TokenType;

	fn name(lexeme: &str) -> Token { Token::new(TokenType::Identifier, lexeme, None, 1, 0) }

	#[test]
	fn identical_references_get_distinct_ids() {
		let (Variable { id: first, .. }, Variable { id: second, .. }) =
			(*Expression::variable(name("a")), *Expression::variable(name("a")))
		else {
			panic!("expected variable expressions");
		};
		assert_ne!(first, second);
	}

	#[test]
	fn display_prefix_form() {
		let plus = Token::new(TokenType::Plus, "+", None, 1, 0);
		let expr = Expression::logical(
			Expression::binary(Expression::literal(LiteralValue::Number(1.5)), plus, Expression::variable(name("x"))),
			LogicalOperator::Or,
			Expression::assign(name("y"), Expression::literal(LiteralValue::String("s".into()))),
		);
		assert_eq!(expr.to_string(), "(or (+ 1.5 x) (= y \"s\"))");
	}
}
