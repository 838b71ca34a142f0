//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `while` loop is always a statement.

use std::rc::Rc;

use crate::{parser::expression::Expression, scanner::Token};

/// A statement in the programming language.
#[derive(Debug)]
pub enum Statement {
	/// An expression used as a statement.
	Expression(Expression),
	/// A print statement.
	Print {
		keyword: Token,
		value:   Expression,
	},
	/// A variable declaration statement.
	VarDeclaration {
		/// The token of the variable being declared.
		name_token:  Token,
		/// An optional initializer expression.
		initializer: Option<Expression>,
	},
	/// A block of statements, run in its own scope.
	Block(Vec<Statement>),
	If {
		condition:   Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
	},
	While {
		condition: Expression,
		body:      Box<Statement>,
	},
	FunDecl(Rc<Function>),
	/// A return statement.
	Return {
		/// Locates `return` outside of any function.
		keyword: Token,
		value:   Option<Expression>,
	},
}

/// A function declaration. Shared between the AST and every closure created
/// from it, so it outlives the program that declared it.
#[derive(Debug)]
pub struct Function {
	pub name_token: Token,
	pub parameters: Vec<Token>,
	pub body:       Vec<Statement>,
}
