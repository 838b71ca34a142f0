//! # How bare text becomes a running Lox program
//!
//! User's source code: `var average = (min + max) / 2;`

//! ## Scanning
//!
//! Also known as `lexing` or `lexical analysis`, takes in the characters and
//! converts them into tokens. Single characters `(`, `,`, `.`, numbers `123`,
//! string literals `"hi!"`, identifiers `min` are all tokens.
//!
//! Whitespaces and comments are ignored. So the tokens are
//! `["var", "average", "=", "(", "min", "+", "max", ")", "/", "2", ";"]`.

//! ## Parsing
//!
//! A `parser` builds a tree structure of tokens, the `abstract syntax tree`
//! or `AST`, and reports `syntax errors`.
//!
//! ``` markdown
//! average (Statement::VarDeclaration)
//! └── / (Expression::Binary)
//!     ├── + (Expression::Binary)
//!     │   ├── min (Expression::Variable)
//!     │   └── max (Expression::Variable)
//!     └── 2 (Expression::Literal)
//! ```

//! ## Resolution
//!
//! Where we find out which declaration each name refers to. Every reference
//! to a local variable is bound to the number of scopes between it and its
//! declaration; references bound to nothing are globals. Programs that
//! parse but make no sense, like `return` at top level, are rejected here.

//! ## Tree-walk interpretation
//!
//! Execute the AST right after resolving it. Function values capture the
//! frame they were declared in, so closures see the variables around them
//! for as long as they live.

pub mod cli;
mod environment;
mod error;
mod interpreter;
mod loxer;
mod parser;
mod resolver;
mod scanner;
mod statement;

pub use error::{
	LoxError,
	interpreter::{RuntimeError, RuntimeErrorType},
	parser::ParseError,
	resolver::{CompileError, CompileErrorType},
	scanner::{ScanError, ScanErrorType},
};
pub use loxer::Loxer;
