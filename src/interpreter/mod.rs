//! Lox tree-walking interpreter.
//!
//! The interpreter walks the statements produced by the parser, evaluating
//! each expression to its runtime value. Variable references the resolver
//! bound to a local scope are read at a fixed distance from the current
//! frame; everything else is looked up in the globals.
//!
//! # Expression Types
//!
//! - **Literals**: `nil`, booleans, numbers, strings
//! - **Unary**: `-` (negation), `!` (logical NOT)
//! - **Binary**: `+`, `-`, `*`, `/`, comparisons, equality
//! - **Logical**: `and`, `or`, short-circuiting and yielding an operand
//! - **Grouping**: Parenthesized expressions
//! - **Variable** and **Assign**
//! - **Call**: user-defined functions only

pub(crate) mod callable;
pub(crate) mod value;

use std::{collections::HashMap, io::Write, rc::Rc};

use Expression::*;
use callable::LoxFunction;
use tracing::trace;
use value::Value;

use crate::{
	environment::{Environment, EnvironmentRef},
	error::interpreter::{RuntimeError, RuntimeErrorType},
	parser::expression::{ExprId, Expression, LiteralValue, LogicalOperator},
	resolver::Locals,
	scanner::{Token, TokenType},
	statement::Statement,
};

/// Most Lox calls that may be active at once. Every call costs several
/// host stack frames, so this bounds host stack use.
const MAX_CALL_DEPTH: usize = 256;

/// How a statement finished. `Return` unwinds every enclosing statement up
/// to the nearest function call.
#[derive(Debug)]
pub(crate) enum Flow {
	Normal,
	Return(Value),
}

/// Evaluates resolved programs, keeping globals alive between runs.
pub struct Interpreter<W: Write> {
	globals:     EnvironmentRef,
	environment: EnvironmentRef,
	locals:      Locals,
	output:      W,
	/// Lox calls currently active.
	depth:       usize,
}

impl<W: Write> Interpreter<W> {
	/// `print` writes one line per statement to `output`.
	pub fn new(output: W) -> Self {
		let globals = Environment::new().into_ref();
		Self { environment: globals.clone(), globals, locals: HashMap::new(), output, depth: 0 }
	}

	pub fn output(&self) -> &W { &self.output }

	pub fn output_mut(&mut self) -> &mut W { &mut self.output }

	/// Merge scope distances computed for a newly parsed program.
	pub fn resolve(&mut self, locals: Locals) { self.locals.extend(locals); }

	/// Execute top-level statements in order. The first runtime error aborts
	/// the rest; bindings made before it stay defined.
	pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
		for statement in statements {
			self.execute(statement)?;
		}
		Ok(())
	}

	fn execute(&mut self, statement: &Statement) -> Result<Flow, RuntimeError> {
		match statement {
			Statement::Expression(expression) => {
				trace!(%expression, "expression statement");
				self.evaluate(expression)?;
			}
			Statement::Print { keyword, value } => {
				let value = self.evaluate(value)?;
				writeln!(self.output, "{value}").map_err(|e| RuntimeError::new(keyword, e.into()))?;
			}
			Statement::VarDeclaration { name_token, initializer } => {
				let value = match initializer {
					Some(initializer) => self.evaluate(initializer)?,
					None => Value::Nil,
				};
				self.environment.borrow_mut().define(&name_token.lexeme, value);
			}
			Statement::Block(statements) => {
				let environment = Environment::with_enclosing(self.environment.clone());
				return self.execute_block(statements, environment);
			}
			Statement::If { condition, then_branch, else_branch } => {
				if self.evaluate(condition)?.is_truthy() {
					return self.execute(then_branch);
				} else if let Some(else_branch) = else_branch {
					return self.execute(else_branch);
				}
			}
			Statement::While { condition, body } => {
				while self.evaluate(condition)?.is_truthy() {
					if let Flow::Return(value) = self.execute(body)? {
						return Ok(Flow::Return(value));
					}
				}
			}
			Statement::FunDecl(declaration) => {
				let function = LoxFunction::new(declaration.clone(), self.environment.clone());
				self.environment.borrow_mut().define(&declaration.name_token.lexeme, Value::Callable(Rc::new(function)));
			}
			Statement::Return { value, .. } => {
				let value = match value {
					Some(value) => self.evaluate(value)?,
					None => Value::Nil,
				};
				return Ok(Flow::Return(value));
			}
		}
		Ok(Flow::Normal)
	}

	/// Run `statements` with `environment` as the current frame. The previous
	/// frame is restored however the block exits.
	pub(crate) fn execute_block(
		&mut self,
		statements: &[Statement],
		environment: Environment,
	) -> Result<Flow, RuntimeError> {
		trace!(statements = statements.len(), "enter frame");
		let previous = std::mem::replace(&mut self.environment, environment.into_ref());
		let result = self.execute_all(statements);
		self.environment = previous;
		result
	}

	fn execute_all(&mut self, statements: &[Statement]) -> Result<Flow, RuntimeError> {
		for statement in statements {
			if let Flow::Return(value) = self.execute(statement)? {
				return Ok(Flow::Return(value));
			}
		}
		Ok(Flow::Normal)
	}

	fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
		Ok(match expression {
			Literal(literal) => match literal {
				LiteralValue::Number(n) => Value::Num(*n),
				LiteralValue::String(s) => Value::Str(s.clone()),
				LiteralValue::Boolean(b) => Value::Bool(*b),
				LiteralValue::Nil => Value::Nil,
			},
			Grouping(expression) => self.evaluate(expression)?,
			Unary { operator, right } => {
				let right = self.evaluate(right)?;
				match (operator.r#type, right) {
					(TokenType::Minus, Value::Num(n)) => Value::Num(-n),
					(TokenType::Bang, right) => Value::Bool(!right.is_truthy()),
					_ => {
						let r#type = RuntimeErrorType::OperandMustBeNumber(operator.lexeme.clone());
						return Err(RuntimeError::new(operator, r#type));
					}
				}
			}
			Binary { left, operator, right } => {
				let left = self.evaluate(left)?;
				let right = self.evaluate(right)?;
				left.binary_op(operator, &right).map_err(|r#type| RuntimeError::new(operator, r#type))?
			}
			Logical { left, operator, right } => {
				let left = self.evaluate(left)?;
				match operator {
					LogicalOperator::Or if left.is_truthy() => left,
					LogicalOperator::And if !left.is_truthy() => left,
					_ => self.evaluate(right)?,
				}
			}
			Variable { id, name } => self.look_up_variable(*id, name)?,
			Assign { id, target, value } => {
				let value = self.evaluate(value)?;
				match self.locals.get(id) {
					Some(&distance) => Environment::assign_at(&self.environment, distance, target, value.clone())?,
					None => self.globals.borrow_mut().assign(target, value.clone())?,
				}
				value
			}
			Call { callee, paren, arguments } => {
				let function = match self.evaluate(callee)? {
					Value::Callable(function) => function,
					other => return Err(RuntimeError::new(paren, RuntimeErrorType::NotCallable(other.to_string()))),
				};
				let arguments = arguments.iter().map(|argument| self.evaluate(argument)).collect::<Result<Vec<_>, _>>()?;
				if arguments.len() != function.arity() {
					let r#type = RuntimeErrorType::ArityMismatch { expected: function.arity(), got: arguments.len() };
					return Err(RuntimeError::new(paren, r#type));
				}
				if self.depth >= MAX_CALL_DEPTH {
					return Err(RuntimeError::new(paren, RuntimeErrorType::StackOverflow));
				}
				self.depth += 1;
				let result = function.call(self, arguments);
				self.depth -= 1;
				result?
			}
		})
	}

	fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value, RuntimeError> {
		match self.locals.get(&id) {
			Some(&distance) => {
				trace!(name = %name.lexeme, distance, "local lookup");
				Environment::get_at(&self.environment, distance, name)
			}
			None => self.globals.borrow().get(name),
		}
	}
}
