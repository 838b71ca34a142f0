//! Static variable resolution.
//!
//! One pass over the whole program before anything runs. Every variable
//! reference that names a local binding gets the number of scopes between it
//! and that binding; references left out of the table are globals. The pass
//! also rejects programs that are syntactically fine but meaningless.

use std::collections::HashMap;

use tracing::debug;

use crate::{
	LoxError,
	error::resolver::{CompileError, CompileErrorType},
	parser::expression::{ExprId, Expression},
	scanner::Token,
	statement::{Function, Statement},
};

/// Scope distance for each resolved local reference.
pub type Locals = HashMap<ExprId, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
	None,
	Function,
}

pub struct Resolver {
	/// Innermost last. A name maps to whether its initializer has finished.
	scopes:           Vec<HashMap<String, bool>>,
	current_function: FunctionType,
	locals:           Locals,
	errors:           Vec<CompileError>,
}

impl Resolver {
	pub fn new() -> Self {
		Self { scopes: Vec::new(), current_function: FunctionType::None, locals: HashMap::new(), errors: Vec::new() }
	}

	/// Resolve a whole program, collecting every error before failing.
	pub fn resolve(mut self, statements: &[Statement]) -> Result<Locals, LoxError> {
		self.resolve_statements(statements);
		if self.errors.is_empty() { Ok(self.locals) } else { Err(LoxError::CompileErrors(self.errors)) }
	}

	fn resolve_statements(&mut self, statements: &[Statement]) {
		for statement in statements {
			self.resolve_statement(statement);
		}
	}

	fn resolve_statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Block(statements) => {
				self.begin_scope();
				self.resolve_statements(statements);
				self.end_scope();
			}
			Statement::VarDeclaration { name_token, initializer } => {
				self.declare(name_token);
				if let Some(initializer) = initializer {
					self.resolve_expression(initializer);
				}
				self.define(name_token);
			}
			Statement::FunDecl(function) => {
				// Defined before the body so the function can call itself.
				self.declare(&function.name_token);
				self.define(&function.name_token);
				self.resolve_function(function, FunctionType::Function);
			}
			Statement::Expression(expression) | Statement::Print { value: expression, .. } => {
				self.resolve_expression(expression)
			}
			Statement::If { condition, then_branch, else_branch } => {
				self.resolve_expression(condition);
				self.resolve_statement(then_branch);
				if let Some(else_branch) = else_branch {
					self.resolve_statement(else_branch);
				}
			}
			Statement::While { condition, body } => {
				self.resolve_expression(condition);
				self.resolve_statement(body);
			}
			Statement::Return { keyword, value } => {
				if self.current_function == FunctionType::None {
					self.errors.push(CompileError::new(keyword, CompileErrorType::ReturnOutsideFunction));
				}
				if let Some(value) = value {
					self.resolve_expression(value);
				}
			}
		}
	}

	fn resolve_expression(&mut self, expression: &Expression) {
		match expression {
			Expression::Literal(_) => {}
			Expression::Grouping(inner) => self.resolve_expression(inner),
			Expression::Unary { right, .. } => self.resolve_expression(right),
			Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
				self.resolve_expression(left);
				self.resolve_expression(right);
			}
			Expression::Variable { id, name } => {
				let initializing = self.scopes.last().and_then(|scope| scope.get(&name.lexeme)) == Some(&false);
				if initializing {
					self.errors.push(CompileError::new(name, CompileErrorType::SelfReferencingInitializer));
				}
				self.resolve_local(*id, name);
			}
			Expression::Assign { id, target, value } => {
				self.resolve_expression(value);
				self.resolve_local(*id, target);
			}
			Expression::Call { callee, arguments, .. } => {
				self.resolve_expression(callee);
				for argument in arguments {
					self.resolve_expression(argument);
				}
			}
		}
	}

	fn resolve_function(&mut self, function: &Function, r#type: FunctionType) {
		let enclosing = std::mem::replace(&mut self.current_function, r#type);
		self.begin_scope();
		for parameter in &function.parameters {
			self.declare(parameter);
			self.define(parameter);
		}
		self.resolve_statements(&function.body);
		self.end_scope();
		self.current_function = enclosing;
	}

	/// Record how many scopes out `name` is bound. Not finding it in any scope
	/// means it is global.
	fn resolve_local(&mut self, id: ExprId, name: &Token) {
		for (distance, scope) in self.scopes.iter().rev().enumerate() {
			if scope.contains_key(&name.lexeme) {
				debug!(name = %name.lexeme, line = name.line, distance, "resolved local");
				self.locals.insert(id, distance);
				return;
			}
		}
		debug!(name = %name.lexeme, line = name.line, "assumed global");
	}

	fn begin_scope(&mut self) { self.scopes.push(HashMap::new()); }

	fn end_scope(&mut self) { self.scopes.pop(); }

	/// Globals may be redeclared freely, locals may not.
	fn declare(&mut self, name: &Token) {
		let Some(scope) = self.scopes.last_mut() else {
			return;
		};
		if scope.contains_key(&name.lexeme) {
			self.errors.push(CompileError::new(name, CompileErrorType::AlreadyDeclared));
			return;
		}
		scope.insert(name.lexeme.clone(), false);
	}

	fn define(&mut self, name: &Token) {
		if let Some(scope) = self.scopes.last_mut() {
			scope.insert(name.lexeme.clone(), true);
		}
	}
}
