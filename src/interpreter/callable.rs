use std::{fmt::Debug, io::Write, rc::Rc};

use tracing::trace;

use crate::{
	environment::{Environment, EnvironmentRef},
	error::interpreter::RuntimeError,
	interpreter::{Flow, Interpreter, value::Value},
	statement::Function,
};

/// A user-defined function together with the frame it was declared in.
pub struct LoxFunction {
	declaration: Rc<Function>,
	closure:     EnvironmentRef,
}

impl Debug for LoxFunction {
	// The closure may hold this very function, so it is not printed.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoxFunction").field("name", &self.name()).field("arity", &self.arity()).finish()
	}
}

impl LoxFunction {
	pub fn new(declaration: Rc<Function>, closure: EnvironmentRef) -> Self { Self { declaration, closure } }

	pub fn name(&self) -> &str { &self.declaration.name_token.lexeme }

	pub fn arity(&self) -> usize { self.declaration.parameters.len() }

	/// Run the body in a fresh frame whose parent is the captured frame, not
	/// the caller's. The arguments must already match the arity.
	pub fn call<W: Write>(&self, interpreter: &mut Interpreter<W>, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
		trace!(function = self.name(), arguments = arguments.len(), "call");
		let mut environment = Environment::with_enclosing(self.closure.clone());
		for (parameter, argument) in self.declaration.parameters.iter().zip(arguments) {
			environment.define(&parameter.lexeme, argument);
		}

		Ok(match interpreter.execute_block(&self.declaration.body, environment)? {
			Flow::Return(value) => value,
			Flow::Normal => Value::Nil,
		})
	}
}
