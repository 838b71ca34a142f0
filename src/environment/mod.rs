//! Runtime scopes.
//!
//! A frame is shared, never owned, by the frames nested in it and by every
//! closure created while it was active, so it stays alive as long as any of
//! them does. A function that stores itself in the frame it captured forms
//! an `Rc` cycle; that frame is leaked for the rest of the session.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
	error::interpreter::{RuntimeError, RuntimeErrorType},
	interpreter::value::Value,
	scanner::Token,
};

/// Shared handle to a frame.
pub type EnvironmentRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
	values:    HashMap<String, Value>,
	enclosing: Option<EnvironmentRef>,
}

impl Environment {
	/// The root frame, it has no parent.
	pub fn new() -> Self { Self::default() }

	pub fn with_enclosing(enclosing: EnvironmentRef) -> Self {
		Self { values: HashMap::new(), enclosing: Some(enclosing) }
	}

	pub fn into_ref(self) -> EnvironmentRef { Rc::new(RefCell::new(self)) }

	/// A variable statement doesn’t just define a new variable, it can also be
	/// used to redefine an existing variable in the same frame.
	pub fn define(&mut self, name: &str, value: Value) { self.values.insert(name.to_string(), value); }

	/// Look `name` up in this frame, then in each ancestor outwards.
	pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
		if let Some(value) = self.values.get(&name.lexeme) {
			return Ok(value.clone());
		}
		match &self.enclosing {
			Some(enclosing) => enclosing.borrow().get(name),
			None => Err(undefined(name)),
		}
	}

	/// Assign a value to an existing variable in the nearest frame holding
	/// it. Assignment never creates a binding.
	pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
		if let Some(slot) = self.values.get_mut(&name.lexeme) {
			*slot = value;
			return Ok(());
		}
		match &self.enclosing {
			Some(enclosing) => enclosing.borrow_mut().assign(name, value),
			None => Err(undefined(name)),
		}
	}

	/// Read `name` from the frame exactly `distance` hops up, without
	/// searching further.
	pub fn get_at(environment: &EnvironmentRef, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
		let frame = Self::ancestor(environment, distance, name)?;
		let value = frame.borrow().values.get(&name.lexeme).cloned();
		value.ok_or_else(|| undefined(name))
	}

	/// Overwrite `name` in the frame exactly `distance` hops up.
	pub fn assign_at(
		environment: &EnvironmentRef,
		distance: usize,
		name: &Token,
		value: Value,
	) -> Result<(), RuntimeError> {
		let frame = Self::ancestor(environment, distance, name)?;
		let mut frame = frame.borrow_mut();
		let slot = frame.values.get_mut(&name.lexeme).ok_or_else(|| undefined(name))?;
		*slot = value;
		Ok(())
	}

	fn ancestor(environment: &EnvironmentRef, distance: usize, name: &Token) -> Result<EnvironmentRef, RuntimeError> {
		let mut frame = environment.clone();
		for _ in 0..distance {
			let enclosing = frame.borrow().enclosing.clone().ok_or_else(|| undefined(name))?;
			frame = enclosing;
		}
		Ok(frame)
	}
}

fn undefined(name: &Token) -> RuntimeError {
	RuntimeError::new(name, RuntimeErrorType::UndefinedVariable(name.lexeme.clone()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::TokenType;

	fn name(lexeme: &str) -> Token { Token::new(TokenType::Identifier, lexeme, None, 1, 0) }

	fn number(value: &Value) -> f64 {
		match value {
			Value::Num(n) => *n,
			other => panic!("expected a number, got {other:?}"),
		}
	}

	#[test]
	fn lookup_walks_ancestors() {
		let parent = Environment::new().into_ref();
		parent.borrow_mut().define("loop", Value::Num(1.0));
		let child = Environment::with_enclosing(parent.clone()).into_ref();
		let grandchild = Environment::with_enclosing(child.clone());

		assert_eq!(number(&child.borrow().get(&name("loop")).unwrap()), 1.0);
		assert_eq!(number(&grandchild.get(&name("loop")).unwrap()), 1.0);
	}

	#[test]
	fn undefined_lookup_fails() {
		let environment = Environment::new();
		let error = environment.get(&name("missing")).unwrap_err();
		assert!(matches!(error.r#type(), RuntimeErrorType::UndefinedVariable(n) if n == "missing"));
	}

	#[test]
	fn redefinition_overwrites_in_same_frame() {
		let mut environment = Environment::new();
		environment.define("a", Value::Num(1.0));
		environment.define("a", Value::Num(2.0));
		assert_eq!(number(&environment.get(&name("a")).unwrap()), 2.0);
	}

	#[test]
	fn assign_mutates_ancestor_seen_by_sibling() {
		let parent = Environment::new().into_ref();
		parent.borrow_mut().define("x", Value::Num(1.0));
		let mut left = Environment::with_enclosing(parent.clone());
		let right = Environment::with_enclosing(parent.clone());

		left.assign(&name("x"), Value::Num(5.0)).unwrap();

		assert!(left.values.is_empty());
		assert_eq!(number(&right.get(&name("x")).unwrap()), 5.0);
		assert_eq!(number(&parent.borrow().get(&name("x")).unwrap()), 5.0);
	}

	#[test]
	fn assign_never_creates_a_binding() {
		let mut environment = Environment::new();
		assert!(environment.assign(&name("y"), Value::Nil).is_err());
		assert!(environment.get(&name("y")).is_err());
	}

	#[test]
	fn distance_access_skips_shadowing_frames() {
		let global = Environment::new().into_ref();
		global.borrow_mut().define("a", Value::Num(1.0));
		let block = Environment::with_enclosing(global.clone()).into_ref();
		block.borrow_mut().define("a", Value::Num(2.0));

		assert_eq!(number(&Environment::get_at(&block, 0, &name("a")).unwrap()), 2.0);
		assert_eq!(number(&Environment::get_at(&block, 1, &name("a")).unwrap()), 1.0);

		Environment::assign_at(&block, 1, &name("a"), Value::Num(3.0)).unwrap();
		assert_eq!(number(&global.borrow().get(&name("a")).unwrap()), 3.0);
		assert_eq!(number(&block.borrow().get(&name("a")).unwrap()), 2.0);
	}

	#[test]
	fn distance_access_does_not_search_ancestors() {
		let global = Environment::new().into_ref();
		global.borrow_mut().define("a", Value::Num(1.0));
		let block = Environment::with_enclosing(global).into_ref();

		assert!(Environment::get_at(&block, 0, &name("a")).is_err());
		assert!(Environment::get_at(&block, 5, &name("a")).is_err());
		assert!(Environment::assign_at(&block, 0, &name("a"), Value::Nil).is_err());
	}
}
