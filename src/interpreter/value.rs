use std::{fmt::Display, rc::Rc};

use Value::*;

use crate::{error::interpreter::RuntimeErrorType, interpreter::callable::LoxFunction, scanner::{Token, TokenType}};

/// Value represents a runtime value in Lox.
#[derive(Debug, Clone)]
pub enum Value {
	Nil,
	Bool(bool),
	Num(f64),
	Str(String),
	Callable(Rc<LoxFunction>),
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Nil => write!(f, "nil"),
			Bool(b) => write!(f, "{b}"),
			Num(n) => write!(f, "{n}"),
			Str(s) => write!(f, "{s}"),
			Callable(function) => write!(f, "<fn {}>", function.name()),
		}
	}
}

/// No implicit coercion: values of different kinds are never equal, and
/// functions are only equal to themselves.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Nil, Nil) => true,
			(Bool(l), Bool(r)) => l == r,
			(Num(l), Num(r)) => l == r,
			(Str(l), Str(r)) => l == r,
			(Callable(l), Callable(r)) => Rc::ptr_eq(l, r),
			_ => false,
		}
	}
}

impl Value {
	/// `nil` and `false` are falsy, everything else (`0` and `""` included)
	/// is truthy.
	pub fn is_truthy(&self) -> bool { !matches!(self, Nil | Bool(false)) }

	/// Performs a binary operation between two values.
	pub fn binary_op(&self, operator: &Token, right: &Self) -> Result<Value, RuntimeErrorType> {
		use TokenType::*;

		match operator.r#type {
			Plus => self.plus(operator, right),
			Minus => self.arithmetic(operator, right, |l, r| l - r),
			Star => self.arithmetic(operator, right, |l, r| l * r),
			Slash => match (self, right) {
				(Num(_), Num(r)) if *r == 0.0 => Err(RuntimeErrorType::DivisionByZero),
				_ => self.arithmetic(operator, right, |l, r| l / r),
			},
			Greater => self.compare(operator, right, |ordering| ordering.is_gt()),
			GreaterEqual => self.compare(operator, right, |ordering| ordering.is_ge()),
			Less => self.compare(operator, right, |ordering| ordering.is_lt()),
			LessEqual => self.compare(operator, right, |ordering| ordering.is_le()),
			EqualEqual => Ok(Bool(self == right)),
			BangEqual => Ok(Bool(self != right)),
			_ => Err(RuntimeErrorType::UnsupportedOperator(operator.lexeme.clone())),
		}
	}

	/// A string on the left concatenates the display form of anything on
	/// the right; otherwise both sides must be numbers.
	fn plus(&self, operator: &Token, right: &Self) -> Result<Value, RuntimeErrorType> {
		match (self, right) {
			(Str(l), r) => Ok(Str(format!("{l}{r}"))),
			(Num(l), Num(r)) => Ok(Num(l + r)),
			_ => Err(RuntimeErrorType::InvalidAddition(operator.lexeme.clone())),
		}
	}

	fn arithmetic(&self, operator: &Token, right: &Self, op: impl Fn(f64, f64) -> f64) -> Result<Value, RuntimeErrorType> {
		match (self, right) {
			(Num(l), Num(r)) => Ok(Num(op(*l, *r))),
			_ => Err(RuntimeErrorType::OperandsMustBeNumbers(operator.lexeme.clone())),
		}
	}

	/// Numbers and strings order natively; `NaN` compares false both ways.
	fn compare(
		&self,
		operator: &Token,
		right: &Self,
		test: impl Fn(std::cmp::Ordering) -> bool,
	) -> Result<Value, RuntimeErrorType> {
		let ordering = match (self, right) {
			(Num(l), Num(r)) => l.partial_cmp(r),
			(Str(l), Str(r)) => Some(l.cmp(r)),
			_ => return Err(RuntimeErrorType::OperandsNotComparable(operator.lexeme.clone())),
		};
		Ok(Bool(ordering.is_some_and(test)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn operator(r#type: TokenType, lexeme: &str) -> Token { Token::new(r#type, lexeme, None, 1, 0) }

	fn apply(left: Value, r#type: TokenType, lexeme: &str, right: Value) -> Result<Value, RuntimeErrorType> {
		left.binary_op(&operator(r#type, lexeme), &right)
	}

	#[test]
	fn truthiness() {
		assert!(!Nil.is_truthy());
		assert!(!Bool(false).is_truthy());
		assert!(Bool(true).is_truthy());
		assert!(Num(0.0).is_truthy());
		assert!(Str(String::new()).is_truthy());
	}

	#[test]
	fn display() {
		assert_eq!(Nil.to_string(), "nil");
		assert_eq!(Bool(true).to_string(), "true");
		assert_eq!(Num(2.0).to_string(), "2");
		assert_eq!(Num(2.5).to_string(), "2.5");
		assert_eq!(Num(-0.125).to_string(), "-0.125");
		assert_eq!(Str("hi".into()).to_string(), "hi");
	}

	#[test]
	fn arithmetic_follows_ieee() {
		assert_eq!(apply(Num(1.0), TokenType::Plus, "+", Num(1.0)).unwrap(), Num(2.0));
		assert_eq!(apply(Num(0.1), TokenType::Plus, "+", Num(0.2)).unwrap(), Num(0.1 + 0.2));
		assert_eq!(apply(Num(5.0), TokenType::Minus, "-", Num(7.5)).unwrap(), Num(-2.5));
		assert_eq!(apply(Num(3.0), TokenType::Star, "*", Num(4.0)).unwrap(), Num(12.0));
		assert_eq!(apply(Num(1.0), TokenType::Slash, "/", Num(4.0)).unwrap(), Num(0.25));
	}

	#[test]
	fn division_by_zero_fails() {
		let error = apply(Num(1.0), TokenType::Slash, "/", Num(0.0)).unwrap_err();
		assert!(matches!(error, RuntimeErrorType::DivisionByZero));
	}

	#[test]
	fn string_concatenation_coerces_right_operand() {
		assert_eq!(apply(Str("a".into()), TokenType::Plus, "+", Str("a".into())).unwrap(), Str("aa".into()));
		assert_eq!(apply(Str("n=".into()), TokenType::Plus, "+", Num(3.0)).unwrap(), Str("n=3".into()));
		assert_eq!(apply(Str("".into()), TokenType::Plus, "+", Nil).unwrap(), Str("nil".into()));
		let error = apply(Num(1.0), TokenType::Plus, "+", Str("a".into())).unwrap_err();
		assert!(matches!(error, RuntimeErrorType::InvalidAddition(op) if op == "+"));
	}

	#[test]
	fn arithmetic_rejects_non_numbers() {
		let error = apply(Str("a".into()), TokenType::Minus, "-", Num(1.0)).unwrap_err();
		assert!(matches!(error, RuntimeErrorType::OperandsMustBeNumbers(op) if op == "-"));
		assert!(apply(Bool(true), TokenType::Star, "*", Num(1.0)).is_err());
	}

	#[test]
	fn comparisons() {
		assert_eq!(apply(Num(1.0), TokenType::Less, "<", Num(2.0)).unwrap(), Bool(true));
		assert_eq!(apply(Num(2.0), TokenType::LessEqual, "<=", Num(2.0)).unwrap(), Bool(true));
		assert_eq!(apply(Num(5.0), TokenType::Greater, ">", Num(2.0)).unwrap(), Bool(true));
		assert_eq!(apply(Num(1.0), TokenType::GreaterEqual, ">=", Num(2.0)).unwrap(), Bool(false));
		assert_eq!(apply(Str("abc".into()), TokenType::Less, "<", Str("abd".into())).unwrap(), Bool(true));
		assert_eq!(apply(Num(f64::NAN), TokenType::Less, "<", Num(1.0)).unwrap(), Bool(false));
		let error = apply(Num(1.0), TokenType::Less, "<", Str("1".into())).unwrap_err();
		assert!(matches!(error, RuntimeErrorType::OperandsNotComparable(op) if op == "<"));
	}

	#[test]
	fn equality_without_coercion() {
		assert_eq!(apply(Num(1.0), TokenType::EqualEqual, "==", Str("1".into())).unwrap(), Bool(false));
		assert_eq!(apply(Nil, TokenType::EqualEqual, "==", Nil).unwrap(), Bool(true));
		assert_eq!(apply(Nil, TokenType::EqualEqual, "==", Bool(false)).unwrap(), Bool(false));
		assert_eq!(apply(Num(1.0), TokenType::BangEqual, "!=", Num(2.0)).unwrap(), Bool(true));
		assert_eq!(apply(Str("a".into()), TokenType::EqualEqual, "==", Str("a".into())).unwrap(), Bool(true));
	}
}
