//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Expression` or `Statement`
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assignment|=|Right
//! Or|or|Left
//! And|and|Left
//! Equality|== !=|Left
//! Comparison|< > <= >=|Left
//! Term|+ -|Left
//! Factor|* /|Left
//! Unary|! -|Right
//! Call|()|Left
//!
//! Grammar:
//!
//! ``` BNF
//! program        → declaration* EOF ;
//! declaration    → funDecl | varDecl | statement ;
//! funDecl        → "fun" IDENTIFIER "(" parameters? ")" block ;
//! varDecl        → "var" IDENTIFIER ( "=" expression )? ";" ;
//! statement      → exprStmt | forStmt | ifStmt | printStmt | returnStmt | whileStmt | block ;
//! forStmt        → "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement ;
//! block          → "{" declaration* "}" ;
//! expression     → assignment ;
//! assignment     → IDENTIFIER "=" assignment | logic_or ;
//! logic_or       → logic_and ( "or" logic_and )* ;
//! logic_and      → equality ( "and" equality )* ;
//! equality       → comparison ( ( "!=" | "==" ) comparison )* ;
//! comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
//! term           → factor ( ( "-" | "+" ) factor )* ;
//! factor         → unary ( ( "/" | "*" ) unary )* ;
//! unary          → ( "!" | "-" ) unary | call ;
//! call           → primary ( "(" arguments? ")" )* ;
//! primary        → NUMBER | STRING | "true" | "false" | "nil" | IDENTIFIER | "(" expression ")" ;
//! ```
//!
//! On a syntax error the parser records it, discards tokens up to the next
//! statement boundary and carries on, so one run reports every error.
//! Nesting deeper than `MAX_NESTING` levels is reported as a syntax error
//! rather than overflowing the stack of any later pass.

pub(crate) mod expression;

use std::rc::Rc;

use TokenType::*;

use crate::{
	LoxError,
	error::parser::ParseError,
	parser::expression::{Expression, LiteralValue, LogicalOperator},
	scanner::{Literal, Token, TokenType},
	statement::{Function, Statement},
};

/// Most arguments a call, or parameters a function, may have.
const MAX_ARGUMENTS: usize = 255;

/// Deepest the syntax tree may nest. The parser, resolver and evaluator all
/// recurse once per level.
const MAX_NESTING: usize = 200;

/// Recursive-descent parser over a scanned token sequence.
pub struct Parser {
	tokens:  Vec<Token>,
	current: usize,
	/// Handed out once the token sequence is exhausted.
	eof:     Token,
	errors:  Vec<ParseError>,
	/// Nesting level of the node being parsed.
	depth:   usize,
}

impl Parser {
	pub fn new(tokens: Vec<Token>) -> Self {
		let eof = tokens.last().map_or_else(
			|| Token::eof(1, 0),
			|last| Token::eof(last.line, last.offset + last.lexeme.len()),
		);
		Self { tokens, current: 0, eof, errors: Vec::new(), depth: 0 }
	}

	/// Parse the whole token sequence into statements.
	pub fn parse(mut self) -> Result<Vec<Statement>, LoxError> {
		let mut statements = Vec::new();
		while !self.is_at_end() {
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		if self.errors.is_empty() { Ok(statements) } else { Err(LoxError::ParseErrors(self.errors)) }
	}

	/// Parse a declaration, recovering at the next statement boundary on error.
	fn declaration(&mut self) -> Option<Statement> {
		let depth = self.depth;
		let result = if self.match_tokens(&[Fun]) {
			self.function().map(Statement::FunDecl)
		} else if self.match_tokens(&[Var]) {
			self.var_declaration()
		} else if self.check(Class) {
			Err(ParseError::new(self.peek(), "Classes are not supported."))
		} else {
			self.statement()
		};

		match result {
			Ok(statement) => Some(statement),
			Err(error) => {
				self.errors.push(error);
				// Levels entered below here were abandoned by the error.
				self.depth = depth;
				self.synchronize();
				None
			}
		}
	}

	fn function(&mut self) -> Result<Rc<Function>, ParseError> {
		let name_token = self.consume(Identifier, "Expect function name.")?;
		self.consume(LeftParen, "Expect '(' after function name.")?;
		let mut parameters = Vec::new();
		if !self.check(RightParen) {
			loop {
				if parameters.len() >= MAX_ARGUMENTS {
					let error = ParseError::new(self.peek(), "Can't have more than 255 parameters.");
					self.errors.push(error);
				}
				parameters.push(self.consume(Identifier, "Expect parameter name.")?);
				if !self.match_tokens(&[Comma]) {
					break;
				}
			}
		}
		self.consume(RightParen, "Expect ')' after parameters.")?;
		self.consume(LeftBrace, "Expect '{' before function body.")?;
		let body = self.nested(Self::block)?;
		Ok(Rc::new(Function { name_token, parameters, body }))
	}

	fn var_declaration(&mut self) -> Result<Statement, ParseError> {
		let name_token = self.consume(Identifier, "Expect variable name.")?;
		let initializer = if self.match_tokens(&[Equal]) { Some(*self.expression()?) } else { None };
		self.consume(Semicolon, "Expect ';' after variable declaration.")?;
		Ok(Statement::VarDeclaration { name_token, initializer })
	}

	fn statement(&mut self) -> Result<Statement, ParseError> {
		let r#type = self.peek().r#type;
		match r#type {
			For => {
				self.advance();
				self.for_statement()
			}
			If => {
				self.advance();
				self.if_statement()
			}
			Print => {
				let keyword = self.advance();
				let value = self.expression()?;
				self.consume(Semicolon, "Expect ';' after value.")?;
				Ok(Statement::Print { keyword, value: *value })
			}
			Return => {
				let keyword = self.advance();
				let value = if self.check(Semicolon) { None } else { Some(*self.expression()?) };
				self.consume(Semicolon, "Expect ';' after return value.")?;
				Ok(Statement::Return { keyword, value })
			}
			While => {
				self.advance();
				self.consume(LeftParen, "Expect '(' after 'while'.")?;
				let condition = self.expression()?;
				self.consume(RightParen, "Expect ')' after condition.")?;
				let body = self.nested(Self::statement)?;
				Ok(Statement::While { condition: *condition, body: Box::new(body) })
			}
			LeftBrace => {
				self.advance();
				Ok(Statement::Block(self.nested(Self::block)?))
			}
			_ => self.expression_statement(),
		}
	}

	/// `for` has no node of its own: it becomes a `while` inside blocks.
	fn for_statement(&mut self) -> Result<Statement, ParseError> {
		self.consume(LeftParen, "Expect '(' after 'for'.")?;
		let initializer = if self.match_tokens(&[Semicolon]) {
			None
		} else if self.match_tokens(&[Var]) {
			Some(self.var_declaration()?)
		} else {
			Some(self.expression_statement()?)
		};

		let condition = if self.check(Semicolon) { None } else { Some(*self.expression()?) };
		self.consume(Semicolon, "Expect ';' after loop condition.")?;

		let increment = if self.check(RightParen) { None } else { Some(*self.expression()?) };
		self.consume(RightParen, "Expect ')' after for clauses.")?;

		let mut body = self.nested(Self::statement)?;
		if let Some(increment) = increment {
			body = Statement::Block(vec![body, Statement::Expression(increment)]);
		}
		let condition = condition.unwrap_or(Expression::Literal(LiteralValue::Boolean(true)));
		body = Statement::While { condition, body: Box::new(body) };
		if let Some(initializer) = initializer {
			body = Statement::Block(vec![initializer, body]);
		}
		Ok(body)
	}

	fn if_statement(&mut self) -> Result<Statement, ParseError> {
		self.consume(LeftParen, "Expect '(' after 'if'.")?;
		let condition = self.expression()?;
		self.consume(RightParen, "Expect ')' after if condition.")?;
		let then_branch = Box::new(self.nested(Self::statement)?);
		let else_branch =
			if self.match_tokens(&[Else]) { Some(Box::new(self.nested(Self::statement)?)) } else { None };
		Ok(Statement::If { condition: *condition, then_branch, else_branch })
	}

	fn expression_statement(&mut self) -> Result<Statement, ParseError> {
		let expression = self.expression()?;
		self.consume(Semicolon, "Expect ';' after expression.")?;
		Ok(Statement::Expression(*expression))
	}

	/// Statements up to and including the closing `}`.
	fn block(&mut self) -> Result<Vec<Statement>, ParseError> {
		let mut statements = Vec::new();
		while !self.check(RightBrace) && !self.is_at_end() {
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		self.consume(RightBrace, "Expect '}' after block.")?;
		Ok(statements)
	}

	fn expression(&mut self) -> Result<Box<Expression>, ParseError> { self.nested(Self::assignment) }

	/// Assignment is right-associative: the value side recurses.
	fn assignment(&mut self) -> Result<Box<Expression>, ParseError> {
		let expression = self.or()?;
		if !self.check(Equal) {
			return Ok(expression);
		}

		let equals = self.advance();
		let value = self.nested(Self::assignment)?;
		match *expression {
			Expression::Variable { name, .. } => Ok(Expression::assign(name, value)),
			target => {
				// Reported without unwinding, the parser is not confused.
				self.errors.push(ParseError::new(&equals, "Invalid assignment target."));
				Ok(Box::new(target))
			}
		}
	}

	fn or(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[Or], Self::and, |left, _, right| Expression::logical(left, LogicalOperator::Or, right))
	}

	fn and(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[And], Self::equality, |left, _, right| {
			Expression::logical(left, LogicalOperator::And, right)
		})
	}

	/// Parse equality expressions.
	fn equality(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[BangEqual, EqualEqual], Self::comparison, Expression::binary)
	}

	/// Parse comparison expressions.
	fn comparison(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[Greater, GreaterEqual, Less, LessEqual], Self::term, Expression::binary)
	}

	/// Parse term expressions.
	fn term(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[Minus, Plus], Self::factor, Expression::binary)
	}

	/// Parse factor expressions.
	fn factor(&mut self) -> Result<Box<Expression>, ParseError> {
		self.left_associative(&[Slash, Star], Self::unary, Expression::binary)
	}

	/// `operand ( operator operand )*`, folded to the left. Each operator puts
	/// the tree one level deeper.
	fn left_associative(
		&mut self,
		operators: &[TokenType],
		operand: fn(&mut Self) -> Result<Box<Expression>, ParseError>,
		combine: fn(Box<Expression>, Token, Box<Expression>) -> Box<Expression>,
	) -> Result<Box<Expression>, ParseError> {
		let depth = self.depth;
		let mut expression = operand(self)?;
		while self.check_any(operators) {
			self.deepen()?;
			let operator = self.advance();
			expression = combine(expression, operator, operand(self)?);
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse unary expressions.
	fn unary(&mut self) -> Result<Box<Expression>, ParseError> {
		if self.check_any(&[Bang, Minus]) {
			let operator = self.advance();
			return Ok(Expression::unary(operator, self.nested(Self::unary)?));
		}
		self.call()
	}

	fn call(&mut self) -> Result<Box<Expression>, ParseError> {
		let mut expression = self.primary()?;
		while self.match_tokens(&[LeftParen]) {
			expression = self.finish_call(expression)?;
		}
		Ok(expression)
	}

	fn finish_call(&mut self, callee: Box<Expression>) -> Result<Box<Expression>, ParseError> {
		let mut arguments = Vec::new();
		if !self.check(RightParen) {
			loop {
				if arguments.len() >= MAX_ARGUMENTS {
					let error = ParseError::new(self.peek(), "Can't have more than 255 arguments.");
					self.errors.push(error);
				}
				arguments.push(*self.expression()?);
				if !self.match_tokens(&[Comma]) {
					break;
				}
			}
		}
		let paren = self.consume(RightParen, "Expect ')' after arguments.")?;
		Ok(Expression::call(callee, paren, arguments))
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> Result<Box<Expression>, ParseError> {
		let token = self.peek().clone();
		let literal = match (token.r#type, &token.literal) {
			(False, _) => LiteralValue::Boolean(false),
			(True, _) => LiteralValue::Boolean(true),
			(Nil, _) => LiteralValue::Nil,
			(Number, Some(Literal::Number(n))) => LiteralValue::Number(*n),
			(String, Some(Literal::String(s))) => LiteralValue::String(s.clone()),
			(Identifier, _) => return Ok(Expression::variable(self.advance())),
			(LeftParen, _) => {
				self.advance(); // consume '('
				let expression = self.expression()?;
				self.consume(RightParen, "Expect ')' after expression.")?;
				return Ok(Expression::grouping(expression));
			}
			_ => return Err(ParseError::new(&token, "Expect expression.")),
		};
		self.advance();
		Ok(Expression::literal(literal))
	}

	/// Parse one level deeper. On error the level is left for `declaration`
	/// to unwind.
	fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
		self.deepen()?;
		let parsed = parse(self)?;
		self.depth -= 1;
		Ok(parsed)
	}

	fn deepen(&mut self) -> Result<(), ParseError> {
		if self.depth >= MAX_NESTING {
			return Err(ParseError::new(self.peek(), "Too much nesting."));
		}
		self.depth += 1;
		Ok(())
	}

	/// Consume the next token if it has the expected type.
	fn consume(&mut self, expected: TokenType, message: &str) -> Result<Token, ParseError> {
		if self.check(expected) { Ok(self.advance()) } else { Err(ParseError::new(self.peek(), message)) }
	}

	fn match_tokens(&mut self, types: &[TokenType]) -> bool {
		if self.check_any(types) {
			self.advance();
			return true;
		}
		false
	}

	fn check_any(&self, types: &[TokenType]) -> bool { types.iter().any(|&r#type| self.check(r#type)) }

	fn check(&self, r#type: TokenType) -> bool { !self.is_at_end() && self.peek().r#type == r#type }

	/// Advance past the current token and return it.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if !self.is_at_end() {
			self.current += 1;
		}
		token
	}

	fn is_at_end(&self) -> bool { self.current >= self.tokens.len() }

	/// Peek at the current token, or the synthesized `Eof` past the end.
	fn peek(&self) -> &Token { self.tokens.get(self.current).unwrap_or(&self.eof) }

	/// Skip tokens until a likely statement boundary.
	fn synchronize(&mut self) {
		while !self.is_at_end() {
			if self.advance().r#type == Semicolon || self.peek().r#type.starts_statement() {
				return;
			}
		}
	}
}
