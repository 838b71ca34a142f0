//! Turns Lox source text into a flat list of tokens.
//!
//! Keywords are part of the shape of the language’s grammar, so the parser
//! often has code like, “If the next token is `while` then do . . . ” That
//! means the parser wants to know not just that it has a lexeme for some
//! identifier, but that it has a reserved word, and which keyword it is.
//!
//! There are lexemes for literal values, numbers and strings. Since the
//! scanner has to walk each character in the literal to correctly identify
//! it, it also converts that textual representation of a value to the living
//! runtime object that will be used by the interpreter later.
//!
//! We can’t easily detect a `reserved word` until we’ve reached the end of what
//! might instead be an identifier, this is `maximal munch`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
use anyhow::Context;
pub use token::*;

use crate::{LoxError, error::scanner::{ScanError, ScanErrorType}};

/// Failure of a single `scan_token` step.
enum ScanFailure {
	Diagnostic(ScanError),
	Internal(anyhow::Error),
}

impl From<ScanError> for ScanFailure {
	fn from(error: ScanError) -> Self { Self::Diagnostic(error) }
}

impl From<anyhow::Error> for ScanFailure {
	fn from(error: anyhow::Error) -> Self { Self::Internal(error) }
}

/// A scanner for Lox source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points past the character currently being considered
	cursor:      usize,
	/// Tracks what source line `cursor` is on so we can produce tokens that
	/// know their location.
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code.
	///
	/// Scanning continues past a bad character so every diagnostic of the
	/// input is reported at once; any diagnostic fails the whole scan. No
	/// `Eof` token is appended, the parser synthesizes one on demand.
	pub fn scan_tokens(mut self) -> Result<Vec<Token>, LoxError> {
		let mut tokens = Vec::new();
		let mut errors = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = index;
			match self.scan_token() {
				Ok(Some(token)) => tokens.push(token),
				Ok(None) => {}
				Err(ScanFailure::Diagnostic(e)) => errors.push(e),
				Err(ScanFailure::Internal(e)) => return Err(e.into()),
			}
		}
		if !errors.is_empty() {
			return Err(LoxError::ScanErrors(errors));
		}
		Ok(tokens)
	}

	/// Scan a single lexeme; whitespace and comments yield no token.
	fn scan_token(&mut self) -> Result<Option<Token>, ScanFailure> {
		let next_char = self.advance().context("Unexpected end of input")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			',' => Comma,
			'.' => Dot,
			'-' => Minus,
			'+' => Plus,
			';' => Semicolon,
			'*' => Star,
			'!' => if self.match_next('=') { BangEqual } else { Bang },
			'=' => if self.match_next('=') { EqualEqual } else { Equal },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				return Ok(None);
			} else { Slash },
			' ' | '\r' | '\t' => return Ok(None),
			'\n' => { self.line += 1; return Ok(None); }
			'"' => return self.string().map(Some),
			c if c.is_ascii_digit() => return self.number().map(Some),
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			_ => return Err(ScanError::new(self.line, self.start, ScanErrorType::UnexpectedCharacter(next_char)).into()),
		};

		Ok(Some(self.make_token(r#type, None)))
	}

	fn make_token(&self, r#type: TokenType, literal: Option<Literal>) -> Token {
		Token::new(r#type, &self.source[self.start..self.cursor], literal, self.line, self.start)
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Scan a string literal. The token is reported on the line it ends on.
	fn string(&mut self) -> Result<Token, ScanFailure> {
		while let Some(c) = self.peek() {
			if c == '"' {
				break;
			}
			if c == '\n' {
				self.line += 1
			}
			self.advance();
		}

		self.peek().ok_or_else(|| ScanError::new(self.line, self.start, ScanErrorType::UnterminatedString))?;
		self.advance(); // The closing "
		let value = &self.source[self.start + 1..self.cursor - 1];
		Ok(self.make_token(String, Some(Literal::String(value.to_string()))))
	}

	/// Scan a number literal. A trailing `.` without digits is left for the
	/// next lexeme.
	fn number(&mut self) -> Result<Token, ScanFailure> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// Look for a fractional part.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
		}

		let s = &self.source[self.start..self.cursor];
		let value: f64 = s.parse().with_context(|| format!("Failed to parse number literal '{s}'"))?;
		Ok(self.make_token(Number, Some(Literal::Number(value))))
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::PI;

	use super::*;

	fn scan(input: &str, ok: bool) {
		let result = Scanner::new(input).scan_tokens();
		assert!(result.is_ok() == ok, "scanning {input:?}");
	}

	fn types(input: &str) -> Vec<TokenType> {
		Scanner::new(input).scan_tokens().unwrap().into_iter().map(|token| token.r#type).collect()
	}

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("(){}", true);
		scan(" ( ) ", true);
		scan("@", false);
		scan("你好", false);
		scan(r#""世界""#, true);
		scan("12345", true);
		scan("user", true);
		scan("return", true);
		scan(r#""unterminated string"#, false);
	}

	#[test]
	fn scan_empty_source_has_no_tokens() {
		assert!(Scanner::new("").scan_tokens().unwrap().is_empty());
		assert!(Scanner::new("  \t\r\n  ").scan_tokens().unwrap().is_empty());
	}

	#[test]
	fn scan_operators() {
		assert_eq!(
			types("! != = == < <= > >= - + * / ; , ."),
			vec![
				Bang,
				BangEqual,
				Equal,
				EqualEqual,
				Less,
				LessEqual,
				Greater,
				GreaterEqual,
				Minus,
				Plus,
				Star,
				Slash,
				Semicolon,
				Comma,
				Dot
			]
		);
		// maximal munch is bounded to two characters
		assert_eq!(types("==="), vec![EqualEqual, Equal]);
		assert_eq!(types("!=="), vec![BangEqual, Equal]);
	}

	#[test]
	fn scan_number_literal() {
		let tokens = Scanner::new("123.121").scan_tokens().unwrap();
		assert_eq!(tokens, vec![Token::new(Number, "123.121", Some(Literal::Number(123.121)), 1, 0)]);
	}

	#[test]
	fn scan_number_with_trailing_dot() {
		let tokens = Scanner::new("123.").scan_tokens().unwrap();
		assert_eq!(tokens.len(), 2);
		assert_eq!(tokens[0], Token::new(Number, "123", Some(Literal::Number(123.0)), 1, 0));
		assert_eq!(tokens[1], Token::new(Dot, ".", None, 1, 3));
	}

	#[test]
	fn scan_leading_dot_is_not_a_number() { assert_eq!(types(".5"), vec![Dot, Number]); }

	#[test]
	fn scan_number_precision() {
		let tokens = Scanner::new("3.14159265358979323846264338327950288").scan_tokens().unwrap();
		assert_eq!(tokens[0].literal, Some(Literal::Number(PI)));
	}

	#[test]
	fn scan_strings() {
		let tokens = Scanner::new(r#""hello world""#).scan_tokens().unwrap();
		assert_eq!(tokens[0].r#type, String);
		assert_eq!(tokens[0].lexeme, r#""hello world""#);
		assert_eq!(tokens[0].literal, Some(Literal::String("hello world".to_string())));

		let tokens = Scanner::new(r#""""#).scan_tokens().unwrap();
		assert_eq!(tokens[0].literal, Some(Literal::String(std::string::String::new())));
	}

	#[test]
	fn scan_string_with_newlines() {
		let tokens = Scanner::new("\"hello\nworld\" x").scan_tokens().unwrap();
		assert_eq!(tokens[0].literal, Some(Literal::String("hello\nworld".to_string())));
		assert_eq!(tokens[1].line, 2);
	}

	#[test]
	fn scan_unterminated_string() {
		let Err(LoxError::ScanErrors(errors)) = Scanner::new("var a = \"oops").scan_tokens() else {
			panic!("expected a scan error");
		};
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].r#type(), &ScanErrorType::UnterminatedString);
	}

	#[test]
	fn scan_reports_every_unexpected_character() {
		let Err(LoxError::ScanErrors(errors)) = Scanner::new("a @\nb # c").scan_tokens() else {
			panic!("expected scan errors");
		};
		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].r#type(), &ScanErrorType::UnexpectedCharacter('@'));
		assert_eq!((errors[0].line(), errors[0].offset()), (1, 2));
		assert_eq!(errors[1].r#type(), &ScanErrorType::UnexpectedCharacter('#'));
		assert_eq!((errors[1].line(), errors[1].offset()), (2, 6));
	}

	#[test]
	fn scan_keywords() {
		assert_eq!(
			types("and class else false for fun if nil or print return super this true var while"),
			vec![And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True, Var, While]
		);
	}

	#[test]
	fn scan_identifiers() {
		for name in ["x", "_name", "myVariable123", "snake_case", "CamelCase", "and123", "eof"] {
			let tokens = Scanner::new(name).scan_tokens().unwrap();
			assert_eq!(tokens[0].r#type, Identifier, "{name}");
			assert_eq!(tokens[0].lexeme, name);
		}
	}

	#[test]
	fn scan_comment_then_operator() {
		let tokens = Scanner::new("// comment\n<").scan_tokens().unwrap();
		assert_eq!(tokens, vec![Token::new(Less, "<", None, 2, 11)]);
	}

	#[test]
	fn scan_comment_only() {
		assert!(Scanner::new("// comment with ()[]{}").scan_tokens().unwrap().is_empty());
	}

	#[test]
	fn scan_combined() {
		assert_eq!(
			types("if (x < 10) { x = x + 1; }"),
			vec![
				If, LeftParen, Identifier, Less, Number, RightParen, LeftBrace, Identifier, Equal, Identifier, Plus, Number,
				Semicolon, RightBrace
			]
		);
	}

	#[test]
	fn scan_tracks_lines_and_offsets() {
		let tokens = Scanner::new("var a;\n  a = 1;").scan_tokens().unwrap();
		let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.offset)).collect();
		assert_eq!(positions, vec![(1, 0), (1, 4), (1, 5), (2, 9), (2, 11), (2, 13), (2, 14)]);
	}
}
