use std::fmt::Display;

/// A token produced by the scanner.
///
/// Tokens are immutable once created and compare structurally, so two
/// occurrences of the same lexeme on different lines are different tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub r#type:  TokenType,
	/// The exact source text the token was scanned from.
	pub lexeme:  String,
	/// The runtime value of a number or string literal.
	pub literal: Option<Literal>,
	pub line:    usize,
	/// Byte offset of the first character of the lexeme.
	pub offset:  usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, literal: Option<Literal>, line: usize, offset: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), literal, line, offset }
	}

	/// The end-of-input token handed out when the token stream is exhausted.
	pub fn eof(line: usize, offset: usize) -> Self { Self::new(TokenType::Eof, "", None, line, offset) }

	pub fn is_eof(&self) -> bool { self.r#type == TokenType::Eof }
}

/// Literal payload carried by `Number` and `String` tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	Number(f64),
	String(String),
}

impl Display for Literal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal::Number(n) => write!(f, "{n}"),
			Literal::String(s) => write!(f, "{s}"),
		}
	}
}

/// The different types of tokens in Lox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Dot `.`.
	Dot,
	/// Minus `-`.
	Minus,
	/// Plus `+`.
	Plus,
	/// Semicolon `;`.
	Semicolon,
	/// Slash `/`.
	Slash,
	/// Asterisk `*`.
	Star,
	/// Bang `!`.
	Bang,
	/// Bang equal `!=`.
	BangEqual,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Identifier, e.g. variable or function name.
	Identifier,
	/// String literal, e.g. `"hello"`.
	String,
	/// Number literal, e.g. `123.45`.
	Number,
	And,
	Class,
	Else,
	False,
	Fun,
	For,
	If,
	Nil,
	Or,
	Print,
	Return,
	Super,
	This,
	True,
	Var,
	While,
	/// End of input. Never produced by the scanner itself.
	Eof,
}

impl TokenType {
	/// Map an identifier-shaped lexeme to its keyword, if it is one.
	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"and" => TokenType::And,
			"class" => TokenType::Class,
			"else" => TokenType::Else,
			"false" => TokenType::False,
			"for" => TokenType::For,
			"fun" => TokenType::Fun,
			"if" => TokenType::If,
			"nil" => TokenType::Nil,
			"or" => TokenType::Or,
			"print" => TokenType::Print,
			"return" => TokenType::Return,
			"super" => TokenType::Super,
			"this" => TokenType::This,
			"true" => TokenType::True,
			"var" => TokenType::Var,
			"while" => TokenType::While,
			_ => TokenType::Identifier,
		}
	}

	/// Keywords that start a statement, used by the parser to resynchronize.
	pub fn starts_statement(&self) -> bool {
		matches!(
			self,
			TokenType::Class
				| TokenType::Fun
				| TokenType::Var
				| TokenType::For
				| TokenType::If
				| TokenType::While
				| TokenType::Print
				| TokenType::Return
		)
	}
}
