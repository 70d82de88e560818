//! Tokens produced by the lexer.

use cc_diagnostics::SourceLocation;
use cc_syntax::TokenKind;

/// The decoded payload carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

/// A single lexical token: kind, raw lexeme, source location, and an optional
/// decoded value payload for literals.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
    pub value: Option<TokenValue>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
            value: None,
        }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn length(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }
}
