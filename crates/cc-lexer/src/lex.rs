//! The lexer: turns source text plus a [`SyntaxDescriptor`] into a [`TokenStream`].

use std::sync::Arc;

use cc_diagnostics::{Diagnostics, SourceLocation};
use cc_syntax::{SyntaxDescriptor, TokenKind};

use crate::stream::TokenStream;
use crate::token::{Token, TokenValue};

/// Lexer position/line/column state. Stateless between tokens apart from this.
struct Lexer<'a> {
    descriptor: &'a SyntaxDescriptor,
    source: &'a [u8],
    chars: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    file: Arc<str>,
    diagnostics: Diagnostics,
}

/// The result of tokenizing a complete source buffer.
pub struct LexOutcome {
    pub tokens: TokenStream,
    pub diagnostics: Diagnostics,
}

/// Tokenizes `source` according to `descriptor`, always terminating with an
/// EOF token. Malformed lexemes never abort tokenization: they produce an
/// error token, a diagnostic, and recovery continues (see the lexer algorithm docs).
pub fn tokenize(source: &str, filename: &str, descriptor: &SyntaxDescriptor) -> LexOutcome {
    let mut lexer = Lexer {
        descriptor,
        source: source.as_bytes(),
        chars: source,
        pos: 0,
        line: 1,
        column: 0,
        file: Arc::from(filename),
        diagnostics: Diagnostics::new(),
    };

    let mut tokens = TokenStream::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    LexOutcome {
        tokens,
        diagnostics: lexer.diagnostics,
    }
}

impl<'a> Lexer<'a> {
    fn loc(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.line, self.column, self.pos as u32)
    }

    fn remaining(&self) -> &'a str {
        &self.chars[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, byte_offset_from_here: usize) -> Option<char> {
        self.remaining()[byte_offset_from_here.min(self.remaining().len())..]
            .chars()
            .next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Skips whitespace, line-marker directives, and comments, cycling until
    /// none applies (first step of the lexer algorithm).
    fn skip_trivia(&mut self) {
        loop {
            let mut progressed = false;

            while let Some(ch) = self.peek() {
                if self.descriptor.is_whitespace(ch) {
                    self.advance();
                    progressed = true;
                } else {
                    break;
                }
            }

            if self.column == 0 && self.peek() == Some('#') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                self.consume_line_marker();
                progressed = true;
            }

            if self.descriptor.comments.has_line_comments() && self.remaining().starts_with(self.descriptor.comments.line_start) {
                for _ in self.descriptor.comments.line_start.chars() {
                    self.advance();
                }
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                progressed = true;
            }

            if self.descriptor.comments.has_block_comments() && self.remaining().starts_with(self.descriptor.comments.block_start) {
                for _ in self.descriptor.comments.block_start.chars() {
                    self.advance();
                }
                loop {
                    if self.remaining().starts_with(self.descriptor.comments.block_end) {
                        for _ in self.descriptor.comments.block_end.chars() {
                            self.advance();
                        }
                        break;
                    }
                    if self.advance().is_none() {
                        break;
                    }
                }
                progressed = true;
            }

            if !progressed {
                break;
            }
        }
    }

    /// Consumes a `# <line> "<file>"...` directive emitted by the external
    /// preprocessor, resetting the line counter and filename, then discards
    /// through end-of-line.
    fn consume_line_marker(&mut self) {
        self.advance(); // '#'
        while self.peek().is_some_and(|c| c == ' ') {
            self.advance();
        }
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        while self.peek().is_some_and(|c| c == ' ') {
            self.advance();
        }
        let mut filename = None;
        if self.peek() == Some('"') {
            self.advance();
            let mut name = String::new();
            while let Some(c) = self.peek() {
                if c == '"' {
                    self.advance();
                    break;
                }
                name.push(c);
                self.advance();
            }
            filename = Some(name);
        }
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        if let Ok(line) = digits.parse::<u32>() {
            self.line = line;
            self.column = 0;
        }
        if let Some(name) = filename {
            self.file = Arc::from(name);
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        if self.at_eof() {
            return Token::new(TokenKind::EOF, "", self.loc());
        }

        let start_loc = self.loc();
        let ch = self.peek().expect("checked not at EOF");

        if self.descriptor.is_identifier_start(ch) {
            return self.lex_identifier(start_loc);
        }
        if self.descriptor.is_digit(ch) {
            return self.lex_number(start_loc);
        }
        if ch == self.descriptor.string_delimiter {
            return self.lex_string(start_loc);
        }
        if ch == self.descriptor.char_delimiter {
            return self.lex_char(start_loc);
        }

        if let Some((kind, len)) = self.descriptor.punctuation.match_longest(self.remaining()) {
            return self.consume_symbol(kind, len, start_loc);
        }
        if let Some((kind, len)) = self.descriptor.operators.match_longest(self.remaining()) {
            return self.consume_symbol(kind, len, start_loc);
        }

        // No table match: unknown character. Advance by exactly one character
        // to guarantee progress, and surface a diagnostic.
        self.diagnostics
            .error(format!("unexpected character '{ch}'"), start_loc.clone())
            .emit();
        self.advance();
        Token::new(TokenKind::ERROR, ch.to_string(), start_loc)
    }

    fn consume_symbol(&mut self, kind: TokenKind, byte_len: usize, start_loc: SourceLocation) -> Token {
        let lexeme = self.remaining()[..byte_len].to_string();
        for ch in lexeme.chars() {
            debug_assert_eq!(self.peek(), Some(ch));
            self.advance();
        }
        Token::new(kind, lexeme, start_loc)
    }

    fn lex_identifier(&mut self, start_loc: SourceLocation) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| self.descriptor.is_identifier_continue(c)) {
            self.advance();
        }
        let text = &self.chars[start..self.pos];
        let kind = self.descriptor.keywords.lookup(text).unwrap_or(TokenKind::IDENTIFIER);
        Token::new(kind, text, start_loc)
    }

    fn lex_number(&mut self, start_loc: SourceLocation) -> Token {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some('0') && self.descriptor.features.hex_literals
            && matches!(self.peek_at(1), Some('x') | Some('X'))
        {
            self.advance();
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
        } else if self.peek() == Some('0') && self.descriptor.features.binary_literals
            && matches!(self.peek_at(1), Some('b') | Some('B'))
        {
            self.advance();
            self.advance();
            while self.peek().is_some_and(|c| c == '0' || c == '1') {
                self.advance();
            }
        } else if self.peek() == Some('0') && self.descriptor.features.octal_literals
            && self.peek_at(1).is_some_and(|c| ('0'..='7').contains(&c))
        {
            self.advance();
            while self.peek().is_some_and(|c| ('0'..='7').contains(&c)) {
                self.advance();
            }
        } else {
            while self.peek().is_some_and(|c| self.descriptor.is_digit(c)) {
                self.advance();
            }

            if self.descriptor.features.float_literals
                && self.peek() == Some('.')
                && self.peek_at(1).is_some_and(|c| c.is_ascii_digit() || !self.descriptor.is_identifier_start(c))
            {
                is_float = true;
                self.advance();
                while self.peek().is_some_and(|c| self.descriptor.is_digit(c)) {
                    self.advance();
                }
            }

            if self.descriptor.features.scientific_notation && matches!(self.peek(), Some('e') | Some('E')) {
                let save = self.pos;
                let save_line = self.line;
                let save_col = self.column;
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                } else {
                    self.pos = save;
                    self.line = save_line;
                    self.column = save_col;
                }
            }
        }

        let digits_end = self.pos;

        // Suffix characters (u, U, l, L, f, F, and combinations) are consumed
        // but never change the literal kind already determined. Sliced off by
        // byte offset rather than re-scanned, so a hex digit like the `F` in
        // `0x1F` is never mistaken for a trailing float suffix.
        while self.peek().is_some_and(|c| matches!(c, 'u' | 'U' | 'l' | 'L' | 'f' | 'F')) {
            self.advance();
        }

        let text = self.chars[start..self.pos].to_string();
        let digits = self.chars[start..digits_end].to_string();

        if is_float {
            let value = digits.parse::<f64>().unwrap_or(0.0);
            Token::new(TokenKind::FLOAT_LITERAL, text, start_loc).with_value(TokenValue::Float(value))
        } else {
            let value = parse_int_auto_base(&digits);
            Token::new(TokenKind::INT_LITERAL, text, start_loc).with_value(TokenValue::Int(value))
        }
    }

    fn lex_string(&mut self, start_loc: SourceLocation) -> Token {
        let delim = self.descriptor.string_delimiter;
        self.advance();
        let start = self.pos;
        let mut decoded = String::new();
        let mut terminated = false;

        while let Some(ch) = self.peek() {
            if ch == delim {
                terminated = true;
                break;
            }
            if ch == self.descriptor.escape_char {
                self.advance();
                match self.advance() {
                    Some(escaped) => decoded.push(decode_escape(escaped)),
                    None => break,
                }
                continue;
            }
            decoded.push(ch);
            self.advance();
        }

        let raw_body = self.chars[start..self.pos].to_string();
        if terminated {
            self.advance(); // closing delimiter
        } else {
            self.diagnostics.error("unterminated string literal", start_loc.clone()).emit();
        }

        let lexeme = format!("{delim}{raw_body}{delim}");
        if terminated {
            Token::new(TokenKind::STRING_LITERAL, lexeme, start_loc).with_value(TokenValue::Str(decoded))
        } else {
            Token::new(TokenKind::ERROR, lexeme, start_loc)
        }
    }

    fn lex_char(&mut self, start_loc: SourceLocation) -> Token {
        let delim = self.descriptor.char_delimiter;
        self.advance();
        let start = self.pos;

        let value = if self.peek() == Some(self.descriptor.escape_char) {
            self.advance();
            self.advance().map(decode_escape)
        } else {
            self.advance()
        };

        let raw_body = self.chars[start..self.pos].to_string();
        let terminated = self.peek() == Some(delim);
        if terminated {
            self.advance();
        } else {
            self.diagnostics.error("unterminated character literal", start_loc.clone()).emit();
        }

        let lexeme = format!("{delim}{raw_body}{delim}");
        match (terminated, value) {
            (true, Some(c)) => Token::new(TokenKind::CHAR_LITERAL, lexeme, start_loc).with_value(TokenValue::Char(c)),
            _ => Token::new(TokenKind::ERROR, lexeme, start_loc),
        }
    }
}

/// Decodes a single escape character: `\n \t \r \\ \" \0`; unknown escapes pass through unchanged.
fn decode_escape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        '0' => '\0',
        other => other,
    }
}

/// Parses an integer literal with base-0 auto-detection (0x.. hex, 0b.. binary, 0.. octal, else decimal).
fn parse_int_auto_base(digits: &str) -> i64 {
    if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(rest, 16).unwrap_or(0)
    } else if let Some(rest) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i64::from_str_radix(rest, 2).unwrap_or(0)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).unwrap_or(0)
    } else {
        digits.parse::<i64>().unwrap_or(0)
    }
}

#[cfg(test)]
mod lex_tests;
