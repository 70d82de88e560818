//! Parser state and low-level token operations shared by every grammar module.

use cc_diagnostics::{Diagnostics, SourceLocation};
use cc_lexer::Token;
use cc_syntax::TokenKind;

use crate::error::Error;
use crate::oracle::TypedefOracle;
use crate::standard::Standard;

/// Guards against unbounded recursion on pathologically nested expressions.
/// Not mandated by the grammar itself; exceeding it is treated the same as
/// any other fatal parse failure.
const RECURSION_LIMIT: u32 = 1024;

/// Resynchronization escalates after this many consecutive failed
/// external-declaration attempts.
pub const CONSECUTIVE_ERROR_ESCALATION: u32 = 10;

/// A saved position usable to roll back a speculative parse attempt.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    pos: usize,
    diagnostics_len: usize,
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) oracle: TypedefOracle,
    pub(crate) standard: Standard,
    depth: u32,
    last_diagnostic_pos: Option<usize>,
    pub(crate) consecutive_errors: u32,
    fatal_error: Option<Error>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], standard: Standard) -> Self {
        assert!(!tokens.is_empty(), "token stream must end with an EOF token");
        Self {
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            oracle: TypedefOracle::new(),
            standard,
            depth: 0,
            last_diagnostic_pos: None,
            consecutive_errors: 0,
            fatal_error: None,
        }
    }

    pub fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.tokens.len() - 1)
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.clamp(self.pos)]
    }

    /// Raw token index, used only to detect stalled progress in the
    /// top-level external-declaration loop.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn nth(&self, lookahead: usize) -> &Token {
        &self.tokens[self.clamp(self.pos + lookahead)]
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current().location.clone()
    }

    pub fn eof(&self) -> bool {
        self.current().kind == TokenKind::EOF
    }

    /// True iff the current token's lexeme is exactly `text` (used for
    /// keyword, operator, and punctuation dispatch alike, since lexemes are
    /// unambiguous: the lexer only ever assigns keyword/operator/punctuation
    /// kinds to tokens whose text matches their table entry).
    pub fn at(&self, text: &str) -> bool {
        self.current().lexeme == text
    }

    pub fn nth_is(&self, lookahead: usize, text: &str) -> bool {
        self.nth(lookahead).lexeme == text
    }

    pub fn at_identifier(&self) -> bool {
        self.current().kind.is_identifier()
    }

    pub fn current_lexeme(&self) -> &str {
        &self.current().lexeme
    }

    /// Consumes and returns the current token. Never called at EOF.
    pub fn bump(&mut self) -> Token {
        assert!(!self.eof(), "bump called at EOF");
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    pub fn eat(&mut self, text: &str) -> bool {
        if self.at(text) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// On mismatch: reports [`Error::MissingPunctuation`] but does not
    /// consume, so the caller's own recovery takes over.
    pub fn expect(&mut self, text: &str, what: &str) -> bool {
        if self.eat(text) {
            return true;
        }
        self.error_msg(format!("expected {what}"));
        false
    }

    /// Reports `kind`'s default message as a diagnostic at the current token.
    pub fn error(&mut self, kind: Error) {
        self.error_msg(kind.to_string());
    }

    pub fn error_msg(&mut self, message: impl Into<String>) {
        let pos = self.pos;
        if self.last_diagnostic_pos == Some(pos) {
            return;
        }
        self.last_diagnostic_pos = Some(pos);
        self.consecutive_errors += 1;
        self.diagnostics.error(message.into(), self.current_location()).emit();
    }

    pub fn error_with_related(
        &mut self,
        message: impl Into<String>,
        related_msg: impl Into<String>,
        related_location: SourceLocation,
    ) {
        let pos = self.pos;
        if self.last_diagnostic_pos == Some(pos) {
            return;
        }
        self.last_diagnostic_pos = Some(pos);
        self.consecutive_errors += 1;
        self.diagnostics
            .error(message.into(), self.current_location())
            .related_to(related_msg, related_location)
            .emit();
    }

    pub fn reset_consecutive_errors(&mut self) {
        self.consecutive_errors = 0;
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    /// Rolls back both token position and any diagnostics emitted since
    /// `mark`, abandoning a speculative parse (used by cast disambiguation).
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.diagnostics.truncate(mark.diagnostics_len);
    }

    pub fn enter_recursion(&mut self) -> bool {
        if self.depth >= RECURSION_LIMIT {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consumes a balanced `open ... close` run starting at the current
    /// `open` token, tracking nesting depth so inner occurrences of either
    /// delimiter don't terminate the scan early. Used for struct/union/enum
    /// bodies and `__attribute__((...))`/`__asm__(...)` argument lists that
    /// are parsed for well-formedness and otherwise discarded.
    pub fn skip_balanced(&mut self, open: &str, close: &str) {
        debug_assert!(self.at(open));
        let mut depth: u32 = 0;
        loop {
            if self.should_stop() {
                return;
            }
            if self.at(open) {
                depth += 1;
                self.bump();
            } else if self.at(close) {
                depth -= 1;
                self.bump();
                if depth == 0 {
                    return;
                }
            } else {
                self.bump();
            }
        }
    }

    /// Advances past tokens until `stop` matches the current token or the
    /// stream ends, per the synchronization points named for panic-mode
    /// recovery: next semicolon, next declaration-starter, or the enclosing
    /// closing brace.
    pub fn synchronize(&mut self, stop: impl Fn(&Token) -> bool) {
        while !self.should_stop() && !stop(self.current()) {
            self.bump();
        }
    }
}
