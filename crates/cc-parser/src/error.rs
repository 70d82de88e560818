//! One variant per distinct parser error condition, so call sites — and
//! tests — can match on the condition rather than parse a message. Most
//! variants are non-fatal: they back a diagnostic and parsing continues in
//! panic mode. `RecursionLimitExceeded` is the one fatal condition, aborting
//! the parse outright.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("missing expected punctuation")]
    MissingPunctuation,
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("a declaration was expected here")]
    DeclarationRequired,
    #[error("a name is required here")]
    AbstractDeclaratorMissingName,
    #[error("unterminated aggregate")]
    UnterminatedAggregate,
    #[error("malformed type name in cast expression")]
    MalformedCastTypeName,
    #[error("missing ')' after attribute list")]
    MissingAttributeCloseParen,
    #[error("'break' outside a loop or switch")]
    BreakOutsideLoop,
    #[error("'continue' outside a loop")]
    ContinueOutsideLoop,
    #[error("recursion limit exceeded while parsing")]
    RecursionLimitExceeded,
}

impl Error {
    pub fn is_fatal(self) -> bool {
        matches!(self, Error::RecursionLimitExceeded)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
