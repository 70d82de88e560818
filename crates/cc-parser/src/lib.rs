//! Recursive-descent C parser: turns a [`cc_lexer::TokenStream`] into a
//! [`cc_ast::Node`] translation unit, resolving every context-sensitive
//! ambiguity the grammar has (typedef-vs-identifier, cast-vs-parenthesized-
//! expression, declaration-vs-statement) along the way.

mod core;
mod error;
mod grammar;
mod oracle;
mod standard;

pub use core::Parser;
pub use error::Error;
pub use standard::Standard;

use cc_ast::Node;
use cc_lexer::Token;
use cc_diagnostics::Diagnostics;

/// Parses a complete token stream into a translation unit, plus the
/// diagnostics accumulated along the way. Never fails outright except on
/// [`Error::RecursionLimitExceeded`], at which point parsing stops and
/// whatever was built so far is returned alongside the fatal diagnostic.
pub fn parse(tokens: &[Token], standard: Standard) -> (Node, Diagnostics) {
    let mut parser = Parser::new(tokens, standard);
    let unit = parser.parse_translation_unit();
    (unit, parser.into_diagnostics())
}
