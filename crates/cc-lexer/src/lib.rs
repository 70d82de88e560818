//! Lexer: consumes source text plus a [`cc_syntax::SyntaxDescriptor`] and
//! produces a [`TokenStream`] terminated by exactly one EOF token.

mod lex;
mod stream;
mod token;

pub use lex::{tokenize, LexOutcome};
pub use stream::TokenStream;
pub use token::{Token, TokenValue};
