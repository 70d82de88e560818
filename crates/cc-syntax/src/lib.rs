//! Pure-data syntax descriptor: keyword/operator/punctuation tables, character
//! classes, comment delimiters, and feature flags that externalize all
//! language-specific decisions out of the lexer.

mod classes;
mod descriptor;
mod features;
mod kind;
mod tables;

pub use classes::CharClasses;
pub use descriptor::{CommentDelimiters, SyntaxDescriptor};
pub use features::FeatureFlags;
pub use kind::TokenKind;
pub use tables::{KeywordTable, SymbolTable};
