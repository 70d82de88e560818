//! Source locations attached to tokens and AST nodes.

use std::fmt;
use std::sync::Arc;

/// A point in a source file: filename, 1-based line, 0-based column, and byte offset.
///
/// Immutable once constructed. Line markers emitted by an external preprocessor
/// (`# <line> "<file>"`) can change the `(line, file)` pair reported for subsequent
/// tokens without altering the underlying byte offset into the text actually lexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32, offset: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
        }
    }

    /// A location with no meaningful position, used for synthetic nodes
    /// (e.g. the implicit returns inserted by the terminator-completion sweep).
    pub fn synthetic() -> Self {
        Self::new("<synthetic>", 0, 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
