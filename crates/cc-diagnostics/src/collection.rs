//! Collecting diagnostics emitted across a pipeline stage.

use crate::location::SourceLocation;
use crate::message::{Diagnostic, RelatedInfo, Severity};

/// Collection of diagnostic messages produced by a lexer, parser, or lowerer pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

/// Builder for attaching related-location context to a diagnostic before it is emitted.
#[must_use = "diagnostic not recorded until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, msg: impl Into<String>, location: SourceLocation) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic::new(Severity::Error, location, msg),
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, location: SourceLocation) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic::new(Severity::Warning, location, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Discards every message recorded after `len`. Used to roll back
    /// diagnostics emitted during a speculative parse that was abandoned.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn related_to(mut self, msg: impl Into<String>, location: SourceLocation) -> Self {
        self.message.related.push(RelatedInfo::new(location, msg));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    #[test]
    fn empty_by_default() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert!(!diags.has_errors());
    }

    #[test]
    fn error_increments_count() {
        let mut diags = Diagnostics::new();
        diags.error("bad token", loc()).emit();
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 0);
        assert!(diags.has_errors());
    }

    #[test]
    fn related_info_is_attached() {
        let mut diags = Diagnostics::new();
        diags
            .error("unterminated aggregate", loc())
            .related_to("opened here", loc())
            .emit();
        let d = diags.iter().next().unwrap();
        assert_eq!(d.related.len(), 1);
    }

    #[test]
    fn extend_merges_collections() {
        let mut a = Diagnostics::new();
        a.error("a", loc()).emit();
        let mut b = Diagnostics::new();
        b.warning("b", loc()).emit();
        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
    }

    #[test]
    fn truncate_rolls_back_speculative_diagnostics() {
        let mut diags = Diagnostics::new();
        diags.error("kept", loc()).emit();
        let checkpoint = diags.len();
        diags.error("speculative", loc()).emit();
        diags.truncate(checkpoint);
        assert_eq!(diags.len(), 1);
    }
}
