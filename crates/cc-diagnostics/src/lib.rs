//! Structured diagnostics shared by the lexer, parser, and IR lowerer.
//!
//! This crate holds data only: locations, severities, and a collector. Turning
//! a [`Diagnostic`] into human-facing text is the job of the external
//! diagnostic renderer, which is out of scope for the core pipeline.

mod collection;
mod location;
mod message;

pub use collection::{DiagnosticBuilder, Diagnostics};
pub use location::SourceLocation;
pub use message::{Diagnostic, RelatedInfo, Severity};
