//! Orchestration layer: runs tokenize -> parse -> lower -> emit -> link as one
//! sequence, fixes the `Backend` trait a target machine must implement, and
//! builds the linker command line and the sidecar debug dump the rest of the
//! workspace leans on.
//!
//! Nothing here calls `std::process::exit`: every stage outcome, including
//! the final exit code, comes back as data on [`pipeline::PipelineOutcome`]
//! so the whole thing is exercised by ordinary tests.

pub mod backend;
pub mod dump;
pub mod linker;
pub mod pipeline;

pub use backend::{Backend, BackendError, NullBackend, RecordedCall};
pub use dump::{DumpNode, DumpToken, SidecarDump};
pub use linker::{CommandRunner, LinkError, LinkerInvocation, SystemCommandRunner};
pub use pipeline::{compile_unit, EmitKind, OptLevel, PipelineOutcome, Stage};
