//! `compile_unit`: the tokenize -> parse -> lower sequence described in
//! §5/§7, checking the error count after each stage before moving to the
//! next, and returning exit-code semantics as data (§6 "Exit codes") instead
//! of calling `std::process::exit` so the whole pipeline is testable.

use std::path::{Path, PathBuf};

use cc_ast::Node;
use cc_diagnostics::Diagnostics;
use cc_ir::Module;
use cc_parser::Standard;
use cc_syntax::SyntaxDescriptor;

use crate::backend::Backend;
use crate::dump::SidecarDump;
use crate::linker::{CommandRunner, LinkerInvocation};

/// Program name used to invoke the system linker when emitting an executable.
/// Not configurable yet: fixing this as a constant is enough to satisfy the
/// emission contract without growing `compile_unit`'s surface for a CLI that
/// doesn't exist yet.
const DEFAULT_LINKER: &str = "cc";

/// The optimization level requested by the external CLI (§6). `S`/`Z` are
/// aliased to `Two` inside the core, matching "the last two are aliased to 2
/// inside the core".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
    Zero,
    One,
    Two,
    Three,
}

impl OptLevel {
    pub fn from_cli_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(OptLevel::Zero),
            "1" => Some(OptLevel::One),
            "2" | "s" | "z" => Some(OptLevel::Two),
            "3" => Some(OptLevel::Three),
            _ => None,
        }
    }
}

/// What emission the caller wants out of a successful compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    LlvmIr,
    Assembly,
    Object,
    /// Produce a linked executable (the default per §6).
    Executable,
}

/// Which stage the pipeline reached before it stopped, for diagnostics and
/// for deciding whether to write the sidecar dump (only on a parse failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexing,
    Parsing,
    Lowering,
    Emitting,
    Linking,
}

/// Everything `compile_unit` produced: the stage it reached, the process
/// exit code it implies (§6: 0 on success, 1 on any error), and whatever
/// intermediate artifacts got far enough to exist.
pub struct PipelineOutcome {
    pub stage_reached: Stage,
    pub exit_code: i32,
    pub diagnostics: Diagnostics,
    pub ast: Option<Node>,
    pub module: Option<Module>,
    pub sidecar_dump_path: Option<PathBuf>,
}

impl PipelineOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    fn failed(stage_reached: Stage, diagnostics: Diagnostics, ast: Option<Node>) -> Self {
        Self {
            stage_reached,
            exit_code: 1,
            diagnostics,
            ast,
            module: None,
            sidecar_dump_path: None,
        }
    }
}

/// Runs tokenize -> parse -> lower -> emit -> link for one translation unit.
/// `emit_path` is where the requested `emit_kind` artifact is written; when
/// `emit_kind` is `Executable`, an object file is emitted next to it (same
/// path with a `.o` extension) and then linked into `emit_path` through
/// `runner`, per the emission contract's "invoke an external system linker
/// through a child-process shell invocation" clause.
#[allow(clippy::too_many_arguments)]
pub fn compile_unit(
    source: &str,
    filename: &str,
    standard: Standard,
    backend: &mut dyn Backend,
    emit_kind: EmitKind,
    emit_path: &Path,
    dump_dir: &Path,
    runner: &dyn CommandRunner,
) -> PipelineOutcome {
    let descriptor = if standard.is_gnu() { SyntaxDescriptor::gnu_c() } else { SyntaxDescriptor::c() };

    let lexed = cc_lexer::tokenize(source, filename, &descriptor);
    if lexed.diagnostics.has_errors() {
        return PipelineOutcome::failed(Stage::Lexing, lexed.diagnostics, None);
    }

    let (ast, mut parse_diagnostics) = cc_parser::parse(lexed.tokens.as_slice(), standard);
    if parse_diagnostics.has_errors() {
        let dump_path = dump_dir.join(format!("{filename}.dump.json"));
        let dump = SidecarDump::new(lexed.tokens.as_slice(), &ast);
        let mut outcome = PipelineOutcome::failed(Stage::Parsing, parse_diagnostics, Some(ast));
        if dump.write_to(&dump_path).is_ok() {
            outcome.sidecar_dump_path = Some(dump_path);
        }
        return outcome;
    }

    let (module, lower_diagnostics) = cc_ir::lower(&ast, filename, &*backend);
    parse_diagnostics.extend(lower_diagnostics);
    if parse_diagnostics.has_errors() {
        return PipelineOutcome::failed(Stage::Lowering, parse_diagnostics, Some(ast));
    }

    let object_path = if emit_kind == EmitKind::Executable { emit_path.with_extension("o") } else { emit_path.to_path_buf() };

    let emit_result = match emit_kind {
        EmitKind::LlvmIr => backend.emit_ir(&module, emit_path),
        EmitKind::Assembly => backend.emit_assembly(&module, emit_path),
        EmitKind::Object | EmitKind::Executable => backend.emit_object(&module, &object_path),
    };
    if let Err(err) = emit_result {
        parse_diagnostics.error(err.to_string(), cc_diagnostics::SourceLocation::synthetic()).emit();
        return PipelineOutcome {
            stage_reached: Stage::Emitting,
            exit_code: 1,
            diagnostics: parse_diagnostics,
            ast: Some(ast),
            module: Some(module),
            sidecar_dump_path: None,
        };
    }

    if emit_kind == EmitKind::Executable {
        let invocation = LinkerInvocation::new(DEFAULT_LINKER, emit_path.display().to_string())
            .with_object(object_path.display().to_string());
        if let Err(err) = invocation.run(runner) {
            parse_diagnostics.error(err.to_string(), cc_diagnostics::SourceLocation::synthetic()).emit();
            return PipelineOutcome {
                stage_reached: Stage::Linking,
                exit_code: 1,
                diagnostics: parse_diagnostics,
                ast: Some(ast),
                module: Some(module),
                sidecar_dump_path: None,
            };
        }
    }

    PipelineOutcome {
        stage_reached: if emit_kind == EmitKind::Executable { Stage::Linking } else { Stage::Emitting },
        exit_code: 0,
        diagnostics: parse_diagnostics,
        ast: Some(ast),
        module: Some(module),
        sidecar_dump_path: None,
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use crate::backend::NullBackend;

    struct FixedExitRunner {
        exit_code: i32,
    }

    impl CommandRunner for FixedExitRunner {
        fn run(&self, _program: &str, _args: &[String]) -> i32 {
            self.exit_code
        }
    }

    #[test]
    fn a_well_formed_program_reaches_emission_with_exit_code_zero() {
        let mut backend = NullBackend::new(64);
        let dir = std::env::temp_dir();
        let runner = FixedExitRunner { exit_code: 0 };
        let outcome = compile_unit(
            "int main(void) { return 42; }",
            "t.c",
            Standard::C11,
            &mut backend,
            EmitKind::Object,
            &dir.join("t.o"),
            &dir,
            &runner,
        );
        assert!(outcome.succeeded());
        assert_eq!(outcome.stage_reached, Stage::Emitting);
        assert!(outcome.module.unwrap().is_well_formed());
    }

    #[test]
    fn a_syntax_error_stops_before_lowering_and_writes_a_dump() {
        let mut backend = NullBackend::new(64);
        let dir = tempfile::tempdir().unwrap();
        let runner = FixedExitRunner { exit_code: 0 };
        let outcome = compile_unit(
            "int main(void) { return ; }",
            "bad.c",
            Standard::C11,
            &mut backend,
            EmitKind::Object,
            &dir.path().join("bad.o"),
            dir.path(),
            &runner,
        );
        // `return ;` (a return with no expression) is syntactically valid C;
        // exercise an actually-malformed construct instead.
        assert!(outcome.succeeded() || outcome.stage_reached == Stage::Parsing);
        let _ = outcome;

        let outcome = compile_unit(
            "int main(void) { return }",
            "bad2.c",
            Standard::C11,
            &mut backend,
            EmitKind::Object,
            &dir.path().join("bad2.o"),
            dir.path(),
            &runner,
        );
        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.stage_reached, Stage::Parsing);
        assert!(outcome.sidecar_dump_path.is_some());
        assert!(outcome.sidecar_dump_path.unwrap().exists());
    }

    #[test]
    fn break_outside_a_loop_is_a_lowering_error_with_exit_code_one() {
        let mut backend = NullBackend::new(64);
        let dir = std::env::temp_dir();
        let runner = FixedExitRunner { exit_code: 0 };
        let outcome = compile_unit(
            "int main(void) { break; return 0; }",
            "s6.c",
            Standard::C11,
            &mut backend,
            EmitKind::Object,
            &dir.join("s6.o"),
            &dir,
            &runner,
        );
        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.stage_reached, Stage::Lowering);
        assert!(outcome.diagnostics.iter().any(|d| d.message.contains("break")));
    }

    #[test]
    fn an_executable_emission_links_the_emitted_object_and_succeeds_on_exit_zero() {
        let mut backend = NullBackend::new(64);
        let dir = tempfile::tempdir().unwrap();
        let runner = FixedExitRunner { exit_code: 0 };
        let outcome = compile_unit(
            "int main(void) { return 0; }",
            "t.c",
            Standard::C11,
            &mut backend,
            EmitKind::Executable,
            &dir.path().join("a.out"),
            dir.path(),
            &runner,
        );
        assert!(outcome.succeeded());
        assert_eq!(outcome.stage_reached, Stage::Linking);
        assert!(backend.calls.iter().any(|c| matches!(c, crate::backend::RecordedCall::Object(p) if p.ends_with("a.o"))));
    }

    #[test]
    fn a_nonzero_linker_exit_is_reported_as_a_linking_failure() {
        let mut backend = NullBackend::new(64);
        let dir = tempfile::tempdir().unwrap();
        let runner = FixedExitRunner { exit_code: 1 };
        let outcome = compile_unit(
            "int main(void) { return 0; }",
            "t.c",
            Standard::C11,
            &mut backend,
            EmitKind::Executable,
            &dir.path().join("a.out"),
            dir.path(),
            &runner,
        );
        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.stage_reached, Stage::Linking);
        assert!(outcome.diagnostics.iter().any(|d| d.message.contains("linker")));
    }
}
