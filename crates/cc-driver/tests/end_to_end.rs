//! End-to-end scenarios exercising the full tokenize -> parse -> lower ->
//! emit pipeline through a [`NullBackend`], since no real target machine is
//! available in this workspace. Each test documents the IR/diagnostic shape
//! a real backend would need to turn into the described process-exit
//! behavior.

use cc_driver::{compile_unit, CommandRunner, EmitKind, NullBackend, Stage};
use cc_ir::instr::{InstrKind, Operand, Terminator};
use cc_parser::Standard;

struct NoopRunner;

impl CommandRunner for NoopRunner {
    fn run(&self, _program: &str, _args: &[String]) -> i32 {
        0
    }
}

fn run(source: &str) -> (cc_driver::PipelineOutcome, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = NullBackend::new(64);
    let outcome = compile_unit(
        source,
        "t.c",
        Standard::C11,
        &mut backend,
        EmitKind::Object,
        &dir.path().join("t.o"),
        dir.path(),
        &NoopRunner,
    );
    (outcome, dir)
}

#[test]
fn s1_a_single_return_constant() {
    let (outcome, _dir) = run("int main(void) { return 42; }");
    assert!(outcome.succeeded());
    let module = outcome.module.unwrap();
    assert_eq!(module.functions.len(), 1);
    let main = module.function_by_name("main").unwrap();
    assert_eq!(main.blocks.len(), 1);
    match &main.blocks[0].terminator {
        Some(Terminator::Return(Some(Operand::ConstInt(value)))) => assert_eq!(*value, 42),
        other => panic!("expected a single return of the constant 42, got {other:?}"),
    }
}

#[test]
fn s2_a_call_passing_two_argument_constants() {
    let source = "int add(int a, int b) { return a + b; } int main(void){ return add(10, 20); }";
    let (outcome, _dir) = run(source);
    assert!(outcome.succeeded());
    let module = outcome.module.unwrap();
    assert_eq!(module.functions.len(), 2);
    let add = module.function_by_name("add").unwrap();
    let main = module.function_by_name("main").unwrap();
    let has_call = main.blocks.iter().any(|b| {
        b.instructions.iter().any(|i| {
            matches!(&i.kind, InstrKind::Call { callee: cc_ir::instr::Callee::Direct(id), args }
                if *id == add.id && args.len() == 2)
        })
    });
    assert!(has_call, "main should call add(10, 20)");

    // `add`'s entry block stores each incoming parameter into its slot right
    // after the slot is allocated, before the body reads either back.
    let entry = &add.blocks[0];
    let mut stored_params = Vec::new();
    for (i, instr) in entry.instructions.iter().enumerate() {
        if let InstrKind::Store { value: Operand::Param(p), .. } = &instr.kind {
            stored_params.push(*p);
            assert!(
                matches!(entry.instructions[i - 1].kind, InstrKind::Alloca { .. }),
                "parameter {p} should be stored immediately after its slot is allocated"
            );
        }
    }
    assert_eq!(stored_params, vec![0, 1], "both parameters should be stored into their slots");
}

#[test]
fn s3_a_while_loop_with_condition_and_body_blocks() {
    let source = "int main(void){ int i = 0; while (i < 5) { i = i + 1; } return i; }";
    let (outcome, _dir) = run(source);
    assert!(outcome.succeeded());
    let module = outcome.module.unwrap();
    let main = module.function_by_name("main").unwrap();
    let labels: Vec<&str> = main.blocks.iter().map(|b| b.label.as_str()).collect();
    assert!(labels.iter().any(|l| l.contains("cond")), "blocks: {labels:?}");
    assert!(labels.iter().any(|l| l.contains("body")), "blocks: {labels:?}");
    assert!(labels.iter().any(|l| l.contains("end")), "blocks: {labels:?}");
}

#[test]
fn s4_a_typedef_registers_its_name_as_a_type() {
    let source = "typedef int T; T x; int main(void){ return 0; }";
    let (outcome, _dir) = run(source);
    assert!(outcome.succeeded());
}

#[test]
fn s5_short_circuit_and_produces_a_phi_over_three_blocks() {
    let source = "int main(void){ int a = 1, b = 0; if (a && b) return 1; else return 2; }";
    let (outcome, _dir) = run(source);
    assert!(outcome.succeeded());
    let module = outcome.module.unwrap();
    let main = module.function_by_name("main").unwrap();
    let has_phi = main.blocks.iter().any(|b| b.instructions.iter().any(|i| matches!(i.kind, InstrKind::Phi { .. })));
    assert!(has_phi, "a && b should lower through a phi merging the short-circuit constant");
    assert!(main.blocks.len() >= 3);
}

#[test]
fn s6_break_outside_a_loop_is_rejected_with_exit_code_one_and_no_module_is_emitted() {
    let source = "int main(void){ break; return 0; }";
    let (outcome, _dir) = run(source);
    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.stage_reached, Stage::Lowering);
    assert!(outcome.diagnostics.iter().any(|d| d.message.contains("break") && d.message.contains("outside")));
}

#[test]
fn every_basic_block_ends_in_exactly_one_terminator() {
    let source = "int fib(int n){ if (n < 2) return n; return fib(n-1) + fib(n-2); } int main(void){ return fib(10); }";
    let (outcome, _dir) = run(source);
    assert!(outcome.succeeded());
    let module = outcome.module.unwrap();
    for function in &module.functions {
        for block in &function.blocks {
            assert!(block.terminator.is_some(), "block {} has no terminator", block.label);
        }
    }
}
