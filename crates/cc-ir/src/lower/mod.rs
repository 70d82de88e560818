//! The AST-to-IR lowerer. `Lowerer` owns the module under construction plus
//! the per-function state (symbol table, loop-target stack, label map, the
//! active [`FunctionBuilder`]) and is driven top-down from
//! [`lower_translation_unit`](Lowerer::lower_translation_unit): a signature
//! pre-registration pass so forward calls resolve, then a body-lowering pass
//! per function.

mod coerce;
mod decl;
mod expr;
mod stmt;
pub(crate) mod types;

use indexmap::IndexMap;

use cc_ast::{Node, NodeKind};
use cc_diagnostics::Diagnostics;

use crate::error::Error;
use crate::ids::{BlockId, FuncId, InstrId};
use crate::instr::{InstrKind, Operand, Terminator};
use crate::layout::{IrType, TypeLayout};
use crate::loop_ctx::{LoopContext, LoopTargets};
use crate::module::{Function, FunctionBuilder, Global, Module};
use crate::symtab::SymbolTable;

/// Recursion ceiling for statement lowering (spec's "protection against
/// runaway input"). Exceeding it silently drops the rest of that subtree.
const MAX_STATEMENT_DEPTH: u32 = 500;
/// Same, for nested local declarations.
const MAX_DECLARATION_DEPTH: u32 = 100;

pub(crate) struct Lowerer<'a> {
    diagnostics: Diagnostics,
    module: Module,
    layout: &'a dyn TypeLayout,
    symtab: SymbolTable,
    globals: IndexMap<String, IrType>,
    loop_ctx: LoopContext,
    labels: IndexMap<String, BlockId>,
    builder: FunctionBuilder,
    return_type: IrType,
    stmt_depth: u32,
    decl_depth: u32,
    func_ids: IndexMap<String, FuncId>,
    next_func_id: u32,
    string_literal_count: u32,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(module_name: impl Into<String>, layout: &'a dyn TypeLayout) -> Self {
        Self {
            diagnostics: Diagnostics::new(),
            module: Module::new(module_name),
            layout,
            symtab: SymbolTable::new(),
            globals: IndexMap::new(),
            loop_ctx: LoopContext::new(),
            labels: IndexMap::new(),
            builder: FunctionBuilder::new(FuncId(0), "", vec![], IrType::Void, false),
            return_type: IrType::Void,
            stmt_depth: 0,
            decl_depth: 0,
            func_ids: IndexMap::new(),
            next_func_id: 0,
            string_literal_count: 0,
        }
    }

    pub(crate) fn lower_translation_unit(mut self, unit: &Node) -> (Module, Diagnostics) {
        debug_assert!(matches!(unit.kind, NodeKind::TranslationUnit));

        // Pass 1: register every function signature and global variable so a
        // forward call or reference resolves no matter where it appears in
        // source order.
        for decl in &unit.children {
            match &decl.kind {
                NodeKind::FunctionDef { name, is_variadic } => {
                    let param_types: Vec<IrType> = decl.children[1]
                        .children
                        .iter()
                        .map(|p| types::lower_type(&p.children[0]))
                        .collect();
                    let return_type = types::lower_type(&decl.children[0]);
                    let has_body = decl.children.len() > 2;
                    let id = self.fresh_func_id();
                    self.func_ids.insert(name.clone(), id);
                    self.module.functions.push(Function {
                        id,
                        name: name.clone(),
                        param_types,
                        return_type,
                        is_variadic: *is_variadic,
                        blocks: Vec::new(),
                        slots: Vec::new(),
                        is_declaration_only: !has_body,
                    });
                }
                NodeKind::VarDecl { name } => {
                    let ty = types::lower_type(&decl.children[0]);
                    self.globals.insert(name.clone(), ty.clone());
                    self.module.globals.push(Global { name: name.clone(), ty, initializer: None });
                }
                _ => {}
            }
        }

        // Pass 2: lower each function that has a body, now that every
        // signature in the translation unit is already known.
        for decl in &unit.children {
            if let NodeKind::FunctionDef { name, is_variadic } = &decl.kind {
                if decl.children.len() > 2 {
                    self.lower_function_body(name, *is_variadic, decl);
                }
            }
        }

        (self.module, self.diagnostics)
    }

    fn lower_function_body(&mut self, name: &str, is_variadic: bool, decl: &Node) {
        let id = self.func_ids[name];
        let param_list = &decl.children[1];
        let return_type = types::lower_type(&decl.children[0]);
        let param_types: Vec<IrType> =
            param_list.children.iter().map(|p| types::lower_type(&p.children[0])).collect();
        let body = &decl.children[2];

        self.symtab.clear();
        self.loop_ctx = LoopContext::new();
        self.labels.clear();
        self.stmt_depth = 0;
        self.decl_depth = 0;
        self.return_type = return_type.clone();
        self.builder = FunctionBuilder::new(id, name.to_string(), param_types.clone(), return_type, is_variadic);

        // Every parameter gets a stack slot, exactly like a local declared at
        // the top of the body, so it's addressable (`&param`) the same way.
        // The incoming value is stored into the slot right away, keeping the
        // front end out of the SSA-construction business: everything past
        // this point reads the parameter back through an ordinary `Load`.
        for (i, (param_node, ty)) in param_list.children.iter().zip(param_types.iter()).enumerate() {
            if let NodeKind::Param { name: Some(pname) } = &param_node.kind {
                let addr = self.builder.alloca(ty.clone(), Some(pname.clone()));
                let incoming = Operand::Param(i as u32);
                self.builder.push(InstrKind::Store { ptr: addr.clone(), value: incoming }, IrType::Void);
                self.symtab.declare(pname.clone(), addr, ty.clone(), false);
            }
        }

        self.collect_labels(body);
        self.lower_stmt(body);
        self.complete_terminators();

        let placeholder = FunctionBuilder::new(FuncId(0), "", vec![], IrType::Void, false);
        let func = std::mem::replace(&mut self.builder, placeholder).finish();
        let idx = self.module.functions.iter().position(|f| f.id == id).expect("registered in pass 1");
        self.module.functions[idx] = func;
    }

    /// Pre-creates a block for every `Labeled` statement in `node` so a
    /// `goto` lowered before the label is reached can still branch to it.
    fn collect_labels(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Labeled { label } => {
                let block = self.builder.new_block(format!("label.{label}"));
                self.labels.insert(label.clone(), block);
                self.collect_labels(&node.children[0]);
            }
            NodeKind::Compound => {
                for child in &node.children {
                    self.collect_labels(child);
                }
            }
            NodeKind::If => {
                self.collect_labels(&node.children[1]);
                if let Some(else_branch) = node.children.get(2) {
                    self.collect_labels(else_branch);
                }
            }
            NodeKind::While => self.collect_labels(&node.children[1]),
            NodeKind::DoWhile => self.collect_labels(&node.children[0]),
            NodeKind::For => self.collect_labels(&node.children[3]),
            NodeKind::Switch => self.collect_labels(&node.children[1]),
            NodeKind::Case => self.collect_labels(&node.children[1]),
            NodeKind::Default => self.collect_labels(&node.children[0]),
            _ => {}
        }
    }

    /// Closes every block still open once the body is fully lowered with a
    /// synthetic `return`, per the lowerer's terminator-completion sweep.
    fn complete_terminators(&mut self) {
        let return_type = self.return_type.clone();
        for id in self.builder.open_block_ids() {
            self.builder.switch_to(id);
            let value = if return_type == IrType::Void { None } else { Some(Operand::Zero) };
            self.builder.terminate(Terminator::Return(value));
        }
    }

    fn fresh_func_id(&mut self) -> FuncId {
        let id = FuncId(self.next_func_id);
        self.next_func_id += 1;
        id
    }

    pub(crate) fn enter_statement(&mut self) -> bool {
        if self.stmt_depth >= MAX_STATEMENT_DEPTH {
            return false;
        }
        self.stmt_depth += 1;
        true
    }

    pub(crate) fn exit_statement(&mut self) {
        self.stmt_depth = self.stmt_depth.saturating_sub(1);
    }

    pub(crate) fn enter_declaration(&mut self) -> bool {
        if self.decl_depth >= MAX_DECLARATION_DEPTH {
            return false;
        }
        self.decl_depth += 1;
        true
    }

    pub(crate) fn exit_declaration(&mut self) {
        self.decl_depth = self.decl_depth.saturating_sub(1);
    }

    pub(crate) fn error(&mut self, err: Error, node: &Node) {
        self.diagnostics.error(err.to_string(), node.location.clone()).emit();
    }

    pub(crate) fn builder_mut(&mut self) -> &mut FunctionBuilder {
        &mut self.builder
    }

    pub(crate) fn builder_ref(&self) -> &FunctionBuilder {
        &self.builder
    }

    pub(crate) fn symtab(&self) -> &SymbolTable {
        &self.symtab
    }

    pub(crate) fn symtab_ref(&self) -> &SymbolTable {
        &self.symtab
    }

    pub(crate) fn symtab_mut(&mut self) -> &mut SymbolTable {
        &mut self.symtab
    }

    pub(crate) fn global_type(&self, name: &str) -> Option<IrType> {
        self.globals.get(name).cloned()
    }

    /// A function used as a value (not called) decays to a pointer to its
    /// signature.
    pub(crate) fn function_pointer_type(&self, name: &str) -> Option<IrType> {
        let id = *self.func_ids.get(name)?;
        let f = self.module.function(id);
        Some(IrType::Pointer(Box::new(IrType::Function {
            ret: Box::new(f.return_type.clone()),
            params: f.param_types.clone(),
            is_variadic: f.is_variadic,
        })))
    }

    pub(crate) fn func_ids_ref(&self) -> &IndexMap<String, FuncId> {
        &self.func_ids
    }

    pub(crate) fn module_ref(&self) -> &Module {
        &self.module
    }

    pub(crate) fn layout_ref(&self) -> &'a dyn TypeLayout {
        self.layout
    }

    /// Appends `kind` (producing a value of type `ty`) to the function
    /// currently being lowered.
    pub(crate) fn push_instr(&mut self, kind: InstrKind, ty: IrType) -> InstrId {
        self.builder.push(kind, ty)
    }

    pub(crate) fn loop_ctx_current(&self) -> Option<LoopTargets> {
        self.loop_ctx.current()
    }

    pub(crate) fn loop_ctx_push_loop(&mut self, continue_target: BlockId, break_target: BlockId) {
        self.loop_ctx.push_loop(continue_target, break_target);
    }

    pub(crate) fn loop_ctx_push_switch(&mut self, break_target: BlockId) {
        self.loop_ctx.push_switch(break_target);
    }

    pub(crate) fn loop_ctx_pop(&mut self) {
        self.loop_ctx.pop();
    }

    pub(crate) fn label_block(&self, label: &str) -> Option<BlockId> {
        self.labels.get(label).copied()
    }

    pub(crate) fn return_type_ref(&self) -> &IrType {
        &self.return_type
    }

    /// Registers `value` as an anonymous global byte-string constant and
    /// returns the name a `GlobalAddr` operand should carry.
    pub(crate) fn intern_string_literal(&mut self, value: &str) -> String {
        let name = format!(".L.str.{}", self.string_literal_count);
        self.string_literal_count += 1;
        let ty = IrType::Array {
            elem: Box::new(IrType::Int { bits: 8, signed: true }),
            len: Some(value.len() as u64 + 1),
        };
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.module.globals.push(Global {
            name: name.clone(),
            ty,
            initializer: Some(crate::module::GlobalInit::Bytes(bytes)),
        });
        name
    }
}

#[cfg(test)]
mod lowerer_tests {
    use super::*;
    use crate::layout::FixedLayout;
    use cc_ast::*;
    use cc_diagnostics::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    fn int_ty(loc: SourceLocation) -> Node {
        type_specifier(loc, "int".to_string())
    }

    #[test]
    fn a_function_returning_a_constant_lowers_to_one_well_formed_block() {
        let body = compound(loc(), vec![return_stmt(loc(), Some(int_literal(loc(), 42)))]);
        let func = function_def(loc(), "main".to_string(), false, int_ty(loc()), param_list(loc(), vec![]), Some(body));
        let unit = translation_unit(loc(), vec![func]);

        let layout = FixedLayout { pointer_width: 64 };
        let (module, diags) = Lowerer::new("t", &layout).lower_translation_unit(&unit);

        assert!(diags.is_empty());
        assert!(module.is_well_formed());
        let f = module.function_by_name("main").unwrap();
        assert!(!f.is_declaration_only);
        assert_eq!(f.blocks.len(), 1);
    }

    #[test]
    fn a_forward_call_resolves_against_a_later_definition() {
        let callee_body = compound(loc(), vec![return_stmt(loc(), Some(int_literal(loc(), 1)))]);
        let caller_body = compound(
            loc(),
            vec![return_stmt(loc(), Some(call(loc(), identifier(loc(), "later".to_string()), vec![])))],
        );
        let caller =
            function_def(loc(), "first".to_string(), false, int_ty(loc()), param_list(loc(), vec![]), Some(caller_body));
        let callee =
            function_def(loc(), "later".to_string(), false, int_ty(loc()), param_list(loc(), vec![]), Some(callee_body));
        let unit = translation_unit(loc(), vec![caller, callee]);

        let layout = FixedLayout { pointer_width: 64 };
        let (module, diags) = Lowerer::new("t", &layout).lower_translation_unit(&unit);

        assert!(diags.is_empty(), "{:?}", diags.iter().collect::<Vec<_>>());
        assert!(module.is_well_formed());
    }

    #[test]
    fn an_undeclared_identifier_is_reported_and_lowering_continues() {
        let body = compound(loc(), vec![expr_stmt(loc(), identifier(loc(), "missing".to_string()))]);
        let func = function_def(loc(), "f".to_string(), false, int_ty(loc()), param_list(loc(), vec![]), Some(body));
        let unit = translation_unit(loc(), vec![func]);

        let layout = FixedLayout { pointer_width: 64 };
        let (module, diags) = Lowerer::new("t", &layout).lower_translation_unit(&unit);

        assert!(diags.has_errors());
        assert!(module.is_well_formed());
    }
}
