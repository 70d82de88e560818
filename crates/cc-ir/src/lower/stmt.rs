//! Statement lowering: control-flow constructs split and stitch together
//! basic blocks via the builder cursor; everything else either dispatches to
//! [`crate::lower::expr`]/[`crate::lower::decl`] or is a direct terminator.

use cc_ast::{Node, NodeKind};

use crate::error::Error;
use crate::ids::BlockId;
use crate::instr::{CmpOp, InstrKind, Operand, Terminator};
use crate::layout::IrType;
use crate::lower::coerce::{coerce, normalize_to_bool};
use crate::lower::Lowerer;

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_stmt(&mut self, node: &Node) {
        if !self.enter_statement() {
            return;
        }
        match &node.kind {
            NodeKind::Compound => {
                for child in &node.children {
                    match &child.kind {
                        NodeKind::VarDecl { .. } | NodeKind::TypedefDecl { .. } => self.lower_decl(child),
                        _ => self.lower_stmt(child),
                    }
                }
            }
            NodeKind::If => self.lower_if(node),
            NodeKind::Switch => self.lower_switch(node),
            NodeKind::While => self.lower_while(node),
            NodeKind::DoWhile => self.lower_do_while(node),
            NodeKind::For => self.lower_for(node),
            NodeKind::Return => self.lower_return(node),
            NodeKind::Break => self.lower_break(node),
            NodeKind::Continue => self.lower_continue(node),
            NodeKind::Goto { label } => self.lower_goto(node, label),
            NodeKind::Labeled { label } => self.lower_labeled(node, label),
            NodeKind::Case | NodeKind::Default => {
                unreachable!("Case/Default are only visited directly by lower_switch's item walk")
            }
            NodeKind::Empty => {}
            NodeKind::ExprStmt => {
                self.lower_expr(&node.children[0]);
            }
            _ => {
                self.lower_expr(node);
            }
        }
        self.exit_statement();
    }

    fn lower_if(&mut self, node: &Node) {
        let (cond_val, cond_ty) = self.lower_expr(&node.children[0]);
        let cond_bit = normalize_to_bool(self.builder_mut(), cond_val, &cond_ty);

        let then_block = self.builder_mut().new_block("if.then");
        let merge_block = self.builder_mut().new_block("if.merge");
        let else_block = if node.children.len() > 2 {
            self.builder_mut().new_block("if.else")
        } else {
            merge_block
        };

        self.builder_mut().terminate(Terminator::CondBranch { cond: cond_bit, then_block, else_block });

        self.builder_mut().switch_to(then_block);
        self.lower_stmt(&node.children[1]);
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(merge_block));
        }

        if let Some(else_branch) = node.children.get(2) {
            self.builder_mut().switch_to(else_block);
            self.lower_stmt(else_branch);
            if self.builder_ref().is_current_block_open() {
                self.builder_mut().terminate(Terminator::Branch(merge_block));
            }
        }

        self.builder_mut().switch_to(merge_block);
    }

    fn lower_while(&mut self, node: &Node) {
        let cond_block = self.builder_mut().new_block("while.cond");
        let body_block = self.builder_mut().new_block("while.body");
        let end_block = self.builder_mut().new_block("while.end");

        self.builder_mut().terminate(Terminator::Branch(cond_block));

        self.builder_mut().switch_to(cond_block);
        let (cond_val, cond_ty) = self.lower_expr(&node.children[0]);
        let cond_bit = normalize_to_bool(self.builder_mut(), cond_val, &cond_ty);
        self.builder_mut().terminate(Terminator::CondBranch { cond: cond_bit, then_block: body_block, else_block: end_block });

        self.loop_ctx_push_loop(cond_block, end_block);
        self.builder_mut().switch_to(body_block);
        self.lower_stmt(&node.children[1]);
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(cond_block));
        }
        self.loop_ctx_pop();

        self.builder_mut().switch_to(end_block);
    }

    fn lower_do_while(&mut self, node: &Node) {
        let body_block = self.builder_mut().new_block("do.body");
        let cond_block = self.builder_mut().new_block("do.cond");
        let end_block = self.builder_mut().new_block("do.end");

        self.builder_mut().terminate(Terminator::Branch(body_block));

        self.loop_ctx_push_loop(cond_block, end_block);
        self.builder_mut().switch_to(body_block);
        self.lower_stmt(&node.children[0]);
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(cond_block));
        }
        self.loop_ctx_pop();

        self.builder_mut().switch_to(cond_block);
        let (cond_val, cond_ty) = self.lower_expr(&node.children[1]);
        let cond_bit = normalize_to_bool(self.builder_mut(), cond_val, &cond_ty);
        self.builder_mut().terminate(Terminator::CondBranch { cond: cond_bit, then_block: body_block, else_block: end_block });

        self.builder_mut().switch_to(end_block);
    }

    fn lower_for(&mut self, node: &Node) {
        let init = &node.children[0];
        match &init.kind {
            NodeKind::Empty => {}
            NodeKind::VarDecl { .. } | NodeKind::TypedefDecl { .. } => self.lower_decl(init),
            NodeKind::Compound => {
                for child in &init.children {
                    self.lower_decl(child);
                }
            }
            NodeKind::ExprStmt => {
                self.lower_expr(&init.children[0]);
            }
            _ => {
                self.lower_expr(init);
            }
        }

        let cond_block = self.builder_mut().new_block("for.cond");
        let body_block = self.builder_mut().new_block("for.body");
        let inc_block = self.builder_mut().new_block("for.inc");
        let end_block = self.builder_mut().new_block("for.end");

        self.builder_mut().terminate(Terminator::Branch(cond_block));

        self.builder_mut().switch_to(cond_block);
        let cond = &node.children[1];
        if matches!(cond.kind, NodeKind::Empty) {
            self.builder_mut().terminate(Terminator::Branch(body_block));
        } else {
            let (cond_val, cond_ty) = self.lower_expr(cond);
            let cond_bit = normalize_to_bool(self.builder_mut(), cond_val, &cond_ty);
            self.builder_mut().terminate(Terminator::CondBranch { cond: cond_bit, then_block: body_block, else_block: end_block });
        }

        self.loop_ctx_push_loop(inc_block, end_block);
        self.builder_mut().switch_to(body_block);
        self.lower_stmt(&node.children[3]);
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(inc_block));
        }
        self.loop_ctx_pop();

        self.builder_mut().switch_to(inc_block);
        let inc = &node.children[2];
        if !matches!(inc.kind, NodeKind::Empty) {
            self.lower_expr(inc);
        }
        self.builder_mut().terminate(Terminator::Branch(cond_block));

        self.builder_mut().switch_to(end_block);
    }

    /// Three passes, in this order, so every operand the dispatch chain
    /// references is computed in a block that dominates its use:
    ///
    /// 1. evaluate and coerce every `Case` value while still in the block
    ///    active at `switch` entry (before branching anywhere);
    /// 2. lower each arm's statement into its own pre-allocated block,
    ///    falling through to the next arm when its block is left open
    ///    (matching C's `case` fallthrough);
    /// 3. build the sequential compare chain in the entry block, now that
    ///    every comparison value and arm block already exists.
    fn lower_switch(&mut self, node: &Node) {
        let (scrutinee_val, scrutinee_ty) = self.lower_expr(&node.children[0]);
        let entry_block = self.builder_ref().current_block();

        let body = &node.children[1];
        let items: Vec<&Node> = match &body.kind {
            NodeKind::Compound => body.children.iter().collect(),
            _ => vec![body],
        };

        let mut dispatch: Vec<(Operand, BlockId)> = Vec::new();
        for item in &items {
            if let NodeKind::Case = &item.kind {
                let (value, value_ty) = self.lower_expr(&item.children[0]);
                let value = coerce(self.builder_mut(), value, &value_ty, &scrutinee_ty);
                let case_block = self.builder_mut().new_block("switch.case");
                dispatch.push((value, case_block));
            }
        }

        let end_block = self.builder_mut().new_block("switch.end");
        self.loop_ctx_push_switch(end_block);

        let prefix_block = self.builder_mut().new_block("switch.prefix");
        self.builder_mut().switch_to(prefix_block);
        let mut dispatch_cursor = 0usize;
        let mut default_block: Option<BlockId> = None;
        for item in &items {
            match &item.kind {
                NodeKind::Case => {
                    let (_, target) = dispatch[dispatch_cursor];
                    dispatch_cursor += 1;
                    if self.builder_ref().is_current_block_open() {
                        self.builder_mut().terminate(Terminator::Branch(target));
                    }
                    self.builder_mut().switch_to(target);
                    self.lower_stmt(&item.children[1]);
                }
                NodeKind::Default => {
                    let target = self.builder_mut().new_block("switch.default");
                    default_block = Some(target);
                    if self.builder_ref().is_current_block_open() {
                        self.builder_mut().terminate(Terminator::Branch(target));
                    }
                    self.builder_mut().switch_to(target);
                    self.lower_stmt(&item.children[0]);
                }
                _ => self.lower_stmt(item),
            }
        }
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(end_block));
        }
        self.loop_ctx_pop();

        self.builder_mut().switch_to(entry_block);
        // With no default: an unmatched value skips the body entirely (real C
        // semantics) when there's at least one case, or falls into the body's
        // own start block when there are no cases to compare against at all.
        let fallback = default_block.unwrap_or(if dispatch.is_empty() { prefix_block } else { end_block });
        if dispatch.is_empty() {
            self.builder_mut().terminate(Terminator::Branch(fallback));
        } else {
            let mut check_block = entry_block;
            for (i, (value, target)) in dispatch.iter().enumerate() {
                let is_last = i + 1 == dispatch.len();
                let next_check = if is_last { fallback } else { self.builder_mut().new_block("switch.check") };
                self.builder_mut().switch_to(check_block);
                let cmp = self.push_instr(
                    InstrKind::Compare { op: CmpOp::Eq, lhs: scrutinee_val.clone(), rhs: value.clone() },
                    IrType::BOOL,
                );
                self.builder_mut().terminate(Terminator::CondBranch {
                    cond: Operand::Value(cmp),
                    then_block: *target,
                    else_block: next_check,
                });
                check_block = next_check;
            }
        }

        self.builder_mut().switch_to(end_block);
    }

    fn lower_break(&mut self, node: &Node) {
        match self.loop_ctx_current() {
            Some(targets) => {
                self.builder_mut().terminate(Terminator::Branch(targets.break_target));
            }
            None => {
                self.error(Error::BreakOutsideLoop, node);
                self.builder_mut().terminate(Terminator::Unreachable);
            }
        }
    }

    fn lower_continue(&mut self, node: &Node) {
        match self.loop_ctx_current().and_then(|t| t.continue_target) {
            Some(target) => {
                self.builder_mut().terminate(Terminator::Branch(target));
            }
            None => {
                self.error(Error::ContinueOutsideLoop, node);
                self.builder_mut().terminate(Terminator::Unreachable);
            }
        }
    }

    fn lower_goto(&mut self, node: &Node, label: &str) {
        match self.label_block(label) {
            Some(target) => {
                self.builder_mut().terminate(Terminator::Branch(target));
            }
            None => {
                self.error(Error::UndefinedLabel(label.to_string()), node);
                self.builder_mut().terminate(Terminator::Unreachable);
            }
        }
    }

    fn lower_labeled(&mut self, node: &Node, label: &str) {
        let target = self.label_block(label).expect("collect_labels pre-registers every Labeled node");
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(target));
        }
        self.builder_mut().switch_to(target);
        self.lower_stmt(&node.children[0]);
    }

    fn lower_return(&mut self, node: &Node) {
        let return_type = self.return_type_ref().clone();
        let value = node.children.first().map(|v| self.lower_expr(v));
        let value = match (value, &return_type) {
            (_, IrType::Void) => None,
            (Some((val, ty)), _) => Some(coerce(self.builder_mut(), val, &ty, &return_type)),
            (None, _) => None,
        };
        self.builder_mut().terminate(Terminator::Return(value));
    }
}
