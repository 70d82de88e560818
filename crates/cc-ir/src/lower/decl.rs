//! Local declaration lowering: a `VarDecl` gets a stack slot exactly like a
//! parameter, with a coerced `Store` of its initializer when one is present.

use cc_ast::{Node, NodeKind};

use crate::instr::InstrKind;
use crate::layout::IrType;
use crate::lower::coerce::coerce;
use crate::lower::Lowerer;

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_decl(&mut self, node: &Node) {
        if !self.enter_declaration() {
            return;
        }
        match &node.kind {
            NodeKind::VarDecl { name } => {
                let ty = crate::lower::types::lower_type(&node.children[0]);
                let addr = self.builder_mut().alloca(ty.clone(), Some(name.clone()));
                self.symtab_mut().declare(name.clone(), addr.clone(), ty.clone(), false);

                if let Some(init) = node.children.get(1) {
                    let (value, value_ty) = self.lower_expr(init);
                    let coerced = coerce(self.builder_mut(), value, &value_ty, &ty);
                    self.push_instr(InstrKind::Store { ptr: addr, value: coerced }, IrType::Void);
                }
            }
            NodeKind::TypedefDecl { .. } => {}
            other => unreachable!("{other:?} is not a local declaration"),
        }
        self.exit_declaration();
    }
}
