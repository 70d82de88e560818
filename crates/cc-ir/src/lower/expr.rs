//! Post-order expression lowering: each subexpression returns an
//! [`Operand`] plus its [`IrType`], binary/logical/conditional forms apply
//! the operand-coercion table, and lvalue-producing shapes (identifier,
//! `*p`, `a[i]`, `s.f`/`s->f`) go through [`Lowerer::lower_lvalue`] so
//! assignment, address-of, and the increment/decrement operators all share
//! one address-computation path.

use cc_ast::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp as AstUnaryOp};
use cc_ast::{Node, NodeKind};

use crate::error::Error;
use crate::instr::{BinOp, Callee, CmpOp, InstrKind, Operand, Terminator, UnaryOp as IrUnaryOp};
use crate::layout::IrType;
use crate::lower::coerce::{coerce, normalize_to_bool};
use crate::lower::Lowerer;

/// An addressable storage location: where to `Load`/`Store`, and the type of
/// what's stored there (not the address's own pointer type).
pub(crate) struct Place {
    pub addr: Operand,
    pub ty: IrType,
}

fn fallback() -> (Operand, IrType) {
    (Operand::Zero, IrType::Int { bits: 32, signed: true })
}

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_expr(&mut self, node: &Node) -> (Operand, IrType) {
        match &node.kind {
            NodeKind::IntLiteral { value } => (Operand::ConstInt(*value), IrType::Int { bits: 32, signed: true }),
            NodeKind::FloatLiteral { value } => (Operand::ConstFloat(*value), IrType::Float { bits: 64 }),
            NodeKind::CharLiteral { value } => (Operand::ConstInt(*value as i64), IrType::Int { bits: 8, signed: true }),
            NodeKind::StringLiteral { value } => {
                let name = self.intern_string_literal(value);
                (Operand::GlobalAddr(name), IrType::Pointer(Box::new(IrType::Int { bits: 8, signed: true })))
            }
            NodeKind::Identifier { name } => self.lower_identifier(node, name),
            NodeKind::Binary { op } => self.lower_binary(node, *op),
            NodeKind::Logical { op } => self.lower_logical(node, *op),
            NodeKind::Unary { op } => self.lower_unary(node, *op),
            NodeKind::Assign { op } => self.lower_assign(node, *op),
            NodeKind::Conditional => self.lower_conditional(node),
            NodeKind::Call => self.lower_call(node),
            NodeKind::Member { .. } | NodeKind::Subscript => self.lower_place_as_value(node),
            NodeKind::Cast => self.lower_cast(node),
            NodeKind::SizeofExpr => {
                let ty = self.static_type_of(&node.children[0]);
                let size = crate::layout::size_of(&ty, self.layout_ref());
                (Operand::ConstInt(size as i64), IrType::Int { bits: 64, signed: false })
            }
            NodeKind::SizeofType => {
                let ty = crate::lower::types::lower_type(&node.children[0]);
                let size = crate::layout::size_of(&ty, self.layout_ref());
                (Operand::ConstInt(size as i64), IrType::Int { bits: 64, signed: false })
            }
            other => unreachable!("{other:?} is not an expression node"),
        }
    }

    /// Resolves `node` to an address, emitting a diagnostic and returning
    /// `None` if it isn't a valid lvalue shape.
    pub(crate) fn lower_lvalue(&mut self, node: &Node) -> Option<Place> {
        match &node.kind {
            NodeKind::Identifier { name } => {
                if let Some(sym) = self.symtab().lookup(name) {
                    return Some(Place { addr: sym.ptr.clone(), ty: sym.ty.clone() });
                }
                if let Some(ty) = self.global_type(name) {
                    return Some(Place { addr: Operand::GlobalAddr(name.clone()), ty });
                }
                self.error(Error::UndefinedIdentifier(name.clone()), node);
                None
            }
            NodeKind::Unary { op: AstUnaryOp::Deref } => {
                let (value, ty) = self.lower_expr(&node.children[0]);
                match ty.pointee() {
                    Some(pointee) => Some(Place { addr: value, ty: pointee.clone() }),
                    None => {
                        self.error(Error::InvalidUnaryOperand('*'), node);
                        None
                    }
                }
            }
            NodeKind::Subscript => {
                let (base_val, base_ty) = self.lower_expr(&node.children[0]);
                let (index_val, _) = self.lower_expr(&node.children[1]);
                match base_ty.pointee() {
                    Some(elem_ty) => {
                        let elem_ty = elem_ty.clone();
                        let ptr = self.push_instr(
                            InstrKind::ElemPtr { base: base_val, index: index_val, elem_ty: elem_ty.clone() },
                            IrType::Pointer(Box::new(elem_ty.clone())),
                        );
                        Some(Place { addr: Operand::Value(ptr), ty: elem_ty })
                    }
                    None => {
                        self.error(Error::InvalidLvalue, node);
                        None
                    }
                }
            }
            NodeKind::Member { name, arrow } => {
                let base_addr = if *arrow {
                    self.lower_expr(&node.children[0]).0
                } else {
                    self.lower_lvalue(&node.children[0])?.addr
                };
                // Member layout isn't modeled front-end side (see
                // `InstrKind::FieldPtr`); the field's declared type is left
                // opaque for the backend to resolve by name.
                let field_ty = IrType::Opaque { name: name.clone() };
                let ptr = self.push_instr(
                    InstrKind::FieldPtr { base: base_addr, field: name.clone() },
                    IrType::Pointer(Box::new(field_ty.clone())),
                );
                Some(Place { addr: Operand::Value(ptr), ty: field_ty })
            }
            _ => {
                self.error(Error::InvalidLvalue, node);
                None
            }
        }
    }

    fn lower_identifier(&mut self, node: &Node, name: &str) -> (Operand, IrType) {
        if let Some(sym) = self.symtab().lookup(name) {
            let ty = sym.ty.clone();
            let ptr = sym.ptr.clone();
            let id = self.push_instr(InstrKind::Load { ptr }, ty.clone());
            return (Operand::Value(id), ty);
        }
        if let Some(ty) = self.global_type(name) {
            let id = self.push_instr(InstrKind::Load { ptr: Operand::GlobalAddr(name.to_string()) }, ty.clone());
            return (Operand::Value(id), ty);
        }
        if let Some(func_ty) = self.function_pointer_type(name) {
            return (Operand::GlobalAddr(name.to_string()), func_ty);
        }
        self.error(Error::UndefinedIdentifier(name.to_string()), node);
        fallback()
    }

    fn lower_binary(&mut self, node: &Node, op: BinaryOp) -> (Operand, IrType) {
        let (lhs_val, lhs_ty) = self.lower_expr(&node.children[0]);
        if op == BinaryOp::Comma {
            return self.lower_expr(&node.children[1]);
        }
        let (rhs_val, rhs_ty) = self.lower_expr(&node.children[1]);

        if lhs_ty.is_pointer() && matches!(op, BinaryOp::Add | BinaryOp::Sub) && rhs_ty.is_integer() {
            return self.lower_pointer_arith(lhs_val, &lhs_ty, op, rhs_val);
        }

        let common = common_arith_type(&lhs_ty, &rhs_ty);
        let lhs_c = coerce(self.builder_mut(), lhs_val, &lhs_ty, &common);
        let rhs_c = coerce(self.builder_mut(), rhs_val, &rhs_ty, &common);

        if let Some(cmp_op) = as_cmp_op(op) {
            let id = self.push_instr(InstrKind::Compare { op: cmp_op, lhs: lhs_c, rhs: rhs_c }, IrType::BOOL);
            return (Operand::Value(id), IrType::BOOL);
        }

        let id = self.push_instr(InstrKind::Binary { op: as_bin_op(op), lhs: lhs_c, rhs: rhs_c }, common.clone());
        (Operand::Value(id), common)
    }

    fn lower_pointer_arith(&mut self, ptr: Operand, ptr_ty: &IrType, op: BinaryOp, index: Operand) -> (Operand, IrType) {
        let elem_ty = ptr_ty.pointee().expect("checked by caller").clone();
        let index = if op == BinaryOp::Sub {
            let negated = self.push_instr(
                InstrKind::Unary { op: IrUnaryOp::Neg, operand: index },
                IrType::Int { bits: 64, signed: true },
            );
            Operand::Value(negated)
        } else {
            index
        };
        let id = self.push_instr(InstrKind::ElemPtr { base: ptr, index, elem_ty }, ptr_ty.clone());
        (Operand::Value(id), ptr_ty.clone())
    }

    /// `&&`/`||` realize short-circuit control flow rather than eager
    /// evaluation: a two-block branch into the rhs (or past it) merging at a
    /// phi that carries the short-circuited constant on the skipped path.
    fn lower_logical(&mut self, node: &Node, op: LogicalOp) -> (Operand, IrType) {
        let (lhs_val, lhs_ty) = self.lower_expr(&node.children[0]);
        let lhs_bit = normalize_to_bool(self.builder_mut(), lhs_val, &lhs_ty);
        let lhs_end = self.builder_ref().current_block();

        let rhs_block = self.builder_mut().new_block("logical.rhs");
        let merge_block = self.builder_mut().new_block("logical.merge");

        // `&&` evaluates rhs only when lhs is true; `||` only when lhs is false.
        let (then_block, else_block) = match op {
            LogicalOp::And => (rhs_block, merge_block),
            LogicalOp::Or => (merge_block, rhs_block),
        };
        self.builder_mut().terminate(Terminator::CondBranch { cond: lhs_bit, then_block, else_block });

        self.builder_mut().switch_to(rhs_block);
        let (rhs_val, rhs_ty) = self.lower_expr(&node.children[1]);
        let rhs_bit = normalize_to_bool(self.builder_mut(), rhs_val, &rhs_ty);
        let rhs_end = self.builder_ref().current_block();
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(merge_block));
        }

        self.builder_mut().switch_to(merge_block);
        let short_circuit_value = match op {
            LogicalOp::And => Operand::ConstInt(0),
            LogicalOp::Or => Operand::ConstInt(1),
        };
        let phi = self.push_instr(
            InstrKind::Phi { incoming: vec![(lhs_end, short_circuit_value), (rhs_end, rhs_bit)] },
            IrType::BOOL,
        );
        (Operand::Value(phi), IrType::BOOL)
    }

    fn lower_unary(&mut self, node: &Node, op: AstUnaryOp) -> (Operand, IrType) {
        match op {
            AstUnaryOp::Plus => self.lower_expr(&node.children[0]),
            AstUnaryOp::Neg => {
                let (val, ty) = self.lower_expr(&node.children[0]);
                let id = self.push_instr(InstrKind::Unary { op: IrUnaryOp::Neg, operand: val }, ty.clone());
                (Operand::Value(id), ty)
            }
            AstUnaryOp::BitNot => {
                let (val, ty) = self.lower_expr(&node.children[0]);
                let id = self.push_instr(InstrKind::Unary { op: IrUnaryOp::BitNot, operand: val }, ty.clone());
                (Operand::Value(id), ty)
            }
            AstUnaryOp::Not => {
                let (val, ty) = self.lower_expr(&node.children[0]);
                let bit = normalize_to_bool(self.builder_mut(), val, &ty);
                let id = self.push_instr(
                    InstrKind::Compare { op: CmpOp::Eq, lhs: bit, rhs: Operand::ConstInt(0) },
                    IrType::BOOL,
                );
                (Operand::Value(id), IrType::BOOL)
            }
            AstUnaryOp::Deref => match self.lower_lvalue(node) {
                Some(place) => {
                    let id = self.push_instr(InstrKind::Load { ptr: place.addr }, place.ty.clone());
                    (Operand::Value(id), place.ty)
                }
                None => fallback(),
            },
            AstUnaryOp::AddrOf => match self.lower_lvalue(&node.children[0]) {
                Some(place) => (place.addr, IrType::Pointer(Box::new(place.ty))),
                None => fallback(),
            },
            AstUnaryOp::PreInc | AstUnaryOp::PreDec | AstUnaryOp::PostInc | AstUnaryOp::PostDec => {
                self.lower_incdec(node, op)
            }
        }
    }

    fn lower_incdec(&mut self, node: &Node, op: AstUnaryOp) -> (Operand, IrType) {
        let place = match self.lower_lvalue(&node.children[0]) {
            Some(place) => place,
            None => return fallback(),
        };
        let old_id = self.push_instr(InstrKind::Load { ptr: place.addr.clone() }, place.ty.clone());
        let old = Operand::Value(old_id);
        let is_increment = matches!(op, AstUnaryOp::PreInc | AstUnaryOp::PostInc);

        let new_val = if place.ty.is_pointer() {
            let elem_ty = place.ty.pointee().expect("checked above").clone();
            let step = if is_increment {
                Operand::ConstInt(1)
            } else {
                Operand::ConstInt(-1)
            };
            let id = self.push_instr(InstrKind::ElemPtr { base: old.clone(), index: step, elem_ty }, place.ty.clone());
            Operand::Value(id)
        } else {
            let bin_op = if is_increment { BinOp::Add } else { BinOp::Sub };
            let id = self.push_instr(
                InstrKind::Binary { op: bin_op, lhs: old.clone(), rhs: Operand::ConstInt(1) },
                place.ty.clone(),
            );
            Operand::Value(id)
        };

        self.push_instr(InstrKind::Store { ptr: place.addr, value: new_val.clone() }, IrType::Void);
        match op {
            AstUnaryOp::PreInc | AstUnaryOp::PreDec => (new_val, place.ty),
            _ => (old, place.ty),
        }
    }

    fn lower_assign(&mut self, node: &Node, op: AssignOp) -> (Operand, IrType) {
        let place = match self.lower_lvalue(&node.children[0]) {
            Some(place) => place,
            None => return fallback(),
        };
        let (rhs_val, rhs_ty) = self.lower_expr(&node.children[1]);

        let result = match op.compound_op() {
            None => coerce(self.builder_mut(), rhs_val, &rhs_ty, &place.ty),
            Some(bin_op) => {
                let old_id = self.push_instr(InstrKind::Load { ptr: place.addr.clone() }, place.ty.clone());
                let old = Operand::Value(old_id);
                let rhs_c = coerce(self.builder_mut(), rhs_val, &rhs_ty, &place.ty);
                let id = self.push_instr(
                    InstrKind::Binary { op: as_bin_op(bin_op), lhs: old, rhs: rhs_c },
                    place.ty.clone(),
                );
                Operand::Value(id)
            }
        };
        self.push_instr(InstrKind::Store { ptr: place.addr, value: result.clone() }, IrType::Void);
        (result, place.ty)
    }

    /// Structurally identical to an `if`/`else` whose two arms each produce a
    /// value: both arms are coerced to their common type in their own tail
    /// block, then merged with a phi.
    fn lower_conditional(&mut self, node: &Node) -> (Operand, IrType) {
        let (cond_val, cond_ty) = self.lower_expr(&node.children[0]);
        let cond_bit = normalize_to_bool(self.builder_mut(), cond_val, &cond_ty);

        let then_block = self.builder_mut().new_block("cond.then");
        let else_block = self.builder_mut().new_block("cond.else");
        self.builder_mut().terminate(Terminator::CondBranch { cond: cond_bit, then_block, else_block });

        self.builder_mut().switch_to(then_block);
        let (then_val, then_ty) = self.lower_expr(&node.children[1]);
        let then_end = self.builder_ref().current_block();

        self.builder_mut().switch_to(else_block);
        let (else_val, else_ty) = self.lower_expr(&node.children[2]);
        let else_end = self.builder_ref().current_block();

        let common = common_arith_type(&then_ty, &else_ty);

        self.builder_mut().switch_to(then_end);
        let then_c = coerce(self.builder_mut(), then_val, &then_ty, &common);
        let then_tail = self.builder_ref().current_block();
        let merge_block = self.builder_mut().new_block("cond.merge");
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(merge_block));
        }

        self.builder_mut().switch_to(else_end);
        let else_c = coerce(self.builder_mut(), else_val, &else_ty, &common);
        let else_tail = self.builder_ref().current_block();
        if self.builder_ref().is_current_block_open() {
            self.builder_mut().terminate(Terminator::Branch(merge_block));
        }

        self.builder_mut().switch_to(merge_block);
        let phi = self.push_instr(
            InstrKind::Phi { incoming: vec![(then_tail, then_c), (else_tail, else_c)] },
            common.clone(),
        );
        (Operand::Value(phi), common)
    }

    fn lower_call(&mut self, node: &Node) -> (Operand, IrType) {
        let callee_node = &node.children[0];
        let args = &node.children[1..];

        let (callee, ret_ty, param_types) = if let NodeKind::Identifier { name } = &callee_node.kind {
            match self.direct_callee(name) {
                Some(parts) => parts,
                None => self.indirect_callee(callee_node),
            }
        } else {
            self.indirect_callee(callee_node)
        };

        let mut lowered_args = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let (val, ty) = self.lower_expr(arg);
            let coerced = match param_types.get(i) {
                Some(param_ty) => coerce(self.builder_mut(), val, &ty, param_ty),
                None => val,
            };
            lowered_args.push(coerced);
        }

        let id = self.push_instr(InstrKind::Call { callee, args: lowered_args }, ret_ty.clone());
        (Operand::Value(id), ret_ty)
    }

    fn direct_callee(&self, name: &str) -> Option<(Callee, IrType, Vec<IrType>)> {
        let func_id = *self.func_ids_ref().get(name)?;
        let func = self.module_ref().function(func_id);
        Some((Callee::Direct(func_id), func.return_type.clone(), func.param_types.clone()))
    }

    fn indirect_callee(&mut self, node: &Node) -> (Callee, IrType, Vec<IrType>) {
        let (val, ty) = self.lower_expr(node);
        match ty.pointee() {
            Some(IrType::Function { ret, params, .. }) => (Callee::Indirect(val), (**ret).clone(), params.clone()),
            _ => {
                self.error(Error::CallOfNonFunction, node);
                (Callee::Indirect(Operand::Zero), IrType::Int { bits: 32, signed: true }, Vec::new())
            }
        }
    }

    fn lower_cast(&mut self, node: &Node) -> (Operand, IrType) {
        let target = crate::lower::types::lower_type(&node.children[0]);
        let (val, ty) = self.lower_expr(&node.children[1]);
        let coerced = coerce(self.builder_mut(), val, &ty, &target);
        (coerced, target)
    }

    fn lower_place_as_value(&mut self, node: &Node) -> (Operand, IrType) {
        match self.lower_lvalue(node) {
            Some(place) => {
                let id = self.push_instr(InstrKind::Load { ptr: place.addr }, place.ty.clone());
                (Operand::Value(id), place.ty)
            }
            None => fallback(),
        }
    }

    /// Infers an expression's static type without lowering it — `sizeof`'s
    /// operand is never evaluated, so this has no side effects and emits no
    /// instructions.
    fn static_type_of(&self, node: &Node) -> IrType {
        match &node.kind {
            NodeKind::IntLiteral { .. } => IrType::Int { bits: 32, signed: true },
            NodeKind::FloatLiteral { .. } => IrType::Float { bits: 64 },
            NodeKind::CharLiteral { .. } => IrType::Int { bits: 8, signed: true },
            NodeKind::StringLiteral { .. } => IrType::Pointer(Box::new(IrType::Int { bits: 8, signed: true })),
            NodeKind::Identifier { name } => self
                .symtab_ref()
                .lookup(name)
                .map(|s| s.ty.clone())
                .or_else(|| self.global_type(name))
                .unwrap_or(IrType::Int { bits: 32, signed: true }),
            NodeKind::Unary { op: AstUnaryOp::Deref } => self
                .static_type_of(&node.children[0])
                .pointee()
                .cloned()
                .unwrap_or(IrType::Int { bits: 32, signed: true }),
            NodeKind::Unary { op: AstUnaryOp::AddrOf } => {
                IrType::Pointer(Box::new(self.static_type_of(&node.children[0])))
            }
            NodeKind::Unary { .. } => self.static_type_of(&node.children[0]),
            NodeKind::Binary { .. } | NodeKind::Logical { .. } | NodeKind::Assign { .. } => {
                self.static_type_of(&node.children[0])
            }
            NodeKind::Conditional => self.static_type_of(&node.children[1]),
            NodeKind::Cast => crate::lower::types::lower_type(&node.children[0]),
            NodeKind::Subscript => self
                .static_type_of(&node.children[0])
                .pointee()
                .cloned()
                .unwrap_or(IrType::Int { bits: 32, signed: true }),
            NodeKind::Member { name, .. } => IrType::Opaque { name: name.clone() },
            NodeKind::Call => match &node.children[0].kind {
                NodeKind::Identifier { name } => self
                    .func_ids_ref()
                    .get(name)
                    .map(|id| self.module_ref().function(*id).return_type.clone())
                    .unwrap_or(IrType::Int { bits: 32, signed: true }),
                _ => IrType::Int { bits: 32, signed: true },
            },
            NodeKind::SizeofExpr | NodeKind::SizeofType => IrType::Int { bits: 64, signed: false },
            _ => IrType::Int { bits: 32, signed: true },
        }
    }
}

fn common_arith_type(lhs: &IrType, rhs: &IrType) -> IrType {
    match (lhs, rhs) {
        (IrType::Float { bits: a }, IrType::Float { bits: b }) => IrType::Float { bits: (*a).max(*b) },
        (IrType::Float { bits }, _) | (_, IrType::Float { bits }) => IrType::Float { bits: *bits },
        (IrType::Int { bits: a, signed: sa }, IrType::Int { bits: b, signed: sb }) => {
            let bits = (*a).max(*b).max(32);
            let signed = if a == b { *sa && *sb } else if a > b { *sa } else { *sb };
            IrType::Int { bits, signed }
        }
        (other, _) => other.clone(),
    }
}

fn as_cmp_op(op: BinaryOp) -> Option<CmpOp> {
    Some(match op {
        BinaryOp::Eq => CmpOp::Eq,
        BinaryOp::Ne => CmpOp::Ne,
        BinaryOp::Lt => CmpOp::Lt,
        BinaryOp::Gt => CmpOp::Gt,
        BinaryOp::Le => CmpOp::Le,
        BinaryOp::Ge => CmpOp::Ge,
        _ => return None,
    })
}

fn as_bin_op(op: BinaryOp) -> BinOp {
    match op {
        BinaryOp::Add => BinOp::Add,
        BinaryOp::Sub => BinOp::Sub,
        BinaryOp::Mul => BinOp::Mul,
        BinaryOp::Div => BinOp::Div,
        BinaryOp::Mod => BinOp::Mod,
        BinaryOp::BitAnd => BinOp::BitAnd,
        BinaryOp::BitOr => BinOp::BitOr,
        BinaryOp::BitXor => BinOp::BitXor,
        BinaryOp::Shl => BinOp::Shl,
        BinaryOp::Shr => BinOp::Shr,
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Comma => {
            unreachable!("comparison/comma ops are handled before reaching as_bin_op")
        }
    }
}
