//! Instructions and operands. Every value-producing instruction is referenced
//! by the [`InstrId`] its block stores it under; operands are either such a
//! reference or an immediate constant.

use crate::ids::{BlockId, FuncId, InstrId, SlotId};
use crate::layout::IrType;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    ConstInt(i64),
    ConstFloat(f64),
    /// A null/zero pointer or integer constant, used for the
    /// terminator-completion sweep's synthetic return values.
    Zero,
    /// The address of a named global, resolved by the backend at emission.
    GlobalAddr(String),
    /// The `i`-th incoming argument's value, per the call ABI the backend
    /// implements. Stored into the parameter's slot immediately after the
    /// slot is allocated; never read anywhere else.
    Param(u32),
    Value(InstrId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    BitNot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Direct(FuncId),
    Indirect(Operand),
}

/// One non-terminator IR operation. `Instr::ty` is the type of the value it
/// produces (`IrType::Void` for instructions with no result, e.g. `Store`).
#[derive(Debug, Clone, PartialEq)]
pub struct Instr {
    pub id: InstrId,
    pub ty: IrType,
    pub kind: InstrKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstrKind {
    /// Reserves a stack slot for a local variable or parameter and produces
    /// its address (type `Pointer(slot's declared type)`). Emitted in
    /// whatever block the declaration is lowered in, not hoisted to entry.
    Alloca { slot: SlotId },
    Load { ptr: Operand },
    Store { ptr: Operand, value: Operand },
    Binary { op: BinOp, lhs: Operand, rhs: Operand },
    Compare { op: CmpOp, lhs: Operand, rhs: Operand },
    Unary { op: UnaryOp, operand: Operand },
    /// `x != 0`, inserted whenever a wider-than-one-bit value is used where a
    /// one-bit condition is required.
    NormalizeToBool { operand: Operand },
    ZeroExtend { operand: Operand },
    Truncate { operand: Operand },
    PtrToInt { operand: Operand },
    IntToPtr { operand: Operand },
    Call { callee: Callee, args: Vec<Operand> },
    /// Address of the `index`'th element of the pointer/array value `base`.
    ElemPtr { base: Operand, index: Operand, elem_ty: IrType },
    /// Address of a named field off `base`; member layout is left to the
    /// backend (this front end does not model struct layout).
    FieldPtr { base: Operand, field: String },
    /// Merges values from predecessor blocks, used for `&&`/`||`/`?:` lowering.
    Phi { incoming: Vec<(BlockId, Operand)> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Return(Option<Operand>),
    Branch(BlockId),
    CondBranch { cond: Operand, then_block: BlockId, else_block: BlockId },
    Unreachable,
}
