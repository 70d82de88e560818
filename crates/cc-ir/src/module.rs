//! `Module`/`Function`/`BasicBlock`: the container hierarchy the lowerer
//! fills in and the backend consumes. Ownership is a plain tree rooted at
//! `Module`; dropping it releases every function and block (see DESIGN.md).

use crate::ids::{BlockId, FuncId, InstrId, SlotId};
use crate::instr::{Instr, InstrKind, Terminator};
use crate::layout::IrType;

/// What an addressable global's storage starts out holding. Absent means
/// zero-initialized (the common case for plain `VarDecl`s at file scope,
/// since this front end does not constant-fold general initializers).
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalInit {
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub ty: IrType,
    pub initializer: Option<GlobalInit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub ty: IrType,
    /// Present for named locals/parameters; absent for compiler-introduced
    /// temporaries (there are none today, but nothing stops a future pass).
    pub name: Option<String>,
}

/// An ordered instruction sequence ending in exactly one terminator once
/// lowering of its construct completes. Created empty; instructions and the
/// terminator are appended by positioning a cursor at the block via
/// [`FunctionBuilder::switch_to`].
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Human-readable name (`"cond"`, `"body"`, `"end"`, ...), not used for
    /// identity — blocks are identified by `id`.
    pub label: String,
    pub instructions: Vec<Instr>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    /// True until a terminator has been appended; control-flow lowering
    /// consults this before appending a closing branch, since a branch/
    /// return/break/continue already closed the block.
    pub fn is_open(&self) -> bool {
        self.terminator.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: FuncId,
    pub name: String,
    pub param_types: Vec<IrType>,
    pub return_type: IrType,
    pub is_variadic: bool,
    /// First block is the entry block.
    pub blocks: Vec<BasicBlock>,
    pub slots: Vec<SlotInfo>,
    /// Declaration only, no body (a prototype). The lowerer still records
    /// its signature so calls to it type-check.
    pub is_declaration_only: bool,
}

impl Function {
    pub fn entry_block(&self) -> BlockId {
        self.blocks[0].id
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        self.blocks.iter().find(|b| b.id == id).expect("block id belongs to this function")
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        self.blocks.iter_mut().find(|b| b.id == id).expect("block id belongs to this function")
    }

    pub fn slot_type(&self, slot: SlotId) -> &IrType {
        &self.slots[slot.0 as usize].ty
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub globals: Vec<Global>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn function(&self, id: FuncId) -> &Function {
        self.functions.iter().find(|f| f.id == id).expect("func id belongs to this module")
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Every basic block in every defined function ends in exactly one
    /// terminator (testable property 7). A declaration-only function has no
    /// blocks to check.
    pub fn is_well_formed(&self) -> bool {
        self.functions
            .iter()
            .all(|f| f.is_declaration_only || f.blocks.iter().all(|b| b.terminator.is_some()))
    }
}

/// Builds up one [`Function`]'s blocks by keeping a "current block" cursor,
/// the way the source lowerer positions a builder cursor at a block's end
/// before appending to it.
pub struct FunctionBuilder {
    func: Function,
    current: BlockId,
    next_block: u32,
    next_instr: u32,
}

impl FunctionBuilder {
    pub fn new(id: FuncId, name: impl Into<String>, param_types: Vec<IrType>, return_type: IrType, is_variadic: bool) -> Self {
        let entry = BlockId(0);
        let func = Function {
            id,
            name: name.into(),
            param_types,
            return_type,
            is_variadic,
            blocks: vec![BasicBlock {
                id: entry,
                label: "entry".to_string(),
                instructions: Vec::new(),
                terminator: None,
            }],
            slots: Vec::new(),
            is_declaration_only: false,
        };
        Self {
            func,
            current: entry,
            next_block: 1,
            next_instr: 0,
        }
    }

    pub fn entry_block(&self) -> BlockId {
        BlockId(0)
    }

    pub fn current_block(&self) -> BlockId {
        self.current
    }

    pub fn is_current_block_open(&self) -> bool {
        self.func.block(self.current).is_open()
    }

    pub fn new_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        self.func.blocks.push(BasicBlock {
            id,
            label: label.into(),
            instructions: Vec::new(),
            terminator: None,
        });
        id
    }

    pub fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    /// Ids of every block with no terminator yet, in creation order. Used by
    /// the terminator-completion sweep run once a function body is fully
    /// lowered.
    pub fn open_block_ids(&self) -> Vec<BlockId> {
        self.func.blocks.iter().filter(|b| b.is_open()).map(|b| b.id).collect()
    }

    fn new_slot(&mut self, ty: IrType, name: Option<String>) -> SlotId {
        let id = SlotId(self.func.slots.len() as u32);
        self.func.slots.push(SlotInfo { ty, name });
        id
    }

    /// Reserves a slot of type `ty` and emits the `Alloca` producing its
    /// address in the current block. Returns the address as an operand,
    /// typed `Pointer(ty)`, ready to feed `Load`/`Store`.
    pub fn alloca(&mut self, ty: IrType, name: Option<String>) -> crate::instr::Operand {
        let slot = self.new_slot(ty.clone(), name);
        let id = self.push(InstrKind::Alloca { slot }, IrType::Pointer(Box::new(ty)));
        crate::instr::Operand::Value(id)
    }

    fn fresh_instr_id(&mut self) -> InstrId {
        let id = InstrId(self.next_instr);
        self.next_instr += 1;
        id
    }

    /// Appends `kind` (producing a value of type `ty`) to the current block
    /// and returns its id. Never called once the current block has a
    /// terminator.
    pub fn push(&mut self, kind: InstrKind, ty: IrType) -> InstrId {
        let id = self.fresh_instr_id();
        let block = self.func.block_mut(self.current);
        debug_assert!(block.is_open(), "pushed an instruction after a terminator");
        block.instructions.push(Instr { id, ty, kind });
        id
    }

    /// Closes the current block with `term`. A no-op (besides the debug
    /// assertion) if the block is already closed, matching the "branch to
    /// merge only if body block is open" rule used throughout control-flow
    /// lowering.
    pub fn terminate(&mut self, term: Terminator) {
        let block = self.func.block_mut(self.current);
        if block.is_open() {
            block.terminator = Some(term);
        }
    }

    pub fn slot_type(&self, slot: SlotId) -> &IrType {
        self.func.slot_type(slot)
    }

    pub fn finish(self) -> Function {
        self.func
    }
}

#[cfg(test)]
mod module_tests {
    use super::*;
    use crate::instr::Operand;

    #[test]
    fn builder_produces_a_well_formed_single_block_function() {
        let mut b = FunctionBuilder::new(FuncId(0), "main", vec![], IrType::Int { bits: 32, signed: true }, false);
        b.terminate(Terminator::Return(Some(Operand::ConstInt(42))));
        let func = b.finish();
        let module = Module { name: "t".into(), functions: vec![func], globals: vec![] };
        assert!(module.is_well_formed());
    }

    #[test]
    fn switching_blocks_moves_the_cursor() {
        let mut b = FunctionBuilder::new(FuncId(0), "f", vec![], IrType::Void, false);
        let other = b.new_block("other");
        assert_eq!(b.current_block(), b.entry_block());
        b.switch_to(other);
        assert_eq!(b.current_block(), other);
    }
}
