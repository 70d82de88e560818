//! Per-function local symbol table: identifier → {slot, declared type,
//! global flag}. Cleared between functions; no per-scope layering (matching
//! the parser's typedef oracle, this isn't used for scope resolution, only to
//! find the slot an identifier expression reads or writes).

use indexmap::IndexMap;

use crate::instr::Operand;
use crate::layout::IrType;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalSymbol {
    /// Address of the variable's storage: an `Alloca` result for a local, or
    /// `Operand::GlobalAddr` for a global.
    pub ptr: Operand,
    /// The variable's declared (pointee) type, not the pointer's own type.
    pub ty: IrType,
    pub is_global: bool,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, LocalSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, ptr: Operand, ty: IrType, is_global: bool) {
        self.entries.insert(name.into(), LocalSymbol { ptr, ty, is_global });
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalSymbol> {
        self.entries.get(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod symtab_tests {
    use super::*;

    #[test]
    fn lookup_finds_a_declared_local() {
        let mut table = SymbolTable::new();
        table.declare("i", Operand::Zero, IrType::Int { bits: 32, signed: true }, false);
        assert_eq!(table.lookup("i").unwrap().ty, IrType::Int { bits: 32, signed: true });
        assert!(table.lookup("missing").is_none());
    }

    #[test]
    fn clear_empties_the_table_between_functions() {
        let mut table = SymbolTable::new();
        table.declare("i", Operand::Zero, IrType::Int { bits: 32, signed: true }, false);
        table.clear();
        assert!(table.lookup("i").is_none());
    }
}
