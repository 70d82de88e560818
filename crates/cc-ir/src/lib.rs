//! AST-to-IR lowering: `Module`/`Function`/`BasicBlock` container types, the
//! type/layout vocabulary a backend answers, and the `Lowerer` that walks a
//! `cc-ast` translation unit into them.
//!
//! Lowering never fails outright: a semantic error (undefined identifier,
//! `break` outside a loop, ...) is reported through [`cc_diagnostics`] and the
//! offending subtree simply produces no IR, so one bad statement never stops
//! the rest of the module from lowering. Callers check
//! `Diagnostics::has_errors()` after [`lower`] the same way they check it
//! after parsing.

pub mod error;
pub mod ids;
pub mod instr;
pub mod layout;
mod lower;
pub mod loop_ctx;
pub mod module;
pub mod symtab;

pub use error::Error;
pub use layout::{IrType, TypeLayout};
pub use module::{BasicBlock, Function, Global, GlobalInit, Module, SlotInfo};

use cc_ast::Node;
use cc_diagnostics::Diagnostics;

/// Lowers a whole `TranslationUnit` into an IR [`Module`], using `layout` to
/// answer backend-specific size/alignment questions (`sizeof` on an opaque
/// tag, pointer arithmetic's element stride). Always returns a module, even
/// when `diagnostics` carries errors — check `has_errors()` before handing
/// the result to a backend.
pub fn lower(unit: &Node, module_name: impl Into<String>, layout: &dyn TypeLayout) -> (Module, Diagnostics) {
    lower::Lowerer::new(module_name, layout).lower_translation_unit(unit)
}
