//! The `Backend` collaborator: an opaque target-machine stand-in the pipeline
//! hands a finished [`cc_ir::Module`] to for emission. A real implementation
//! wraps an LLVM-style target machine; that's out of scope here (`spec.md`
//! §1's external collaborator), so this module only fixes the trait contract
//! plus a `NullBackend` test double that records what it was asked to do.

use std::path::Path;

use cc_ir::{IrType, Module, TypeLayout};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("backend initialization failed: {0}")]
    InitializationFailed(String),
    #[error("emission failed: {0}")]
    EmissionFailed(String),
}

/// What a backend is asked to produce, per §4.5's "Module emission contract":
/// `generate` followed by any of `emit_object`/`emit_assembly`/`emit_ir`/
/// `emit_bitcode`. `TypeLayout` is a supertrait so the lowerer's `sizeof`
/// queries and a backend's emission live behind one collaborator.
pub trait Backend: TypeLayout {
    fn emit_object(&mut self, module: &Module, path: &Path) -> Result<(), BackendError>;
    fn emit_assembly(&mut self, module: &Module, path: &Path) -> Result<(), BackendError>;
    fn emit_ir(&mut self, module: &Module, path: &Path) -> Result<(), BackendError>;
    fn emit_bitcode(&mut self, module: &Module, path: &Path) -> Result<(), BackendError>;
}

/// A call `NullBackend` recorded, for tests to assert the pipeline asked for
/// exactly the emission it should have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Object(String),
    Assembly(String),
    Ir(String),
    Bitcode(String),
}

/// Records every emission request instead of invoking a real target machine.
/// Reports a fixed pointer width and a conservative one-word size for every
/// opaque tag, since it never sees real struct/union layout.
pub struct NullBackend {
    pub pointer_width: u32,
    pub calls: Vec<RecordedCall>,
    pub fail_on_emit: bool,
}

impl NullBackend {
    pub fn new(pointer_width: u32) -> Self {
        Self { pointer_width, calls: Vec::new(), fail_on_emit: false }
    }
}

impl TypeLayout for NullBackend {
    fn pointer_width(&self) -> u32 {
        self.pointer_width
    }

    fn layout_of_tag(&self, _name: &str) -> (u64, u64) {
        let word = u64::from(self.pointer_width) / 8;
        (word, word)
    }
}

impl Backend for NullBackend {
    fn emit_object(&mut self, _module: &Module, path: &Path) -> Result<(), BackendError> {
        self.calls.push(RecordedCall::Object(path.display().to_string()));
        if self.fail_on_emit {
            return Err(BackendError::EmissionFailed("object emission disabled".into()));
        }
        Ok(())
    }

    fn emit_assembly(&mut self, _module: &Module, path: &Path) -> Result<(), BackendError> {
        self.calls.push(RecordedCall::Assembly(path.display().to_string()));
        Ok(())
    }

    fn emit_ir(&mut self, _module: &Module, path: &Path) -> Result<(), BackendError> {
        self.calls.push(RecordedCall::Ir(path.display().to_string()));
        Ok(())
    }

    fn emit_bitcode(&mut self, _module: &Module, path: &Path) -> Result<(), BackendError> {
        self.calls.push(RecordedCall::Bitcode(path.display().to_string()));
        Ok(())
    }
}

/// Size of a pointer-sized `IrType` under a `Backend`'s layout, a convenience
/// used by the linker step when it needs a word size and not a whole module.
pub fn word_size(backend: &dyn Backend) -> u64 {
    cc_ir::layout::size_of(&IrType::Pointer(Box::new(IrType::Void)), backend)
}

#[cfg(test)]
mod backend_tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn null_backend_records_every_emission_kind() {
        let mut backend = NullBackend::new(64);
        let module = Module::new("t");
        backend.emit_object(&module, &PathBuf::from("a.o")).unwrap();
        backend.emit_assembly(&module, &PathBuf::from("a.s")).unwrap();
        backend.emit_ir(&module, &PathBuf::from("a.ll")).unwrap();
        backend.emit_bitcode(&module, &PathBuf::from("a.bc")).unwrap();
        assert_eq!(backend.calls.len(), 4);
    }

    #[test]
    fn null_backend_can_simulate_an_emission_failure() {
        let mut backend = NullBackend::new(64);
        backend.fail_on_emit = true;
        let module = Module::new("t");
        assert!(backend.emit_object(&module, &PathBuf::from("a.o")).is_err());
    }
}
