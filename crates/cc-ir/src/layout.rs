//! The IR's type vocabulary and the `TypeLayout` query a backend answers for it.
//!
//! Primitive widths (`char` = 8 bits, `int` = 32, ...) are fixed by the
//! platform-independent core and never consult the backend. Pointer width and
//! the size of opaque tag types (`struct`/`union`/`enum`, whose member layout
//! this front end does not model) are backend-specific, so `sizeof` on those
//! goes through `TypeLayout` instead of the source's hard-coded constant 4.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrType {
    Void,
    Int { bits: u32, signed: bool },
    Float { bits: u32 },
    Pointer(Box<IrType>),
    Array { elem: Box<IrType>, len: Option<u64> },
    Function { ret: Box<IrType>, params: Vec<IrType>, is_variadic: bool },
    /// A `struct`/`union`/`enum` tag or unresolved typedef whose layout this
    /// front end never models; `name` is passed to `TypeLayout::layout_of_tag`.
    Opaque { name: String },
}

impl IrType {
    pub const BOOL: IrType = IrType::Int { bits: 1, signed: false };

    pub fn is_pointer(&self) -> bool {
        matches!(self, IrType::Pointer(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, IrType::Int { .. })
    }

    pub fn pointee(&self) -> Option<&IrType> {
        match self {
            IrType::Pointer(inner) => Some(inner),
            IrType::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }
}

/// Backend-provided size/alignment facts the lowerer needs to resolve
/// `sizeof` and pointer arithmetic. Implemented by `cc-driver`'s `Backend`
/// trait (as a supertrait) and, in tests, by a fixed-width stand-in.
pub trait TypeLayout {
    /// Width of a pointer on the target, in bits.
    fn pointer_width(&self) -> u32;

    /// Size and alignment, in bytes, of a named `struct`/`union`/`enum` tag
    /// or an unresolved type name. Backends with no information about a tag
    /// may return a conservative default (e.g. one machine word).
    fn layout_of_tag(&self, name: &str) -> (u64, u64);
}

/// Byte size of `ty` under `layout`. Function types have no size; asking for
/// one is a caller bug.
pub fn size_of(ty: &IrType, layout: &dyn TypeLayout) -> u64 {
    match ty {
        IrType::Void => 0,
        IrType::Int { bits, .. } => u64::from(*bits).div_ceil(8),
        IrType::Float { bits } => u64::from(*bits) / 8,
        IrType::Pointer(_) => u64::from(layout.pointer_width()) / 8,
        IrType::Array { elem, len } => size_of(elem, layout) * len.unwrap_or(0),
        IrType::Opaque { name } => layout.layout_of_tag(name).0,
        IrType::Function { .. } => 0,
    }
}

pub fn align_of(ty: &IrType, layout: &dyn TypeLayout) -> u64 {
    match ty {
        IrType::Array { elem, .. } => align_of(elem, layout),
        IrType::Opaque { name } => layout.layout_of_tag(name).1,
        other => size_of(other, layout).max(1),
    }
}

#[cfg(test)]
pub struct FixedLayout {
    pub pointer_width: u32,
}

#[cfg(test)]
impl TypeLayout for FixedLayout {
    fn pointer_width(&self) -> u32 {
        self.pointer_width
    }

    fn layout_of_tag(&self, _name: &str) -> (u64, u64) {
        (u64::from(self.pointer_width) / 8, u64::from(self.pointer_width) / 8)
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn int_size_rounds_up_to_whole_bytes() {
        let layout = FixedLayout { pointer_width: 64 };
        assert_eq!(size_of(&IrType::BOOL, &layout), 1);
        assert_eq!(size_of(&IrType::Int { bits: 32, signed: true }, &layout), 4);
    }

    #[test]
    fn pointer_size_comes_from_the_backend() {
        let layout = FixedLayout { pointer_width: 64 };
        let ty = IrType::Pointer(Box::new(IrType::Int { bits: 32, signed: true }));
        assert_eq!(size_of(&ty, &layout), 8);
    }

    #[test]
    fn array_size_is_element_size_times_length() {
        let layout = FixedLayout { pointer_width: 64 };
        let ty = IrType::Array {
            elem: Box::new(IrType::Int { bits: 32, signed: true }),
            len: Some(5),
        };
        assert_eq!(size_of(&ty, &layout), 20);
    }
}
