//! Maps a `cc-ast` type subtree (`TypeSpecifier`/`PointerType`/`ArrayType`/
//! `FunctionType`) to an [`IrType`]. Primitive widths are fixed constants of
//! this front end, independent of any backend; pointer width and the layout
//! of opaque tags (`struct`/`union`/unresolved typedef names) are left for
//! [`crate::layout::TypeLayout`] to answer at `sizeof`-evaluation time, so
//! this mapping alone never needs a backend reference.

use cc_ast::{Node, NodeKind};

use crate::layout::IrType;

pub fn lower_type(node: &Node) -> IrType {
    match &node.kind {
        NodeKind::TypeSpecifier { name } => lower_type_specifier(name),
        NodeKind::PointerType => IrType::Pointer(Box::new(lower_type(&node.children[0]))),
        NodeKind::ArrayType => {
            let elem = Box::new(lower_type(&node.children[0]));
            let len = node.children.get(1).and_then(const_eval_u64);
            IrType::Array { elem, len }
        }
        NodeKind::FunctionType { is_variadic } => {
            let ret = Box::new(lower_type(&node.children[0]));
            let params = node.children[1]
                .children
                .iter()
                .map(|param| lower_type(&param.children[0]))
                .collect();
            IrType::Function { ret, params, is_variadic: *is_variadic }
        }
        NodeKind::AbstractDeclarator => lower_type(&node.children[0]),
        other => unreachable!("{other:?} is not a type subtree"),
    }
}

fn lower_type_specifier(name: &str) -> IrType {
    if let Some(tag) = name.strip_prefix("struct ").or_else(|| name.strip_prefix("union ")) {
        return IrType::Opaque { name: tag.to_string() };
    }
    if let Some(tag) = name.strip_prefix("enum ") {
        let _ = tag;
        return IrType::Int { bits: 32, signed: true };
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    let signed = !words.contains(&"unsigned");

    if words.contains(&"void") {
        return IrType::Void;
    }
    if words.contains(&"double") {
        return IrType::Float { bits: 64 };
    }
    if words.contains(&"float") {
        return IrType::Float { bits: 32 };
    }
    if words.contains(&"_Bool") {
        return IrType::Int { bits: 1, signed: false };
    }
    if words.contains(&"char") {
        return IrType::Int { bits: 8, signed };
    }
    if words.contains(&"short") {
        return IrType::Int { bits: 16, signed };
    }
    if words.iter().filter(|w| **w == "long").count() >= 1 {
        return IrType::Int { bits: 64, signed };
    }
    if words.contains(&"int") || words.contains(&"signed") || words.contains(&"unsigned") {
        return IrType::Int { bits: 32, signed };
    }

    // Not a built-in keyword combination: either a typedef name (this front
    // end never resolved it to an underlying structural type) or an
    // unrecognized tag. Treated as an opaque backend-sized type.
    IrType::Opaque { name: name.to_string() }
}

/// Folds a constant-integer array-size expression, the only form this
/// front end needs (no general constant folding).
fn const_eval_u64(node: &Node) -> Option<u64> {
    match &node.kind {
        NodeKind::IntLiteral { value } => u64::try_from(*value).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod type_lowering_tests {
    use super::*;
    use cc_ast::{array_type, int_literal, pointer_type, type_specifier};
    use cc_diagnostics::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    #[test]
    fn unsigned_long_is_a_64_bit_unsigned_integer() {
        let ty = lower_type(&type_specifier(loc(), "unsigned long".to_string()));
        assert_eq!(ty, IrType::Int { bits: 64, signed: false });
    }

    #[test]
    fn plain_char_is_signed_by_default() {
        let ty = lower_type(&type_specifier(loc(), "char".to_string()));
        assert_eq!(ty, IrType::Int { bits: 8, signed: true });
    }

    #[test]
    fn pointer_wraps_its_pointee() {
        let inner = type_specifier(loc(), "int".to_string());
        let ty = lower_type(&pointer_type(loc(), inner));
        assert_eq!(ty, IrType::Pointer(Box::new(IrType::Int { bits: 32, signed: true })));
    }

    #[test]
    fn array_with_a_literal_size_records_its_length() {
        let elem = type_specifier(loc(), "int".to_string());
        let size = int_literal(loc(), 5);
        let ty = lower_type(&array_type(loc(), elem, Some(size)));
        assert_eq!(
            ty,
            IrType::Array { elem: Box::new(IrType::Int { bits: 32, signed: true }), len: Some(5) }
        );
    }

    #[test]
    fn struct_tag_is_opaque() {
        let ty = lower_type(&type_specifier(loc(), "struct point".to_string()));
        assert_eq!(ty, IrType::Opaque { name: "point".to_string() });
    }
}
