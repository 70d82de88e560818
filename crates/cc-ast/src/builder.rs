//! Typed constructors for common node shapes, so parser call sites read as
//! `translation_unit(...)`/`binary(...)` rather than raw `Node::new` plus
//! manual child-list assembly.

use cc_diagnostics::SourceLocation;

use crate::kind::NodeKind;
use crate::node::Node;
use crate::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp};

pub fn translation_unit(location: SourceLocation, decls: Vec<Node>) -> Node {
    Node::with_children(NodeKind::TranslationUnit, location, decls)
}

pub fn function_def(
    location: SourceLocation,
    name: String,
    is_variadic: bool,
    return_type: Node,
    params: Node,
    body: Option<Node>,
) -> Node {
    let mut children = vec![return_type, params];
    if let Some(body) = body {
        children.push(body);
    }
    Node::with_children(NodeKind::FunctionDef { name, is_variadic }, location, children)
}

pub fn param_list(location: SourceLocation, params: Vec<Node>) -> Node {
    Node::with_children(NodeKind::ParamList, location, params)
}

pub fn param(location: SourceLocation, name: Option<String>, type_subtree: Node) -> Node {
    Node::with_children(NodeKind::Param { name }, location, vec![type_subtree])
}

pub fn var_decl(location: SourceLocation, name: String, type_subtree: Node, initializer: Option<Node>) -> Node {
    let mut children = vec![type_subtree];
    if let Some(init) = initializer {
        children.push(init);
    }
    Node::with_children(NodeKind::VarDecl { name }, location, children)
}

pub fn typedef_decl(location: SourceLocation, name: String, type_subtree: Node) -> Node {
    Node::with_children(NodeKind::TypedefDecl { name }, location, vec![type_subtree])
}

pub fn type_specifier(location: SourceLocation, name: String) -> Node {
    Node::new(NodeKind::TypeSpecifier { name }, location)
}

pub fn pointer_type(location: SourceLocation, pointee: Node) -> Node {
    Node::with_children(NodeKind::PointerType, location, vec![pointee])
}

pub fn array_type(location: SourceLocation, element: Node, size: Option<Node>) -> Node {
    let mut children = vec![element];
    if let Some(size) = size {
        children.push(size);
    }
    Node::with_children(NodeKind::ArrayType, location, children)
}

pub fn function_type(location: SourceLocation, return_type: Node, params: Node, is_variadic: bool) -> Node {
    Node::with_children(NodeKind::FunctionType { is_variadic }, location, vec![return_type, params])
}

pub fn abstract_declarator(location: SourceLocation, type_subtree: Node) -> Node {
    Node::with_children(NodeKind::AbstractDeclarator, location, vec![type_subtree])
}

pub fn compound(location: SourceLocation, items: Vec<Node>) -> Node {
    Node::with_children(NodeKind::Compound, location, items)
}

pub fn if_stmt(location: SourceLocation, cond: Node, then_branch: Node, else_branch: Option<Node>) -> Node {
    let mut children = vec![cond, then_branch];
    if let Some(else_branch) = else_branch {
        children.push(else_branch);
    }
    Node::with_children(NodeKind::If, location, children)
}

pub fn switch_stmt(location: SourceLocation, scrutinee: Node, body: Node) -> Node {
    Node::with_children(NodeKind::Switch, location, vec![scrutinee, body])
}

pub fn while_stmt(location: SourceLocation, cond: Node, body: Node) -> Node {
    Node::with_children(NodeKind::While, location, vec![cond, body])
}

pub fn do_while_stmt(location: SourceLocation, body: Node, cond: Node) -> Node {
    Node::with_children(NodeKind::DoWhile, location, vec![body, cond])
}

pub fn for_stmt(location: SourceLocation, init: Node, cond: Node, inc: Node, body: Node) -> Node {
    Node::with_children(NodeKind::For, location, vec![init, cond, inc, body])
}

pub fn empty(location: SourceLocation) -> Node {
    Node::new(NodeKind::Empty, location)
}

pub fn return_stmt(location: SourceLocation, value: Option<Node>) -> Node {
    let children = value.into_iter().collect();
    Node::with_children(NodeKind::Return, location, children)
}

pub fn break_stmt(location: SourceLocation) -> Node {
    Node::new(NodeKind::Break, location)
}

pub fn continue_stmt(location: SourceLocation) -> Node {
    Node::new(NodeKind::Continue, location)
}

pub fn goto_stmt(location: SourceLocation, label: String) -> Node {
    Node::new(NodeKind::Goto { label }, location)
}

pub fn labeled_stmt(location: SourceLocation, label: String, statement: Node) -> Node {
    Node::with_children(NodeKind::Labeled { label }, location, vec![statement])
}

pub fn case_stmt(location: SourceLocation, value: Node, statement: Node) -> Node {
    Node::with_children(NodeKind::Case, location, vec![value, statement])
}

pub fn default_stmt(location: SourceLocation, statement: Node) -> Node {
    Node::with_children(NodeKind::Default, location, vec![statement])
}

pub fn expr_stmt(location: SourceLocation, expr: Node) -> Node {
    Node::with_children(NodeKind::ExprStmt, location, vec![expr])
}

pub fn binary(location: SourceLocation, op: BinaryOp, lhs: Node, rhs: Node) -> Node {
    Node::with_children(NodeKind::Binary { op }, location, vec![lhs, rhs])
}

pub fn logical(location: SourceLocation, op: LogicalOp, lhs: Node, rhs: Node) -> Node {
    Node::with_children(NodeKind::Logical { op }, location, vec![lhs, rhs])
}

pub fn unary(location: SourceLocation, op: UnaryOp, operand: Node) -> Node {
    Node::with_children(NodeKind::Unary { op }, location, vec![operand])
}

pub fn assign(location: SourceLocation, op: AssignOp, lhs: Node, rhs: Node) -> Node {
    Node::with_children(NodeKind::Assign { op }, location, vec![lhs, rhs])
}

pub fn conditional(location: SourceLocation, cond: Node, then_expr: Node, else_expr: Node) -> Node {
    Node::with_children(NodeKind::Conditional, location, vec![cond, then_expr, else_expr])
}

pub fn call(location: SourceLocation, callee: Node, args: Vec<Node>) -> Node {
    let mut children = vec![callee];
    children.extend(args);
    Node::with_children(NodeKind::Call, location, children)
}

pub fn member(location: SourceLocation, base: Node, name: String, arrow: bool) -> Node {
    Node::with_children(NodeKind::Member { name, arrow }, location, vec![base])
}

pub fn subscript(location: SourceLocation, base: Node, index: Node) -> Node {
    Node::with_children(NodeKind::Subscript, location, vec![base, index])
}

pub fn cast(location: SourceLocation, type_name: Node, operand: Node) -> Node {
    Node::with_children(NodeKind::Cast, location, vec![type_name, operand])
}

pub fn sizeof_expr(location: SourceLocation, operand: Node) -> Node {
    Node::with_children(NodeKind::SizeofExpr, location, vec![operand])
}

pub fn sizeof_type(location: SourceLocation, type_name: Node) -> Node {
    Node::with_children(NodeKind::SizeofType, location, vec![type_name])
}

pub fn int_literal(location: SourceLocation, value: i64) -> Node {
    Node::new(NodeKind::IntLiteral { value }, location)
}

pub fn float_literal(location: SourceLocation, value: f64) -> Node {
    Node::new(NodeKind::FloatLiteral { value }, location)
}

pub fn string_literal(location: SourceLocation, value: String) -> Node {
    Node::new(NodeKind::StringLiteral { value }, location)
}

pub fn char_literal(location: SourceLocation, value: char) -> Node {
    Node::new(NodeKind::CharLiteral { value }, location)
}

pub fn identifier(location: SourceLocation, name: String) -> Node {
    Node::new(NodeKind::Identifier { name }, location)
}

pub fn inline_asm(location: SourceLocation, text: String, is_volatile: bool) -> Node {
    Node::new(NodeKind::InlineAsm { text, is_volatile }, location)
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    #[test]
    fn binary_expr_has_two_children() {
        let node = binary(loc(), BinaryOp::Add, int_literal(loc(), 1), int_literal(loc(), 2));
        assert_eq!(node.children.len(), 2);
    }

    #[test]
    fn function_def_without_body_is_a_prototype() {
        let node = function_def(
            loc(),
            "f".to_string(),
            false,
            type_specifier(loc(), "int".to_string()),
            param_list(loc(), vec![]),
            None,
        );
        assert_eq!(node.children.len(), 2);
    }

    #[test]
    fn function_def_with_body_has_three_children() {
        let node = function_def(
            loc(),
            "f".to_string(),
            false,
            type_specifier(loc(), "int".to_string()),
            param_list(loc(), vec![]),
            Some(compound(loc(), vec![])),
        );
        assert_eq!(node.children.len(), 3);
    }
}
