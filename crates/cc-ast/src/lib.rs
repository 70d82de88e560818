//! AST node model: a sum-type node kind with owned children, plus typed
//! constructors for the shapes a recursive-descent parser builds.

mod builder;
mod kind;
mod node;
mod ops;

pub use builder::{
    abstract_declarator, array_type, assign, binary, break_stmt, call, case_stmt, cast,
    char_literal, compound, conditional, continue_stmt, default_stmt, do_while_stmt, empty,
    expr_stmt, float_literal, for_stmt, function_def, function_type, goto_stmt, identifier,
    if_stmt, inline_asm, int_literal, labeled_stmt, logical, member, param, param_list,
    pointer_type, return_stmt, sizeof_expr, sizeof_type, string_literal, subscript,
    switch_stmt, translation_unit, type_specifier, typedef_decl, unary, var_decl, while_stmt,
};
pub use kind::NodeKind;
pub use node::{destroy, Node};
pub use ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp};
