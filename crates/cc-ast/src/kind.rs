//! One variant per syntactic category, replacing the source's single tagged
//! union with ad-hoc payload sharing. Shared fields (location, children) live
//! on [`crate::node::Node`]; this enum carries only the data specific to each
//! kind.

use crate::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Children: one per top-level declaration/definition.
    TranslationUnit,

    /// Children: `[return_type, ParamList, Compound?]` (body omitted for a prototype).
    FunctionDef { name: String, is_variadic: bool },

    /// Children: one `Param` per parameter.
    ParamList,

    /// A single parameter. Children: `[type_subtree]`. `name` is `None` for
    /// an abstract parameter declarator (e.g. in a prototype without names).
    Param { name: Option<String> },

    /// Children: `[type_subtree]`, optionally followed by `[initializer]`.
    VarDecl { name: String },

    /// Introduces `name` as a type alias for the declarator it wraps.
    /// Children: `[type_subtree]`.
    TypedefDecl { name: String },

    /// A base type specifier leaf: a built-in keyword combination (`unsigned
    /// long`), a typedef name, or a tag-qualified name (`struct point`,
    /// `enum color`). A struct/union/enum body, if present, is parsed for
    /// well-formedness and discarded — this front end does not model member
    /// layout. No children.
    TypeSpecifier { name: String },

    /// Children: `[pointee_type]`.
    PointerType,

    /// Children: `[element_type]`, optionally followed by `[size_expr]`.
    ArrayType,

    /// Children: `[return_type, ParamList]`.
    FunctionType { is_variadic: bool },

    /// A declarator with no identifier leaf (abstract declarator), used in
    /// casts and parameter types with no name. Children: `[type_subtree]`.
    AbstractDeclarator,

    /// Children: declarations then statements, in source order.
    Compound,

    /// Children: `[cond, then]` or `[cond, then, else]`.
    If,
    /// Children: `[scrutinee, body]`. Lowered as a sequential compare chain
    /// against each `Case` value nested in `body`, with a shared break target.
    Switch,
    /// Children: `[cond, body]`.
    While,
    /// Children: `[body, cond]`.
    DoWhile,
    /// Children: `[init?, cond?, inc?, body]`, each a placeholder `Empty` node when absent.
    For,
    /// Children: `[value]`, empty when returning void.
    Return,
    Break,
    Continue,
    Goto { label: String },
    /// Children: `[statement]`.
    Labeled { label: String },
    /// Children: `[value, statement]`.
    Case,
    /// Children: `[statement]`.
    Default,
    /// An empty statement placeholder (e.g. a missing `for` clause), or `;` alone.
    Empty,

    /// Children: `[expr]`.
    ExprStmt,

    /// Children: `[lhs, rhs]`.
    Binary { op: BinaryOp },
    /// Children: `[lhs, rhs]`. Kept distinct from [`NodeKind::Binary`] so the
    /// lowerer knows to realize short-circuit control flow rather than
    /// eager arithmetic.
    Logical { op: LogicalOp },
    /// Children: `[operand]`.
    Unary { op: UnaryOp },
    /// Children: `[lhs, rhs]`.
    Assign { op: AssignOp },
    /// Children: `[cond, then, else]`.
    Conditional,
    /// Children: `[callee, arg0, arg1, ...]`.
    Call,
    /// Children: `[base]`. `arrow` distinguishes `a->b` from `a.b`.
    Member { name: String, arrow: bool },
    /// Children: `[base, index]`.
    Subscript,
    /// Children: `[type_name, operand]`.
    Cast,
    /// Children: `[operand]`.
    SizeofExpr,
    /// Children: `[type_name]`.
    SizeofType,

    IntLiteral { value: i64 },
    FloatLiteral { value: f64 },
    StringLiteral { value: String },
    CharLiteral { value: char },
    Identifier { name: String },

    /// Children: none. Operand/clobber lists are parsed for well-formedness
    /// and discarded (GNU extension, tolerated but not lowered further).
    InlineAsm { text: String, is_volatile: bool },
}
