//! Semantic errors surfaced during lowering (spec §7's third error
//! category). Unlike the parser's panic-mode recovery, a lowering error
//! simply makes its subtree produce no IR; lowering of sibling constructs
//! continues and the terminator-completion sweep keeps the result well-formed.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("use of undefined identifier '{0}'")]
    UndefinedIdentifier(String),
    #[error("'break' statement outside of loop or switch")]
    BreakOutsideLoop,
    #[error("'continue' statement outside of loop")]
    ContinueOutsideLoop,
    #[error("invalid lvalue in assignment")]
    InvalidLvalue,
    #[error("invalid operand to unary '{0}'")]
    InvalidUnaryOperand(char),
    #[error("call of non-function value")]
    CallOfNonFunction,
    #[error("variable '{0}' is not visible here")]
    VariableNotVisible(String),
    #[error("use of undeclared label '{0}'")]
    UndefinedLabel(String),
}
