//! The sidecar debug dump written when parsing fails (§6 "Persisted state":
//! "a structured dump of tokens plus the partial AST... at an
//! implementation-defined path"). Builds its own small serializable shadow of
//! the token list and partial AST rather than threading a `serde` feature
//! through every upstream crate, matching how a one-off debug view is kept
//! separate from a core data type elsewhere in this workspace.

use serde::Serialize;

use cc_ast::{Node, NodeKind};
use cc_lexer::{Token, TokenValue};

#[derive(Debug, Serialize)]
pub struct DumpToken {
    pub kind: u16,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub value: Option<String>,
}

impl From<&Token> for DumpToken {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind.0,
            lexeme: token.lexeme.clone(),
            line: token.location.line,
            column: token.location.column,
            value: token.value.as_ref().map(dump_token_value),
        }
    }
}

fn dump_token_value(value: &TokenValue) -> String {
    match value {
        TokenValue::Int(v) => v.to_string(),
        TokenValue::Float(v) => v.to_string(),
        TokenValue::Str(v) => v.clone(),
        TokenValue::Char(v) => v.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct DumpNode {
    pub kind: String,
    pub line: u32,
    pub column: u32,
    pub children: Vec<DumpNode>,
}

impl From<&Node> for DumpNode {
    fn from(node: &Node) -> Self {
        Self {
            kind: dump_node_kind(&node.kind),
            line: node.location.line,
            column: node.location.column,
            children: node.children.iter().map(DumpNode::from).collect(),
        }
    }
}

fn dump_node_kind(kind: &NodeKind) -> String {
    format!("{kind:?}")
}

#[derive(Debug, Serialize)]
pub struct SidecarDump {
    pub tokens: Vec<DumpToken>,
    pub ast: DumpNode,
}

impl SidecarDump {
    pub fn new(tokens: &[Token], ast: &Node) -> Self {
        Self { tokens: tokens.iter().map(DumpToken::from).collect(), ast: DumpNode::from(ast) }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod dump_tests {
    use super::*;
    use cc_ast::{int_literal, translation_unit};
    use cc_diagnostics::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::new("t.c", 1, 0, 0)
    }

    #[test]
    fn dump_serializes_an_empty_token_list_and_a_leaf_ast() {
        let ast = translation_unit(loc(), vec![int_literal(loc(), 1)]);
        let dump = SidecarDump::new(&[], &ast);
        let json = dump.to_json().unwrap();
        assert!(json.contains("IntLiteral"));
    }
}
