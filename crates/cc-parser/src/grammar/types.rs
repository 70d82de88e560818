//! Declaration specifiers and type names: the declaration-specifier
//! predicate that drives every statement-vs-declaration and cast-vs-paren
//! decision, plus the specifier grammar itself.

use cc_ast::{self as ast, Node};

use crate::core::Parser;
use crate::error::Error;

const STORAGE_CLASS_KEYWORDS: &[&str] =
    &["typedef", "extern", "static", "auto", "register", "_Thread_local"];
const TYPE_QUALIFIER_KEYWORDS: &[&str] =
    &["const", "volatile", "restrict", "__const__", "__volatile__"];
const BASE_TYPE_KEYWORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex", "_Imaginary",
];
const FUNCTION_SPECIFIER_KEYWORDS: &[&str] = &["inline", "__inline__", "_Noreturn"];

/// The parsed specifier list for one declaration: whether `typedef` was
/// present, and the folded type-specifier node. Storage-class keywords
/// other than `typedef` and all type qualifiers are consumed but not
/// retained in the AST (this front end does not model linkage or
/// const-correctness).
pub struct DeclSpecifiers {
    pub is_typedef: bool,
    pub type_node: Node,
}

impl Parser<'_> {
    /// True iff the current token can start a declaration-specifier list:
    /// the predicate consulted by the statement-vs-declaration and
    /// for-loop-header disambiguators, and by cast disambiguation.
    pub fn at_declaration_specifier(&self) -> bool {
        if self.at_identifier() {
            return self.oracle.is_type_name(self.current_lexeme());
        }
        let lexeme = self.current_lexeme();
        STORAGE_CLASS_KEYWORDS.contains(&lexeme)
            || TYPE_QUALIFIER_KEYWORDS.contains(&lexeme)
            || BASE_TYPE_KEYWORDS.contains(&lexeme)
            || FUNCTION_SPECIFIER_KEYWORDS.contains(&lexeme)
            || self.at("struct")
            || self.at("union")
            || self.at("enum")
            || (self.at("_Atomic") && self.standard.allows_atomic_type_specifier())
    }

    pub fn parse_declaration_specifiers(&mut self) -> DeclSpecifiers {
        let location = self.current_location();
        let mut is_typedef = false;
        let mut base_words: Vec<String> = Vec::new();
        let mut tag_node: Option<Node> = None;

        while self.at_declaration_specifier() {
            if self.at("typedef") {
                is_typedef = true;
                self.bump();
                continue;
            }
            if STORAGE_CLASS_KEYWORDS.contains(&self.current_lexeme())
                || TYPE_QUALIFIER_KEYWORDS.contains(&self.current_lexeme())
                || FUNCTION_SPECIFIER_KEYWORDS.contains(&self.current_lexeme())
            {
                self.bump();
                continue;
            }
            if self.at("struct") {
                tag_node = Some(self.parse_tag_specifier("struct"));
                continue;
            }
            if self.at("union") {
                tag_node = Some(self.parse_tag_specifier("union"));
                continue;
            }
            if self.at("enum") {
                tag_node = Some(self.parse_tag_specifier("enum"));
                continue;
            }
            if self.at("_Atomic") {
                base_words.push(self.bump().lexeme);
                continue;
            }
            if self.at_identifier() && self.oracle.is_type_name(self.current_lexeme()) {
                base_words.push(self.bump().lexeme);
                continue;
            }
            base_words.push(self.bump().lexeme);
        }

        let type_node = tag_node.unwrap_or_else(|| {
            let name = if base_words.is_empty() {
                "int".to_string()
            } else {
                base_words.join(" ")
            };
            ast::type_specifier(location, name)
        });

        DeclSpecifiers { is_typedef, type_node }
    }

    /// `struct`/`union`/`enum` [tag] [`{` ... `}`]. The body, if present, is
    /// consumed for well-formedness and discarded.
    fn parse_tag_specifier(&mut self, keyword: &str) -> Node {
        let location = self.current_location();
        self.bump();
        let mut name = keyword.to_string();
        if self.at_identifier() {
            let tag = self.current_lexeme().to_string();
            name.push(' ');
            name.push_str(&tag);
            match keyword {
                "struct" => self.oracle.register_struct_tag(tag),
                "union" => self.oracle.register_union_tag(tag),
                "enum" => self.oracle.register_enum_tag(tag),
                _ => unreachable!(),
            }
            self.bump();
        }
        if self.at("{") {
            self.skip_balanced("{", "}");
        }
        ast::type_specifier(location, name)
    }

    /// A type name for casts and `sizeof`: declaration specifiers followed by
    /// an optional abstract declarator. Returns [`Error::MalformedCastTypeName`]
    /// when the current token cannot start one, so the cast-disambiguation
    /// speculative attempt can fall back cleanly.
    pub fn try_parse_type_name(&mut self) -> Result<Node, Error> {
        if !self.at_declaration_specifier() {
            return Err(Error::MalformedCastTypeName);
        }
        let specifiers = self.parse_declaration_specifiers();
        let declarator = self.parse_abstract_declarator(specifiers.type_node);
        Ok(declarator)
    }
}
