//! Declarator parsing: pointers, direct declarators (identifier or
//! parenthesized nested declarator), and postfix array/function suffixes.
//!
//! The tricky part is association: `*a[5]` is an array of pointers, but
//! `(*a)[5]` is a pointer to an array. Both shapes have a `*` and a `[5]`;
//! what differs is which side of a parenthesized group they fall on. This
//! is resolved the way K&R's `dcl`/`dirdcl` resolve it: accumulate the
//! type operators in the order the *parser* encounters them (postfixes of
//! a direct declarator before the pointer-prefix that wraps it, with a
//! parenthesized sub-declarator's own operators recorded before the
//! enclosing declarator's trailing postfixes), then apply them to the base
//! type by walking the accumulated list back to front. Walking it in
//! reverse is what turns "encountered first" into "wraps outermost".

use cc_ast::{self as ast, Node};

use crate::core::Parser;
use crate::error::Error;

const TYPE_QUALIFIER_KEYWORDS: &[&str] =
    &["const", "volatile", "restrict", "__const__", "__volatile__"];

enum Op {
    Pointer,
    Array(Option<Node>),
    Function(Node, bool),
}

impl Parser<'_> {
    /// A declarator that may omit its name (cast operand, `sizeof` operand,
    /// unnamed prototype parameter).
    pub fn parse_abstract_declarator(&mut self, base_type: Node) -> Node {
        let location = base_type.location.clone();
        let mut ops = Vec::new();
        self.parse_declarator_ops(&mut ops, false);
        let type_subtree = apply_ops(base_type, ops);
        ast::abstract_declarator(location, type_subtree)
    }

    /// A declarator that must carry a name: variable, function, or typedef target.
    pub fn parse_named_declarator(&mut self, base_type: Node) -> (String, Node) {
        let mut ops = Vec::new();
        let name = self.parse_declarator_ops(&mut ops, true);
        let type_subtree = apply_ops(base_type, ops);
        (name.unwrap_or_default(), type_subtree)
    }

    /// A parameter declarator: named or abstract, either is legal.
    pub fn parse_parameter_declarator(&mut self, base_type: Node) -> (Option<String>, Node) {
        let mut ops = Vec::new();
        let name = self.parse_declarator_ops(&mut ops, false);
        let type_subtree = apply_ops(base_type, ops);
        (name, type_subtree)
    }

    /// `pointer* direct-declarator`. Pointer operators are pushed after the
    /// direct declarator returns, so they land outside whatever the direct
    /// declarator already pushed.
    fn parse_declarator_ops(&mut self, ops: &mut Vec<Op>, name_required: bool) -> Option<String> {
        let mut pointer_count = 0u32;
        while self.at("*") {
            self.bump();
            while TYPE_QUALIFIER_KEYWORDS.contains(&self.current_lexeme()) {
                self.bump();
            }
            pointer_count += 1;
        }
        let name = self.parse_direct_declarator_ops(ops, name_required);
        for _ in 0..pointer_count {
            ops.push(Op::Pointer);
        }
        name
    }

    /// `(identifier | '(' declarator ')') postfix*`. A leading `(` is a
    /// grouping paren (not a parameter list) exactly when the token after it
    /// is `*` or `(` — no parameter's declarator can begin with either, since
    /// a parameter always opens with its own type specifier.
    fn parse_direct_declarator_ops(&mut self, ops: &mut Vec<Op>, name_required: bool) -> Option<String> {
        let name = if self.at("(") && (self.nth_is(1, "*") || self.nth_is(1, "(")) {
            self.bump();
            let inner_name = self.parse_declarator_ops(ops, name_required);
            self.expect(")", "closing ')' in declarator");
            inner_name
        } else if self.at_identifier() {
            Some(self.bump().lexeme)
        } else {
            if name_required {
                self.error(Error::AbstractDeclaratorMissingName);
            }
            None
        };

        loop {
            if self.at("[") {
                self.bump();
                let size = if self.at("]") { None } else { Some(self.parse_assignment_expr()) };
                self.expect("]", "closing ']' in array declarator");
                ops.push(Op::Array(size));
            } else if self.at("(") {
                self.bump();
                let params = self.parse_param_list();
                self.expect(")", "closing ')' in function declarator");
                ops.push(params);
            } else {
                break;
            }
        }
        name
    }

    /// `( param-decl (',' param-decl)* (',' '...')? )`, `(void)`, or `()`.
    /// The parameter list itself (not the declarator) owns its own `(`/`)`;
    /// this is called with the current token already past the opening paren.
    fn parse_param_list(&mut self) -> Op {
        let location = self.current_location();
        let mut params = Vec::new();
        let mut is_variadic = false;

        if self.at(")") {
            return Op::Function(ast::param_list(location, params), false);
        }
        if self.at("void") && self.nth_is(1, ")") {
            self.bump();
            return Op::Function(ast::param_list(location, params), false);
        }

        loop {
            if self.at("...") {
                self.bump();
                is_variadic = true;
                break;
            }
            let param_location = self.current_location();
            if !self.at_declaration_specifier() {
                self.error(Error::DeclarationRequired);
                break;
            }
            let specifiers = self.parse_declaration_specifiers();
            let (name, type_subtree) = self.parse_parameter_declarator(specifiers.type_node);
            params.push(ast::param(param_location, name, type_subtree));
            if !self.eat(",") {
                break;
            }
        }
        Op::Function(ast::param_list(location, params), is_variadic)
    }
}

fn apply_ops(base: Node, ops: Vec<Op>) -> Node {
    let location = base.location.clone();
    let mut ty = base;
    for op in ops.into_iter().rev() {
        ty = match op {
            Op::Pointer => ast::pointer_type(location.clone(), ty),
            Op::Array(size) => ast::array_type(location.clone(), ty, size),
            Op::Function(param_list, is_variadic) => {
                ast::function_type(location.clone(), ty, param_list, is_variadic)
            }
        };
    }
    ty
}

#[cfg(test)]
mod declarator_tests {
    use super::*;
    use crate::standard::Standard;
    use cc_lexer::tokenize;
    use cc_syntax::SyntaxDescriptor;

    fn parse_type_name(source: &str) -> Node {
        let descriptor = SyntaxDescriptor::c();
        let tokens = tokenize(source, "t.c", &descriptor).tokens;
        let mut parser = Parser::new(tokens.as_slice(), Standard::C11);
        parser.try_parse_type_name().expect("type name should parse")
    }

    #[test]
    fn array_of_pointer_nests_pointer_inside_array() {
        let type_name = parse_type_name("int *[5]");
        // AbstractDeclarator -> ArrayType -> [PointerType -> [TypeSpecifier], size]
        let array = &type_name.children[0];
        assert_eq!(array.kind, cc_ast::NodeKind::ArrayType);
        assert_eq!(array.children[0].kind, cc_ast::NodeKind::PointerType);
    }

    #[test]
    fn pointer_to_array_nests_array_inside_pointer() {
        let type_name = parse_type_name("int (*)[5]");
        let pointer = &type_name.children[0];
        assert_eq!(pointer.kind, cc_ast::NodeKind::PointerType);
        assert_eq!(pointer.children[0].kind, cc_ast::NodeKind::ArrayType);
    }

    #[test]
    fn pointer_to_function_returning_int() {
        let type_name = parse_type_name("int (*)(int)");
        let pointer = &type_name.children[0];
        assert_eq!(pointer.kind, cc_ast::NodeKind::PointerType);
        assert_eq!(pointer.children[0].kind, cc_ast::NodeKind::FunctionType { is_variadic: false });
    }

    #[test]
    fn function_returning_pointer() {
        let type_name = parse_type_name("int *(int)");
        let func = &type_name.children[0];
        assert_eq!(func.kind, cc_ast::NodeKind::FunctionType { is_variadic: false });
        assert_eq!(func.children[0].kind, cc_ast::NodeKind::PointerType);
    }
}
