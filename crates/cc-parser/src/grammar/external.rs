//! Top-level translation-unit loop: function definitions vs. plain
//! declarations, typedef-name registration, and panic-mode resynchronization
//! between external declarations.

use cc_ast::{self as ast, Node};

use crate::core::{Parser, CONSECUTIVE_ERROR_ESCALATION};
use crate::error::Error;

impl Parser<'_> {
    pub fn parse_translation_unit(&mut self) -> Node {
        let location = self.current_location();
        let mut decls = Vec::new();
        while !self.should_stop() {
            let before = self.pos();
            decls.push(self.parse_external_declaration());

            if self.consecutive_errors >= CONSECUTIVE_ERROR_ESCALATION {
                self.synchronize(|t| t.lexeme == ";" || t.lexeme == "}");
                if self.at(";") || self.at("}") {
                    self.bump();
                }
                self.reset_consecutive_errors();
            }
            if self.pos() == before && !self.should_stop() {
                // No progress: force an advance so malformed input can't stall forever.
                self.bump();
            }
        }
        ast::translation_unit(location, decls)
    }

    fn parse_external_declaration(&mut self) -> Node {
        while self.eat("__extension__") {}
        self.skip_attributes();

        let location = self.current_location();
        if !self.at_declaration_specifier() {
            self.error(Error::DeclarationRequired);
            self.synchronize(|t| t.lexeme == ";" || t.lexeme == "{" || t.lexeme == "}");
            if self.at(";") {
                self.bump();
            }
            return ast::empty(location);
        }

        let specifiers = self.parse_declaration_specifiers();
        self.skip_attributes();

        if self.at(";") {
            self.bump();
            return specifiers.type_node;
        }

        let (name, type_subtree) = self.parse_named_declarator(specifiers.type_node.clone());
        self.skip_attributes();

        if specifiers.is_typedef {
            self.oracle.register_typedef(name.clone());
            self.expect(";", "';' after typedef declaration");
            return ast::typedef_decl(location, name, type_subtree);
        }

        let is_function_type = matches!(type_subtree.kind, cc_ast::NodeKind::FunctionType { .. });

        if is_function_type && self.at("{") {
            let (return_type, params, is_variadic) = split_function_type(type_subtree);
            let body = self.parse_compound_stmt();
            return ast::function_def(location, name, is_variadic, return_type, params, Some(body));
        }

        if is_function_type && self.at(";") {
            self.bump();
            let (return_type, params, is_variadic) = split_function_type(type_subtree);
            return ast::function_def(location, name, is_variadic, return_type, params, None);
        }

        self.parse_var_decl_tail(location, name, type_subtree, &specifiers.type_node)
    }

    /// One or more comma-separated variable declarators sharing a specifier
    /// list at file scope. Only the first declarator's node is returned
    /// directly; additional ones are folded into a `Compound` wrapper since
    /// `TranslationUnit` expects one child per source declaration and this
    /// front end has no dedicated "declaration group" node.
    fn parse_var_decl_tail(
        &mut self,
        location: cc_diagnostics::SourceLocation,
        name: String,
        type_subtree: Node,
        shared_base: &Node,
    ) -> Node {
        let initializer = if self.eat("=") { Some(self.parse_assignment_expr()) } else { None };
        let mut group = vec![ast::var_decl(location.clone(), name, type_subtree, initializer)];

        while self.eat(",") {
            let next_location = self.current_location();
            let (next_name, next_type) = self.parse_named_declarator(shared_base.clone());
            let next_init = if self.eat("=") { Some(self.parse_assignment_expr()) } else { None };
            group.push(ast::var_decl(next_location, next_name, next_type, next_init));
        }

        self.expect(";", "';' after declaration");
        if group.len() == 1 {
            group.pop().unwrap()
        } else {
            ast::compound(location, group)
        }
    }
}

fn split_function_type(type_subtree: Node) -> (Node, Node, bool) {
    match type_subtree.kind {
        cc_ast::NodeKind::FunctionType { is_variadic } => {
            let mut children = type_subtree.children.into_iter();
            let return_type = children.next().expect("function type has a return type child");
            let params = children.next().expect("function type has a param list child");
            (return_type, params, is_variadic)
        }
        _ => unreachable!("caller only calls split_function_type on a FunctionType node"),
    }
}
