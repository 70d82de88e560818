//! Statement grammar: dispatch by leading keyword/token, compound-statement
//! scoping, and the declaration-vs-statement disambiguation inside a block.

use cc_ast::{self as ast, Node};
use cc_diagnostics::SourceLocation;
use cc_lexer::TokenValue as Tv;
use cc_syntax::TokenKind;

use crate::core::Parser;
use crate::error::Error;

impl Parser<'_> {
    pub fn parse_stmt(&mut self) -> Node {
        if !self.enter_recursion() {
            return ast::empty(self.current_location());
        }
        let stmt = self.parse_stmt_inner();
        self.exit_recursion();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> Node {
        self.skip_attributes();

        if self.at("{") {
            return self.parse_compound_stmt();
        }
        if self.at("if") {
            return self.parse_if_stmt();
        }
        if self.at("switch") {
            return self.parse_switch_stmt();
        }
        if self.at("while") {
            return self.parse_while_stmt();
        }
        if self.at("do") {
            return self.parse_do_while_stmt();
        }
        if self.at("for") {
            return self.parse_for_stmt();
        }
        if self.at("goto") {
            return self.parse_goto_stmt();
        }
        if self.at("continue") {
            let location = self.current_location();
            self.bump();
            self.expect(";", "';' after 'continue'");
            return ast::continue_stmt(location);
        }
        if self.at("break") {
            let location = self.current_location();
            self.bump();
            self.expect(";", "';' after 'break'");
            return ast::break_stmt(location);
        }
        if self.at("return") {
            return self.parse_return_stmt();
        }
        if self.at("case") {
            return self.parse_case_stmt();
        }
        if self.at("default") {
            return self.parse_default_stmt();
        }
        if self.at("asm") || self.at("__asm__") {
            let location = self.current_location();
            self.bump();
            let node = self.parse_inline_asm(location);
            self.expect(";", "';' after asm statement");
            return node;
        }
        if self.at(";") {
            let location = self.current_location();
            self.bump();
            return ast::empty(location);
        }
        if self.at_identifier() && self.nth_is(1, ":") {
            let location = self.current_location();
            let label = self.bump().lexeme;
            self.bump();
            let inner = self.parse_stmt();
            return ast::labeled_stmt(location, label, inner);
        }

        self.parse_expr_stmt()
    }

    /// `{` declaration-or-statement* `}`. A block item is a declaration when
    /// the current token can start declaration specifiers; otherwise it's a statement.
    pub fn parse_compound_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.expect("{", "'{' to start a block");
        let mut items = Vec::new();
        while !self.at("}") && !self.should_stop() {
            let before = items.len();
            if self.at_declaration_specifier() {
                self.parse_block_declaration(&mut items);
            } else {
                items.push(self.parse_stmt());
            }
            if items.len() == before {
                // No progress: force advance so malformed input can't loop forever.
                if !self.should_stop() && !self.at("}") {
                    self.bump();
                }
            }
        }
        self.expect("}", "'}' to close a block");
        ast::compound(location, items)
    }

    fn parse_if_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        self.expect("(", "'(' after 'if'");
        let cond = self.parse_expr();
        self.expect(")", "')' after if condition");
        let then_branch = self.parse_stmt();
        let else_branch = if self.eat("else") { Some(self.parse_stmt()) } else { None };
        ast::if_stmt(location, cond, then_branch, else_branch)
    }

    fn parse_switch_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        self.expect("(", "'(' after 'switch'");
        let scrutinee = self.parse_expr();
        self.expect(")", "')' after switch scrutinee");
        let body = self.parse_stmt();
        ast::switch_stmt(location, scrutinee, body)
    }

    fn parse_while_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        self.expect("(", "'(' after 'while'");
        let cond = self.parse_expr();
        self.expect(")", "')' after while condition");
        let body = self.parse_stmt();
        ast::while_stmt(location, cond, body)
    }

    fn parse_do_while_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        let body = self.parse_stmt();
        self.expect("while", "'while' after 'do' body");
        self.expect("(", "'(' after 'while'");
        let cond = self.parse_expr();
        self.expect(")", "')' after do/while condition");
        self.expect(";", "';' after do/while statement");
        ast::do_while_stmt(location, body, cond)
    }

    fn parse_for_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        self.expect("(", "'(' after 'for'");

        let init = if self.at(";") {
            self.bump();
            ast::empty(self.current_location())
        } else if self.at_declaration_specifier() {
            // parse_block_declaration consumes the trailing ';' itself.
            let mut decls = Vec::new();
            self.parse_block_declaration(&mut decls);
            if decls.len() == 1 {
                decls.pop().unwrap()
            } else {
                ast::compound(location.clone(), decls)
            }
        } else {
            let expr = self.parse_expr();
            self.expect(";", "';' after for-loop initializer");
            ast::expr_stmt(location.clone(), expr)
        };

        let cond = if self.at(";") {
            ast::empty(self.current_location())
        } else {
            self.parse_expr()
        };
        self.expect(";", "';' after for-loop condition");

        let inc = if self.at(")") {
            ast::empty(self.current_location())
        } else {
            self.parse_expr()
        };
        self.expect(")", "')' after for-loop clauses");

        let body = self.parse_stmt();
        ast::for_stmt(location, init, cond, inc, body)
    }

    fn parse_goto_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        let label = if self.at_identifier() {
            self.bump().lexeme
        } else {
            self.error(Error::UnexpectedToken);
            String::new()
        };
        self.expect(";", "';' after goto target");
        ast::goto_stmt(location, label)
    }

    fn parse_return_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        let value = if self.at(";") { None } else { Some(self.parse_expr()) };
        self.expect(";", "';' after return statement");
        ast::return_stmt(location, value)
    }

    fn parse_case_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        let value = self.parse_conditional_expr();
        self.expect(":", "':' after case value");
        let stmt = self.parse_stmt();
        ast::case_stmt(location, value, stmt)
    }

    fn parse_default_stmt(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        self.expect(":", "':' after 'default'");
        let stmt = self.parse_stmt();
        ast::default_stmt(location, stmt)
    }

    fn parse_expr_stmt(&mut self) -> Node {
        let location = self.current_location();
        let expr = self.parse_expr();
        self.expect(";", "';' after expression statement");
        ast::expr_stmt(location, expr)
    }

    /// A `typedef`/variable declaration inside a block: one or more
    /// comma-separated declarators sharing a specifier list, each lowered to
    /// its own `VarDecl`/`TypedefDecl` and appended to `items`.
    fn parse_block_declaration(&mut self, items: &mut Vec<Node>) {
        let specifiers = self.parse_declaration_specifiers();
        if self.at(";") {
            self.bump();
            return;
        }
        loop {
            let location = self.current_location();
            if specifiers.is_typedef {
                let (name, type_subtree) = self.parse_named_declarator(specifiers.type_node.clone());
                self.oracle.register_typedef(name.clone());
                items.push(ast::typedef_decl(location, name, type_subtree));
            } else {
                let (name, type_subtree) = self.parse_named_declarator(specifiers.type_node.clone());
                self.skip_attributes();
                let initializer = if self.eat("=") { Some(self.parse_assignment_expr()) } else { None };
                items.push(ast::var_decl(location, name, type_subtree, initializer));
            }
            if !self.eat(",") {
                break;
            }
        }
        self.expect(";", "';' after declaration");
    }

    /// `__attribute__((...))` runs tolerated between a declarator and its
    /// trailing `;`/`=`/body.
    pub fn skip_attributes(&mut self) {
        while self.at("__attribute__") {
            self.bump();
            if self.at("(") {
                self.skip_balanced("(", ")");
            } else {
                self.error(Error::MissingAttributeCloseParen);
            }
        }
    }

    /// `[volatile] ( "text" : ... : ... : ... )`, a GNU inline-asm block.
    /// Operand/clobber lists are parsed for well-formedness and discarded;
    /// only the assembly text and the `volatile` flag survive into the AST.
    pub fn parse_inline_asm(&mut self, location: SourceLocation) -> Node {
        let is_volatile = self.eat("volatile") || self.eat("__volatile__");
        let mut text = String::new();
        if self.at("(") {
            let mut depth: u32 = 0;
            loop {
                if self.should_stop() {
                    break;
                }
                if self.at("(") {
                    depth += 1;
                    self.bump();
                    continue;
                }
                if self.at(")") {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                if text.is_empty() && self.current().kind == TokenKind::STRING_LITERAL {
                    if let Some(Tv::Str(s)) = &self.current().value {
                        text = s.clone();
                    }
                }
                self.bump();
            }
        }
        ast::inline_asm(location, text, is_volatile)
    }
}

#[cfg(test)]
mod statement_tests {
    use super::*;
    use crate::standard::Standard;
    use cc_lexer::tokenize;
    use cc_syntax::SyntaxDescriptor;

    fn parse_compound(source: &str) -> Node {
        let descriptor = SyntaxDescriptor::gnu_c();
        let tokens = tokenize(source, "t.c", &descriptor).tokens;
        let mut parser = Parser::new(tokens.as_slice(), Standard::Gnu11);
        parser.parse_compound_stmt()
    }

    #[test]
    fn typedef_name_is_treated_as_a_declaration_not_a_call() {
        let block = parse_compound("{ widget_t x; x = 0; }");
        // Without registering `widget_t` first, this would misparse `widget_t x;`
        // as an expression statement. Register then reparse to exercise the oracle.
        let descriptor = SyntaxDescriptor::gnu_c();
        let tokens = tokenize("{ widget_t x; }", "t.c", &descriptor).tokens;
        let mut parser = Parser::new(tokens.as_slice(), Standard::Gnu11);
        parser.oracle.register_typedef("widget_t");
        let block2 = parser.parse_compound_stmt();
        assert_eq!(block2.children[0].kind, cc_ast::NodeKind::VarDecl { name: "x".to_string() });
        let _ = block;
    }

    #[test]
    fn for_loop_header_declaration_is_scoped_to_the_loop() {
        let block = parse_compound("{ for (int i = 0; i < 10; i = i + 1) ; }");
        assert_eq!(block.children[0].kind, cc_ast::NodeKind::For);
    }

    #[test]
    fn switch_with_case_and_default_parses_as_labeled_children() {
        let block = parse_compound("{ switch (x) { case 1: break; default: break; } }");
        assert_eq!(block.children[0].kind, cc_ast::NodeKind::Switch);
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let block = parse_compound("{ if (a) if (b) c(); else d(); }");
        let outer_if = &block.children[0];
        assert_eq!(outer_if.kind, cc_ast::NodeKind::If);
        let inner_if = &outer_if.children[1];
        assert_eq!(inner_if.children.len(), 3, "else must attach to the inner if");
    }
}
