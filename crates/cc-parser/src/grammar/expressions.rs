//! Expression grammar: precedence-climbing over the binary operator ladder,
//! with dedicated handling for the operators that aren't simple left-assoc
//! binary ops (assignment, `?:`, cast, `sizeof`, postfix).

use cc_ast::{self as ast, AssignOp, BinaryOp, LogicalOp, Node, UnaryOp};
use cc_lexer::TokenValue as Tv;
use cc_syntax::TokenKind;

use crate::core::Parser;
use crate::error::Error;

impl Parser<'_> {
    /// Full expression, including the top-level comma operator.
    pub fn parse_expr(&mut self) -> Node {
        let mut lhs = self.parse_assignment_expr();
        while self.at(",") {
            let location = self.current_location();
            self.bump();
            let rhs = self.parse_assignment_expr();
            lhs = ast::binary(location, BinaryOp::Comma, lhs, rhs);
        }
        lhs
    }

    /// An expression with no top-level comma (array sizes, call arguments,
    /// initializers, assignment right-hand sides).
    pub fn parse_assignment_expr(&mut self) -> Node {
        let lhs = self.parse_conditional_expr();
        if let Some(op) = assign_op(self.current_lexeme()) {
            let location = self.current_location();
            self.bump();
            let rhs = self.parse_assignment_expr();
            return ast::assign(location, op, lhs, rhs);
        }
        lhs
    }

    /// Constant-expression level (no comma, no assignment) — used directly
    /// by `case` labels and array-size declarators that must reject `=`.
    pub(crate) fn parse_conditional_expr(&mut self) -> Node {
        let cond = self.parse_logical_or_expr();
        if self.at("?") {
            let location = self.current_location();
            self.bump();
            let then_expr = self.parse_expr();
            self.expect(":", "':' in conditional expression");
            let else_expr = self.parse_conditional_expr();
            return ast::conditional(location, cond, then_expr, else_expr);
        }
        cond
    }

    fn parse_logical_or_expr(&mut self) -> Node {
        let mut lhs = self.parse_logical_and_expr();
        while self.at("||") {
            let location = self.current_location();
            self.bump();
            let rhs = self.parse_logical_and_expr();
            lhs = ast::logical(location, LogicalOp::Or, lhs, rhs);
        }
        lhs
    }

    fn parse_logical_and_expr(&mut self) -> Node {
        let mut lhs = self.parse_bitor_expr();
        while self.at("&&") {
            let location = self.current_location();
            self.bump();
            let rhs = self.parse_bitor_expr();
            lhs = ast::logical(location, LogicalOp::And, lhs, rhs);
        }
        lhs
    }

    fn parse_bitor_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(&[("|", BinaryOp::BitOr)], Self::parse_bitxor_expr)
    }

    fn parse_bitxor_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(&[("^", BinaryOp::BitXor)], Self::parse_bitand_expr)
    }

    fn parse_bitand_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(&[("&", BinaryOp::BitAnd)], Self::parse_equality_expr)
    }

    fn parse_equality_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(
            &[("==", BinaryOp::Eq), ("!=", BinaryOp::Ne)],
            Self::parse_relational_expr,
        )
    }

    fn parse_relational_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(
            &[
                ("<=", BinaryOp::Le),
                (">=", BinaryOp::Ge),
                ("<", BinaryOp::Lt),
                (">", BinaryOp::Gt),
            ],
            Self::parse_shift_expr,
        )
    }

    fn parse_shift_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(
            &[("<<", BinaryOp::Shl), (">>", BinaryOp::Shr)],
            Self::parse_additive_expr,
        )
    }

    fn parse_additive_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(
            &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
            Self::parse_multiplicative_expr,
        )
    }

    fn parse_multiplicative_expr(&mut self) -> Node {
        self.parse_left_assoc_binary(
            &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Mod)],
            Self::parse_cast_expr,
        )
    }

    /// Shared left-associative binary-operator loop: matches the first entry
    /// in `ops` whose lexeme is current, so callers list longer lexemes
    /// before any prefix of them (`<=` before `<`).
    fn parse_left_assoc_binary(
        &mut self,
        ops: &[(&str, BinaryOp)],
        mut next: impl FnMut(&mut Self) -> Node,
    ) -> Node {
        let mut lhs = next(self);
        'outer: loop {
            for (lexeme, op) in ops {
                if self.at(lexeme) {
                    let location = self.current_location();
                    self.bump();
                    let rhs = next(self);
                    lhs = ast::binary(location, *op, lhs, rhs);
                    continue 'outer;
                }
            }
            break;
        }
        lhs
    }

    /// `( type-name ) cast-expression`, disambiguated from a parenthesized
    /// expression by a speculative parse of the type name: restored on
    /// failure, including any diagnostics it emitted along the way.
    fn parse_cast_expr(&mut self) -> Node {
        if self.at("__extension__") {
            self.bump();
            return self.parse_cast_expr();
        }
        if self.at("(") {
            let mark = self.mark();
            let location = self.current_location();
            self.bump();
            if self.at_declaration_specifier() {
                match self.try_parse_type_name() {
                    Ok(type_name) => {
                        self.expect(")", "closing ')' after cast type name");
                        let operand = self.parse_cast_expr();
                        return ast::cast(location, type_name, operand);
                    }
                    Err(_) => self.reset(mark),
                }
            } else {
                self.reset(mark);
            }
        }
        self.parse_unary_expr()
    }

    fn parse_unary_expr(&mut self) -> Node {
        if self.at("__extension__") {
            self.bump();
            return self.parse_unary_expr();
        }
        if let Some(op) = prefix_unary_op(self.current_lexeme()) {
            let location = self.current_location();
            self.bump();
            let operand = self.parse_cast_expr();
            return ast::unary(location, op, operand);
        }
        if self.at("sizeof") {
            return self.parse_sizeof_expr();
        }
        self.parse_postfix_expr()
    }

    fn parse_sizeof_expr(&mut self) -> Node {
        let location = self.current_location();
        self.bump();
        if self.at("(") {
            let mark = self.mark();
            self.bump();
            if self.at_declaration_specifier() {
                match self.try_parse_type_name() {
                    Ok(type_name) if self.eat(")") => return ast::sizeof_type(location, type_name),
                    _ => self.reset(mark),
                }
            } else {
                self.reset(mark);
            }
        }
        let operand = self.parse_unary_expr();
        ast::sizeof_expr(location, operand)
    }

    fn parse_postfix_expr(&mut self) -> Node {
        let mut expr = self.parse_primary_expr();
        loop {
            if self.at("[") {
                let location = self.current_location();
                self.bump();
                let index = self.parse_expr();
                self.expect("]", "closing ']' in subscript");
                expr = ast::subscript(location, expr, index);
            } else if self.at("(") {
                let location = self.current_location();
                self.bump();
                let mut args = Vec::new();
                if !self.at(")") {
                    loop {
                        args.push(self.parse_assignment_expr());
                        if !self.eat(",") {
                            break;
                        }
                    }
                }
                self.expect(")", "closing ')' in call");
                expr = ast::call(location, expr, args);
            } else if self.at(".") {
                let location = self.current_location();
                self.bump();
                let name = self.expect_identifier_lexeme("member name");
                expr = ast::member(location, expr, name, false);
            } else if self.at("->") {
                let location = self.current_location();
                self.bump();
                let name = self.expect_identifier_lexeme("member name");
                expr = ast::member(location, expr, name, true);
            } else if self.at("++") {
                let location = self.current_location();
                self.bump();
                expr = ast::unary(location, UnaryOp::PostInc, expr);
            } else if self.at("--") {
                let location = self.current_location();
                self.bump();
                expr = ast::unary(location, UnaryOp::PostDec, expr);
            } else {
                break;
            }
        }
        expr
    }

    fn expect_identifier_lexeme(&mut self, what: &str) -> String {
        if self.at_identifier() {
            self.bump().lexeme
        } else {
            self.error_msg(format!("expected {what}"));
            String::new()
        }
    }

    fn parse_primary_expr(&mut self) -> Node {
        let location = self.current_location();

        if self.at("(") {
            self.bump();
            if self.at("{") && self.standard.is_gnu() {
                let body = self.parse_compound_stmt();
                self.expect(")", "closing ')' after statement expression");
                return body;
            }
            let inner = self.parse_expr();
            self.expect(")", "closing ')' in parenthesized expression");
            return inner;
        }

        if self.current().kind == TokenKind::INT_LITERAL {
            let token = self.bump();
            let value = match token.value {
                Some(Tv::Int(v)) => v,
                _ => 0,
            };
            return ast::int_literal(location, value);
        }
        if self.current().kind == TokenKind::FLOAT_LITERAL {
            let token = self.bump();
            let value = match token.value {
                Some(Tv::Float(v)) => v,
                _ => 0.0,
            };
            return ast::float_literal(location, value);
        }
        if self.current().kind == TokenKind::STRING_LITERAL {
            let token = self.bump();
            let value = match token.value {
                Some(Tv::Str(v)) => v,
                _ => String::new(),
            };
            return ast::string_literal(location, value);
        }
        if self.current().kind == TokenKind::CHAR_LITERAL {
            let token = self.bump();
            let value = match token.value {
                Some(Tv::Char(v)) => v,
                _ => '\0',
            };
            return ast::char_literal(location, value);
        }
        if self.at_identifier() {
            let name = self.bump().lexeme;
            return ast::identifier(location, name);
        }

        self.error(Error::UnexpectedToken);
        self.bump();
        ast::identifier(location, String::new())
    }
}

fn assign_op(lexeme: &str) -> Option<AssignOp> {
    Some(match lexeme {
        "=" => AssignOp::Assign,
        "+=" => AssignOp::AddAssign,
        "-=" => AssignOp::SubAssign,
        "*=" => AssignOp::MulAssign,
        "/=" => AssignOp::DivAssign,
        "%=" => AssignOp::ModAssign,
        "&=" => AssignOp::AndAssign,
        "|=" => AssignOp::OrAssign,
        "^=" => AssignOp::XorAssign,
        "<<=" => AssignOp::ShlAssign,
        ">>=" => AssignOp::ShrAssign,
        _ => return None,
    })
}

fn prefix_unary_op(lexeme: &str) -> Option<UnaryOp> {
    Some(match lexeme {
        "++" => UnaryOp::PreInc,
        "--" => UnaryOp::PreDec,
        "+" => UnaryOp::Plus,
        "-" => UnaryOp::Neg,
        "!" => UnaryOp::Not,
        "~" => UnaryOp::BitNot,
        "*" => UnaryOp::Deref,
        "&" => UnaryOp::AddrOf,
        _ => return None,
    })
}

#[cfg(test)]
mod expression_tests {
    use super::*;
    use crate::standard::Standard;
    use cc_lexer::tokenize;
    use cc_syntax::SyntaxDescriptor;

    fn parse_expr(source: &str) -> Node {
        let descriptor = SyntaxDescriptor::c();
        let tokens = tokenize(source, "t.c", &descriptor).tokens;
        let mut parser = Parser::new(tokens.as_slice(), Standard::C11);
        parser.parse_expr()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expr("1 + 2 * 3");
        assert_eq!(expr.kind, cc_ast::NodeKind::Binary { op: BinaryOp::Add });
        assert_eq!(expr.children[1].kind, cc_ast::NodeKind::Binary { op: BinaryOp::Mul });
    }

    #[test]
    fn assignment_is_right_associative() {
        let expr = parse_expr("a = b = c");
        assert_eq!(expr.kind, cc_ast::NodeKind::Assign { op: AssignOp::Assign });
        assert_eq!(expr.children[1].kind, cc_ast::NodeKind::Assign { op: AssignOp::Assign });
    }

    #[test]
    fn cast_disambiguates_from_parenthesized_expression() {
        let cast = parse_expr("(int)x");
        assert_eq!(cast.kind, cc_ast::NodeKind::Cast);
        let paren = parse_expr("(x)");
        assert_eq!(paren.kind, cc_ast::NodeKind::Identifier { name: "x".to_string() });
    }

    #[test]
    fn cast_of_typedef_name_is_recognized() {
        let descriptor = SyntaxDescriptor::c();
        let tokens = tokenize("(widget_t)x", "t.c", &descriptor).tokens;
        let mut parser = Parser::new(tokens.as_slice(), Standard::C11);
        parser.oracle.register_typedef("widget_t");
        let expr = parser.parse_expr();
        assert_eq!(expr.kind, cc_ast::NodeKind::Cast);
    }

    #[test]
    fn sizeof_type_name_vs_sizeof_expression() {
        let sizeof_type = parse_expr("sizeof(int)");
        assert_eq!(sizeof_type.kind, cc_ast::NodeKind::SizeofType);
        let sizeof_expr = parse_expr("sizeof(x)");
        assert_eq!(sizeof_expr.kind, cc_ast::NodeKind::SizeofExpr);
    }

    #[test]
    fn logical_and_short_circuits_as_a_distinct_node_kind() {
        let expr = parse_expr("a && b");
        assert_eq!(expr.kind, cc_ast::NodeKind::Logical { op: LogicalOp::And });
    }
}
