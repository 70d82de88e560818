use cc_syntax::{SyntaxDescriptor, TokenKind};
use indoc::indoc;

use crate::lex::tokenize;
use crate::token::TokenValue;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, "t.c", &SyntaxDescriptor::c())
        .tokens
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn totality_and_eof() {
    let outcome = tokenize("int main(void) { return 0; }", "t.c", &SyntaxDescriptor::c());
    assert_eq!(outcome.tokens.tail().unwrap().kind, TokenKind::EOF);
    assert!(!outcome.tokens.is_empty());
}

#[test]
fn empty_input_still_yields_eof() {
    let outcome = tokenize("", "t.c", &SyntaxDescriptor::c());
    assert_eq!(outcome.tokens.len(), 1);
    assert_eq!(outcome.tokens.get(0).unwrap().kind, TokenKind::EOF);
}

#[test]
fn keyword_vs_identifier() {
    let k = kinds("int x");
    assert!(k[0].is_keyword());
    assert!(k[1].is_identifier());
}

#[test]
fn decimal_hex_octal_and_binary_literals() {
    let d = SyntaxDescriptor::gnu_c();
    let outcome = tokenize("10 0x1F 017 0b101", "t.c", &d);
    let values: Vec<_> = outcome
        .tokens
        .iter()
        .filter_map(|t| match &t.value {
            Some(TokenValue::Int(v)) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![10, 31, 15, 5]);
}

#[test]
fn float_literal_with_exponent() {
    let outcome = tokenize("3.14 2e10 5.0f", "t.c", &SyntaxDescriptor::c());
    let floats: Vec<_> = outcome
        .tokens
        .iter()
        .filter_map(|t| match &t.value {
            Some(TokenValue::Float(v)) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(floats, vec![3.14, 2e10, 5.0]);
}

#[test]
fn string_literal_decodes_escapes() {
    let outcome = tokenize(r#""a\nb""#, "t.c", &SyntaxDescriptor::c());
    let tok = outcome.tokens.get(0).unwrap();
    assert_eq!(tok.kind, TokenKind::STRING_LITERAL);
    assert_eq!(tok.value, Some(TokenValue::Str("a\nb".to_string())));
}

#[test]
fn unterminated_string_produces_diagnostic_and_error_token() {
    let outcome = tokenize("\"abc", "t.c", &SyntaxDescriptor::c());
    assert!(outcome.diagnostics.has_errors());
    assert_eq!(outcome.tokens.get(0).unwrap().kind, TokenKind::ERROR);
}

#[test]
fn unterminated_char_produces_diagnostic() {
    let outcome = tokenize("'a", "t.c", &SyntaxDescriptor::c());
    assert!(outcome.diagnostics.has_errors());
}

#[test]
fn char_literal_escape() {
    let outcome = tokenize(r"'\n'", "t.c", &SyntaxDescriptor::c());
    let tok = outcome.tokens.get(0).unwrap();
    assert_eq!(tok.value, Some(TokenValue::Char('\n')));
}

#[test]
fn line_comment_is_skipped() {
    let k = kinds("int x; // trailing comment\nint y;");
    assert!(k.iter().filter(|k| k.is_keyword()).count() == 2);
}

#[test]
fn block_comment_spanning_lines_updates_line_count() {
    let outcome = tokenize("int /* multi\nline */ x;", "t.c", &SyntaxDescriptor::c());
    let x_tok = outcome.tokens.iter().find(|t| t.lexeme == "x").unwrap();
    assert_eq!(x_tok.location.line, 2);
}

#[test]
fn line_marker_resets_line_and_file() {
    let src = indoc! {r#"
        int a;
        # 100 "included.h"
        int b;
    "#};
    let outcome = tokenize(src, "main.c", &SyntaxDescriptor::c());
    let b_tok = outcome.tokens.iter().find(|t| t.lexeme == "b").unwrap();
    assert_eq!(b_tok.location.line, 101);
    assert_eq!(&*b_tok.location.file, "included.h");
}

#[test]
fn operator_table_prefers_maximal_munch() {
    let k = kinds("a <<= b");
    assert!(k.iter().any(|t| t.is_operator()));
    let outcome = tokenize("a <<= b", "t.c", &SyntaxDescriptor::c());
    let shift_assign = outcome.tokens.iter().find(|t| t.lexeme == "<<=");
    assert!(shift_assign.is_some());
}

#[test]
fn unknown_character_advances_by_one_and_recovers() {
    let outcome = tokenize("int x = 1 `@` 2;", "t.c", &SyntaxDescriptor::c());
    assert!(outcome.diagnostics.has_errors());
    assert_eq!(outcome.tokens.tail().unwrap().kind, TokenKind::EOF);
}

#[test]
fn round_trip_lexeme_concatenation_matches_source_modulo_trivia() {
    let src = "int add(int a, int b) { return a+b; }";
    let outcome = tokenize(src, "t.c", &SyntaxDescriptor::c());
    let joined: String = outcome
        .tokens
        .iter()
        .filter(|t| !t.is_eof())
        .map(|t| t.lexeme.as_str())
        .collect();
    let stripped: String = src.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(joined, stripped);
}

#[test]
fn gnu_builtin_identifier_is_still_identifier_kind() {
    let k = kinds("__builtin_va_list x");
    assert!(k[0].is_identifier());
}
