//! Keyword, operator, and punctuation tables.
//!
//! Operator and punctuation tables are kept sorted longest-lexeme-first so the
//! lexer gets maximal munch for free by trying entries in table order and
//! stopping at the first prefix match.

use std::collections::HashMap;

use crate::kind::TokenKind;

/// Keyword name → token-kind lookup, hashed since the table is consulted
/// on every identifier lexed.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    by_name: HashMap<&'static str, TokenKind>,
}

impl KeywordTable {
    pub fn new(entries: &[(&'static str, TokenKind)]) -> Self {
        Self {
            by_name: entries.iter().copied().collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<TokenKind> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// A longest-match-first table of multi-character symbols (operators or punctuation).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Sorted longest-lexeme-first; ties broken by insertion order.
    entries: Vec<(&'static str, TokenKind)>,
}

impl SymbolTable {
    pub fn new(mut entries: Vec<(&'static str, TokenKind)>) -> Self {
        entries.sort_by_key(|(lexeme, _)| std::cmp::Reverse(lexeme.len()));
        Self { entries }
    }

    /// Tries to match the longest table entry that is a prefix of `input`.
    /// Returns the matched kind and the byte length consumed.
    pub fn match_longest(&self, input: &str) -> Option<(TokenKind, usize)> {
        self.entries
            .iter()
            .find(|(lexeme, _)| input.starts_with(lexeme))
            .map(|(lexeme, kind)| (*kind, lexeme.len()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tables_tests {
    use super::*;

    #[test]
    fn keyword_lookup_hits_and_misses() {
        let table = KeywordTable::new(&[("if", TokenKind::keyword(0)), ("while", TokenKind::keyword(1))]);
        assert_eq!(table.lookup("if"), Some(TokenKind::keyword(0)));
        assert_eq!(table.lookup("iffy"), None);
    }

    #[test]
    fn symbol_table_prefers_longest_match() {
        let table = SymbolTable::new(vec![
            ("<", TokenKind::operator(0)),
            ("<<", TokenKind::operator(1)),
            ("<<=", TokenKind::operator(2)),
        ]);
        assert_eq!(table.match_longest("<<=rest"), Some((TokenKind::operator(2), 3)));
        assert_eq!(table.match_longest("<< rest"), Some((TokenKind::operator(1), 2)));
        assert_eq!(table.match_longest("< rest"), Some((TokenKind::operator(0), 1)));
        assert_eq!(table.match_longest("rest"), None);
    }
}
