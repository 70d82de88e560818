//! The language standard selected for a parse, gating a handful of productions.

/// Which C standard (or GNU dialect) the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standard {
    C89,
    C90,
    C99,
    C11,
    C23,
    Gnu89,
    Gnu99,
    Gnu11,
    Gnu23,
}

impl Standard {
    /// `_Generic` and `_Static_assert` require at least C11 (or its GNU dialect).
    pub fn allows_generic_selection(self) -> bool {
        self.at_least_c11()
    }

    pub fn allows_static_assert(self) -> bool {
        self.at_least_c11()
    }

    /// `_Atomic` as a type specifier requires at least C11.
    pub fn allows_atomic_type_specifier(self) -> bool {
        self.at_least_c11()
    }

    fn at_least_c11(self) -> bool {
        matches!(self, Standard::C11 | Standard::C23 | Standard::Gnu11 | Standard::Gnu23)
    }

    pub fn is_gnu(self) -> bool {
        matches!(self, Standard::Gnu89 | Standard::Gnu99 | Standard::Gnu11 | Standard::Gnu23)
    }
}

#[cfg(test)]
mod standard_tests {
    use super::*;

    #[test]
    fn c11_and_later_allow_generic_and_static_assert() {
        assert!(Standard::C11.allows_generic_selection());
        assert!(Standard::C23.allows_static_assert());
        assert!(Standard::Gnu11.allows_atomic_type_specifier());
    }

    #[test]
    fn pre_c11_standards_do_not() {
        assert!(!Standard::C99.allows_generic_selection());
        assert!(!Standard::C89.allows_static_assert());
        assert!(!Standard::Gnu99.allows_atomic_type_specifier());
    }
}
