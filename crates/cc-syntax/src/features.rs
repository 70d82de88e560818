//! Feature flags the lexer consults for numeric-literal and preprocessor support.

/// Which numeric-literal forms and preprocessor behavior the descriptor enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub hex_literals: bool,
    pub binary_literals: bool,
    pub octal_literals: bool,
    pub float_literals: bool,
    pub scientific_notation: bool,
    pub preprocessor_present: bool,
}

impl FeatureFlags {
    /// The feature set for standard C: hex/octal/float/scientific all enabled,
    /// binary literals are a GNU extension enabled separately, and the
    /// preprocessor is assumed to have already run (line markers present).
    pub const fn c() -> Self {
        Self {
            hex_literals: true,
            binary_literals: false,
            octal_literals: true,
            float_literals: true,
            scientific_notation: true,
            preprocessor_present: true,
        }
    }

    /// The GNU C feature set: as [`FeatureFlags::c`] plus `0b` binary literals.
    pub const fn gnu_c() -> Self {
        Self {
            binary_literals: true,
            ..Self::c()
        }
    }
}
