//! The typedef oracle: the one piece of state that feeds back from the
//! parser into its own lexical classification of identifiers.

use indexmap::IndexSet;

/// Implementation-defined built-in type names recognized without a
/// preceding `typedef`, beyond the base keywords (`int`, `char`, ...).
const BUILTIN_TYPE_NAMES: &[&str] = &[
    "int8_t", "int16_t", "int32_t", "int64_t",
    "uint8_t", "uint16_t", "uint32_t", "uint64_t",
    "intptr_t", "uintptr_t", "intmax_t", "uintmax_t",
    "size_t", "ssize_t", "ptrdiff_t", "wchar_t", "wint_t",
    "va_list",
    "pthread_t", "pthread_mutex_t", "pthread_cond_t", "pthread_attr_t",
    "pthread_mutexattr_t", "pthread_condattr_t", "pthread_key_t", "pthread_once_t",
    "FILE", "fpos_t", "time_t", "clock_t",
];

/// Tracks identifiers registered by `typedef` declarations and the tag
/// namespaces for `struct`/`union`/`enum`, so the declaration grammar can
/// tell a type name from an ordinary identifier without backtracking.
#[derive(Debug, Clone, Default)]
pub struct TypedefOracle {
    typedefs: IndexSet<String>,
    struct_tags: IndexSet<String>,
    union_tags: IndexSet<String>,
    enum_tags: IndexSet<String>,
}

impl TypedefOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `name` names a type: a registered typedef, a compile-time
    /// built-in, or an identifier beginning with `__builtin_`.
    pub fn is_type_name(&self, name: &str) -> bool {
        name.starts_with("__builtin_") || self.typedefs.contains(name) || BUILTIN_TYPE_NAMES.contains(&name)
    }

    pub fn register_typedef(&mut self, name: impl Into<String>) {
        self.typedefs.insert(name.into());
    }

    pub fn register_struct_tag(&mut self, name: impl Into<String>) {
        self.struct_tags.insert(name.into());
    }

    pub fn register_union_tag(&mut self, name: impl Into<String>) {
        self.union_tags.insert(name.into());
    }

    pub fn register_enum_tag(&mut self, name: impl Into<String>) {
        self.enum_tags.insert(name.into());
    }

    pub fn is_struct_tag(&self, name: &str) -> bool {
        self.struct_tags.contains(name)
    }

    pub fn is_union_tag(&self, name: &str) -> bool {
        self.union_tags.contains(name)
    }

    pub fn is_enum_tag(&self, name: &str) -> bool {
        self.enum_tags.contains(name)
    }
}

#[cfg(test)]
mod oracle_tests {
    use super::*;

    #[test]
    fn builtin_alias_is_a_type_name() {
        let oracle = TypedefOracle::new();
        assert!(oracle.is_type_name("size_t"));
        assert!(!oracle.is_type_name("not_a_type"));
    }

    #[test]
    fn builtin_prefixed_identifier_is_a_type_name() {
        let oracle = TypedefOracle::new();
        assert!(oracle.is_type_name("__builtin_va_list"));
    }

    #[test]
    fn registered_typedef_is_a_type_name() {
        let mut oracle = TypedefOracle::new();
        assert!(!oracle.is_type_name("widget_t"));
        oracle.register_typedef("widget_t");
        assert!(oracle.is_type_name("widget_t"));
    }

    #[test]
    fn tag_namespaces_are_independent() {
        let mut oracle = TypedefOracle::new();
        oracle.register_struct_tag("point");
        assert!(oracle.is_struct_tag("point"));
        assert!(!oracle.is_union_tag("point"));
        assert!(!oracle.is_type_name("point"));
    }
}
