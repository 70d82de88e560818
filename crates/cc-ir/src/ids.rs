//! Owned newtype handles replacing the source's `void*` IR handles (see
//! DESIGN.md's "opaque void* payloads" entry).

use std::fmt;

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", stringify!($name), self.0)
            }
        }
    };
}

handle!(FuncId);
handle!(BlockId);
handle!(InstrId);
handle!(SlotId);
