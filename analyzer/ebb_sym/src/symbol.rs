//! Symbolic value handles.

use std::fmt;

/// Opaque handle identifying one abstractly-tracked value on a path.
///
/// Symbols are conjured by the execution core at the program point that
/// produces the value (for the allocation checker, the allocation call
/// site). Equality is handle identity — two allocations at the same source
/// location on different paths get distinct symbols.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}
