//! Symbolic value classification.

use crate::{Name, RegionId};

/// A location value: something a pointer can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Loc {
    /// The null pointer.
    Null,
    /// A concrete (literal) address, e.g. `(char *)0x4000`.
    ConcreteAddr(u64),
    /// The address of a label.
    Label(Name),
    /// The address of a memory region.
    Region(RegionId),
}

/// Classification of a value produced by symbolic evaluation.
///
/// Mirrors the execution core's value taxonomy: a value is either garbage
/// (`Undefined`), unconstrained (`Unknown`), a concrete integer, or a
/// location. Checkers branch on this classification rather than on syntax.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SVal {
    /// Uninitialized or otherwise garbage value.
    Undefined,
    /// A value the engine has no information about.
    Unknown,
    /// A concrete non-location integer.
    Int(i128),
    /// A location.
    Loc(Loc),
}

impl SVal {
    /// The null pointer as a value.
    pub const NULL: SVal = SVal::Loc(Loc::Null);

    /// Whether this value is a location.
    #[inline]
    pub fn is_loc(&self) -> bool {
        matches!(self, SVal::Loc(_))
    }

    /// Whether this value is `Unknown` or `Undefined`.
    #[inline]
    pub fn is_unknown_or_undef(&self) -> bool {
        matches!(self, SVal::Unknown | SVal::Undefined)
    }

    /// The region this value points at, if it is a region location.
    #[inline]
    pub fn as_region(&self) -> Option<RegionId> {
        match self {
            SVal::Loc(Loc::Region(r)) => Some(*r),
            _ => None,
        }
    }

    /// Whether this value is known to be a defined non-null location or
    /// integer — i.e. suitable as an operand of a definite comparison.
    #[inline]
    pub fn is_defined(&self) -> bool {
        !self.is_unknown_or_undef()
    }
}
