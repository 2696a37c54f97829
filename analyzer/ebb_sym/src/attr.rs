//! Declarative ownership-transfer attributes.
//!
//! An ownership attribute annotates a function declaration with allocator
//! semantics: the function either returns freshly owned memory (`Returns`),
//! takes ownership of an argument and releases it (`Takes`), or holds an
//! argument without releasing it terminally (`Holds`). A declaration may
//! carry any number of attributes; checkers process each independently.

use smallvec::SmallVec;

use crate::Name;

/// The role an ownership attribute assigns to its function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OwnershipKind {
    /// The function returns ownership of a fresh allocation.
    Returns,
    /// The function takes ownership of the listed arguments and releases
    /// them.
    Takes,
    /// The function takes ownership of the listed arguments but the release
    /// is non-terminal: the memory lives on elsewhere.
    Holds,
}

/// One ownership attribute on a function declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnershipAttr {
    pub kind: OwnershipKind,
    /// Module tag scoping the attribute. Only the reserved allocation tag
    /// is meaningful to the allocation checker; other tags are ignored.
    pub module: Name,
    /// Zero-based argument indices. For `Returns`, the first index (if any)
    /// names the size argument; for `Takes`/`Holds`, each index names an
    /// argument whose pointee is released.
    pub args: SmallVec<[u32; 2]>,
}

impl OwnershipAttr {
    pub fn new(kind: OwnershipKind, module: Name, args: impl IntoIterator<Item = u32>) -> Self {
        OwnershipAttr {
            kind,
            module,
            args: args.into_iter().collect(),
        }
    }
}
