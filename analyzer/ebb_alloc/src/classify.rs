//! Call-site classification.
//!
//! A call either resolves to one of the four reserved allocator names, or
//! its declaration is scanned for ownership attributes in source order.
//! Attributes scoped to other modules are ignored; a declaration may carry
//! several matching attributes, each producing its own transition. A call
//! that matches nothing is left to other analysis — unclassified, not an
//! error.

use smallvec::SmallVec;

use ebb_sym::{FnDecl, OwnershipKind};

use crate::checker::ReservedNames;

/// One transition a classified call asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CallAction {
    /// `malloc(size)`.
    Malloc,
    /// `free(ptr)`.
    Free,
    /// `realloc(ptr, size)`.
    Realloc,
    /// `calloc(count, element_size)`.
    Calloc,
    /// An attribute-declared allocator; `size_arg` is the argument index
    /// holding the allocation size, when the attribute names one.
    AttrAlloc { size_arg: Option<u32> },
    /// An attribute-declared deallocator releasing argument `arg`;
    /// `hold` means the release is non-terminal.
    AttrFree { arg: u32, hold: bool },
}

/// Classify a resolved callee into the transitions to apply.
pub(crate) fn classify(decl: &FnDecl, names: &ReservedNames) -> SmallVec<[CallAction; 2]> {
    let mut actions = SmallVec::new();

    if decl.name == names.malloc {
        actions.push(CallAction::Malloc);
        return actions;
    }
    if decl.name == names.free {
        actions.push(CallAction::Free);
        return actions;
    }
    if decl.name == names.realloc {
        actions.push(CallAction::Realloc);
        return actions;
    }
    if decl.name == names.calloc {
        actions.push(CallAction::Calloc);
        return actions;
    }

    for attr in &decl.attrs {
        if attr.module != names.ownership_module {
            continue;
        }
        match attr.kind {
            OwnershipKind::Returns => {
                actions.push(CallAction::AttrAlloc {
                    size_arg: attr.args.first().copied(),
                });
            }
            OwnershipKind::Takes | OwnershipKind::Holds => {
                let hold = attr.kind == OwnershipKind::Holds;
                for &arg in &attr.args {
                    actions.push(CallAction::AttrFree { arg, hold });
                }
            }
        }
    }

    actions
}

#[cfg(test)]
mod tests;
