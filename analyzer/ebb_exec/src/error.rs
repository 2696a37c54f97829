//! Internal contract violations.

use ebb_sym::Symbol;
use thiserror::Error;

/// A broken invariant inside the analysis, as opposed to a defect in the
/// analyzed program.
///
/// These are implementation bugs: the path that produced one must be
/// aborted, never continued with an inconsistent state, and the value must
/// never be rendered as an analysis diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A lifecycle entry was inserted for a symbol that is already tracked.
    #[error("symbol {0:?} is already tracked on this path")]
    SymbolAlreadyTracked(Symbol),

    /// A lifecycle entry was updated or removed for a symbol that was never
    /// entered.
    #[error("symbol {0:?} has no lifecycle entry on this path")]
    SymbolNotTracked(Symbol),
}
