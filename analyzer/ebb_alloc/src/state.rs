//! The lifecycle lattice and the per-path symbol map.

use ebb_exec::{PathError, ProgramState};
use ebb_sym::{ProgPoint, Symbol};

/// Lifecycle state of one tracked allocation on one path.
///
/// A symbol occupies exactly one state at a time, and transitions are
/// monotonic: `AllocatedUnchecked` is the only non-terminal state, and the
/// four others are terminal for that symbol on that path. Each owning
/// variant carries the program point that put the symbol there, which is
/// what diagnostics anchor their explanations to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefState {
    /// Produced by an allocation the path has not yet proven failed.
    AllocatedUnchecked(ProgPoint),
    /// The path has proven this allocation's result is null.
    AllocationFailed,
    /// Freed by a plain or `Takes` deallocation.
    Released(ProgPoint),
    /// Ownership transferred out: freed via a `Holds` deallocation, or
    /// escaped into storage that survives the function.
    Relinquished(ProgPoint),
    /// Returned to the caller of the analyzed function.
    Escaped(ProgPoint),
}

impl RefState {
    /// Whether the path still owns this allocation.
    pub fn is_allocated(&self) -> bool {
        matches!(self, RefState::AllocatedUnchecked(_))
    }

    /// Whether this allocation has been terminally freed.
    pub fn is_released(&self) -> bool {
        matches!(self, RefState::Released(_))
    }
}

/// Persistent map from tracked symbol to lifecycle state.
///
/// One instance per path state, stored in the state's checker slot. Absence
/// of a symbol means "untracked": memory not obtained through a tracked
/// allocator, about which this checker makes no claims.
///
/// `enter`, `transition`, and `remove` are contract-checked: entering a
/// symbol twice, or touching one that was never entered, is an
/// implementation bug surfaced as a [`PathError`], never a diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocMap {
    entries: im::HashMap<Symbol, RefState>,
}

impl AllocMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: Symbol) -> Option<&RefState> {
        self.entries.get(&symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.entries.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked symbols and their states, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, RefState)> + '_ {
        self.entries.iter().map(|(sym, st)| (*sym, *st))
    }

    /// Begin tracking a symbol. The symbol must not already be tracked.
    pub fn enter(&self, symbol: Symbol, state: RefState) -> Result<Self, PathError> {
        if self.entries.contains_key(&symbol) {
            return Err(PathError::SymbolAlreadyTracked(symbol));
        }
        let mut next = self.clone();
        next.entries.insert(symbol, state);
        Ok(next)
    }

    /// Move a tracked symbol to a new state. The symbol must be tracked.
    pub fn transition(&self, symbol: Symbol, state: RefState) -> Result<Self, PathError> {
        if !self.entries.contains_key(&symbol) {
            return Err(PathError::SymbolNotTracked(symbol));
        }
        let mut next = self.clone();
        next.entries.insert(symbol, state);
        Ok(next)
    }

    /// Stop tracking a symbol. The symbol must be tracked.
    pub fn remove(&self, symbol: Symbol) -> Result<Self, PathError> {
        if !self.entries.contains_key(&symbol) {
            return Err(PathError::SymbolNotTracked(symbol));
        }
        let mut next = self.clone();
        next.entries.remove(&symbol);
        Ok(next)
    }
}

/// The allocation map of a path state; an empty map if the checker has not
/// tracked anything on this path yet.
pub fn alloc_map(state: &ProgramState) -> AllocMap {
    state.slot::<AllocMap>().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests;
