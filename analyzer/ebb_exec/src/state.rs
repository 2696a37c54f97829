//! Immutable per-path program state.
//!
//! Every map in here is an `im::HashMap`, so cloning a state — which happens
//! on every path fork — shares structure with the parent and costs O(1).
//! Updates copy only the touched trie path; the parent state is never
//! observably modified. Checkers must treat states as values: take one in,
//! hand new ones out.

use std::any::{Any, TypeId};
use std::sync::Arc;

use ebb_sym::{ExprId, Loc, RegionId, RegionTable, SVal, Symbol};

/// Nullness constraint recorded for a symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Nullness {
    /// The symbol's value is exactly null on this path.
    Null,
    /// The symbol's value is known non-null on this path.
    NonNull,
}

/// A boolean condition a path can be split on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// The value compares equal to the null pointer.
    IsNull(SVal),
    /// The value compares equal to zero (pointer-width integer zero).
    IsZero(SVal),
}

/// The outcome of assuming a condition: constrained true and false states.
///
/// An absent side means the engine judged that branch infeasible under the
/// current constraints.
#[derive(Clone, Debug)]
pub struct BranchStates {
    pub if_true: Option<ProgramState>,
    pub if_false: Option<ProgramState>,
}

/// Multiply two values with the engine's arithmetic semantics.
///
/// Concrete operands multiply exactly; overflow and non-concrete operands
/// yield `Unknown` (the engine does not model them more precisely).
pub fn eval_mul(lhs: &SVal, rhs: &SVal) -> SVal {
    match (lhs, rhs) {
        (SVal::Int(a), SVal::Int(b)) => a.checked_mul(*b).map_or(SVal::Unknown, SVal::Int),
        _ => SVal::Unknown,
    }
}

/// Immutable program state for one path.
///
/// The slot map is the extension point: each checker stores its own
/// persistent data under its slot type, invisible to every other checker.
#[derive(Clone, Default)]
pub struct ProgramState {
    /// Expression values on this path.
    bindings: im::HashMap<ExprId, SVal>,
    /// Location bindings (the store).
    store: im::HashMap<RegionId, SVal>,
    /// Whole-region default fills (e.g. a calloc'd block reads as zero).
    defaults: im::HashMap<RegionId, SVal>,
    /// Region extents, keyed by the region's symbol.
    extents: im::HashMap<Symbol, SVal>,
    /// Per-symbol nullness constraints.
    nullness: im::HashMap<Symbol, Nullness>,
    /// Checker extension slots, keyed by slot type.
    slots: im::HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Expression environment
    // ------------------------------------------------------------------

    /// The value of an expression on this path. Unevaluated expressions
    /// read as `Unknown`.
    pub fn sval_of(&self, expr: ExprId) -> SVal {
        self.bindings.get(&expr).copied().unwrap_or(SVal::Unknown)
    }

    /// Bind an expression to a value.
    #[must_use]
    pub fn bind_expr(&self, expr: ExprId, val: SVal) -> Self {
        let mut next = self.clone();
        next.bindings.insert(expr, val);
        next
    }

    // ------------------------------------------------------------------
    // Store
    // ------------------------------------------------------------------

    /// The value stored at a region, if one has been bound.
    pub fn store_value(&self, region: RegionId) -> Option<SVal> {
        self.store.get(&region).copied()
    }

    /// Bind a location to a value, if the store can represent the location.
    ///
    /// Returns `None` for locations the store has no representation for
    /// (null, literal addresses, labels, unknown or undefined locations).
    /// Checkers use this as a representability probe as well as a store.
    #[must_use]
    pub fn bind_loc(&self, location: &SVal, val: SVal) -> Option<Self> {
        match location {
            SVal::Loc(Loc::Region(region)) => {
                let mut next = self.clone();
                next.store.insert(*region, val);
                Some(next)
            }
            _ => None,
        }
    }

    /// Bind a region's default fill (every unwritten byte reads as `val`).
    #[must_use]
    pub fn bind_default(&self, region: RegionId, val: SVal) -> Self {
        let mut next = self.clone();
        next.defaults.insert(region, val);
        next
    }

    /// The default fill bound for a region.
    pub fn default_of(&self, region: RegionId) -> Option<SVal> {
        self.defaults.get(&region).copied()
    }

    // ------------------------------------------------------------------
    // Extents
    // ------------------------------------------------------------------

    /// Constrain a symbolic region's extent to equal `size`.
    #[must_use]
    pub fn set_extent(&self, symbol: Symbol, size: SVal) -> Self {
        let mut next = self.clone();
        next.extents.insert(symbol, size);
        next
    }

    /// The extent constraint recorded for a symbol.
    pub fn extent_of(&self, symbol: Symbol) -> Option<SVal> {
        self.extents.get(&symbol).copied()
    }

    // ------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------

    /// The nullness constraint recorded for a symbol.
    pub fn nullness_of(&self, symbol: Symbol) -> Option<Nullness> {
        self.nullness.get(&symbol).copied()
    }

    /// Whether this path has proven the symbol's value to be exactly null.
    pub fn is_provably_null(&self, symbol: Symbol) -> bool {
        self.nullness_of(symbol) == Some(Nullness::Null)
    }

    /// All symbols carrying a nullness constraint on this path.
    pub fn constrained_symbols(&self) -> impl Iterator<Item = (Symbol, Nullness)> + '_ {
        self.nullness.iter().map(|(sym, n)| (*sym, *n))
    }

    #[must_use]
    fn with_nullness(&self, symbol: Symbol, nullness: Nullness) -> Self {
        let mut next = self.clone();
        next.nullness.insert(symbol, nullness);
        next
    }

    /// Split this state on a condition.
    ///
    /// Symbolic operands that are unconstrained come back constrained on
    /// each feasible side; concrete operands make one side infeasible.
    /// `Unknown`/`Undefined` operands leave both sides feasible and
    /// unconstrained.
    pub fn assume(&self, cond: &Condition, regions: &RegionTable) -> BranchStates {
        match cond {
            Condition::IsNull(val) => self.assume_null(val, regions),
            Condition::IsZero(val) => self.assume_zero(val),
        }
    }

    fn assume_null(&self, val: &SVal, regions: &RegionTable) -> BranchStates {
        match val {
            SVal::Loc(Loc::Null) | SVal::Int(0) => BranchStates {
                if_true: Some(self.clone()),
                if_false: None,
            },
            SVal::Loc(Loc::ConcreteAddr(addr)) => {
                if *addr == 0 {
                    BranchStates {
                        if_true: Some(self.clone()),
                        if_false: None,
                    }
                } else {
                    BranchStates {
                        if_true: None,
                        if_false: Some(self.clone()),
                    }
                }
            }
            SVal::Loc(Loc::Label(_)) | SVal::Int(_) => BranchStates {
                if_true: None,
                if_false: Some(self.clone()),
            },
            SVal::Loc(Loc::Region(region)) => match regions.base_symbol(*region) {
                Some(sym) => match self.nullness_of(sym) {
                    Some(Nullness::Null) => BranchStates {
                        if_true: Some(self.clone()),
                        if_false: None,
                    },
                    Some(Nullness::NonNull) => BranchStates {
                        if_true: None,
                        if_false: Some(self.clone()),
                    },
                    None => BranchStates {
                        if_true: Some(self.with_nullness(sym, Nullness::Null)),
                        if_false: Some(self.with_nullness(sym, Nullness::NonNull)),
                    },
                },
                // The address of a variable, function, or other concrete
                // region is never null.
                None => BranchStates {
                    if_true: None,
                    if_false: Some(self.clone()),
                },
            },
            SVal::Unknown | SVal::Undefined => BranchStates {
                if_true: Some(self.clone()),
                if_false: Some(self.clone()),
            },
        }
    }

    fn assume_zero(&self, val: &SVal) -> BranchStates {
        match val {
            SVal::Int(0) | SVal::Loc(Loc::Null) => BranchStates {
                if_true: Some(self.clone()),
                if_false: None,
            },
            SVal::Loc(Loc::ConcreteAddr(0)) => BranchStates {
                if_true: Some(self.clone()),
                if_false: None,
            },
            SVal::Int(_) | SVal::Loc(_) => BranchStates {
                if_true: None,
                if_false: Some(self.clone()),
            },
            SVal::Unknown | SVal::Undefined => BranchStates {
                if_true: Some(self.clone()),
                if_false: Some(self.clone()),
            },
        }
    }

    // ------------------------------------------------------------------
    // Checker slots
    // ------------------------------------------------------------------

    /// This checker's slot value, if it has set one on this path.
    pub fn slot<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Replace this checker's slot value.
    #[must_use]
    pub fn set_slot<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut next = self.clone();
        next.slots.insert(TypeId::of::<T>(), Arc::new(value));
        next
    }
}

impl std::fmt::Debug for ProgramState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramState")
            .field("bindings", &self.bindings.len())
            .field("store", &self.store.len())
            .field("extents", &self.extents.len())
            .field("nullness", &self.nullness)
            .field("slots", &self.slots.len())
            .finish()
    }
}
