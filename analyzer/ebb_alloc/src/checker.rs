//! The checker instance and its event wiring.

use ebb_diagnostic::{BugCategory, BugKind};
use ebb_exec::{
    AccessKind, Checker, CheckerContext, Condition, PathError, ProgramState, Subscriptions,
    SymbolReaper,
};
use ebb_sym::{CallExpr, ExprId, Name, RegionTable, SVal, StringInterner};

use crate::classify::{classify, CallAction};
use crate::state::{alloc_map, RefState};

/// Interned tokens for the reserved allocator names and the ownership
/// attributes' allocation module tag.
///
/// Built once at checker construction and read-only afterwards; interning
/// is idempotent, so rebuilding one would be harmless but never happens.
pub(crate) struct ReservedNames {
    pub(crate) malloc: Name,
    pub(crate) free: Name,
    pub(crate) realloc: Name,
    pub(crate) calloc: Name,
    pub(crate) ownership_module: Name,
}

impl ReservedNames {
    fn new(interner: &StringInterner) -> Self {
        ReservedNames {
            malloc: interner.intern("malloc"),
            free: interner.intern("free"),
            realloc: interner.intern("realloc"),
            calloc: interner.intern("calloc"),
            ownership_module: interner.intern("malloc"),
        }
    }
}

/// The bug categories this checker reports, one per kind per instance.
pub(crate) struct Categories {
    pub(crate) double_free: BugCategory,
    pub(crate) leak: BugCategory,
    pub(crate) use_after_free: BugCategory,
    pub(crate) bad_free: BugCategory,
}

impl Categories {
    fn new() -> Self {
        Categories {
            double_free: BugCategory::new(
                BugKind::DoubleFree,
                "Double free",
                "Try to free a memory block that has been released",
            ),
            leak: BugCategory::new(
                BugKind::Leak,
                "Memory leak",
                "Allocated memory never released. Potential memory leak.",
            ),
            use_after_free: BugCategory::new(
                BugKind::UseAfterFree,
                "Use after free",
                "Use dynamically allocated memory after it is freed.",
            ),
            bad_free: BugCategory::new(
                BugKind::BadFree,
                "Bad free",
                "Argument to free() is not memory allocated by malloc()",
            ),
        }
    }
}

/// The allocation lifecycle checker.
///
/// Construction interns the reserved names and builds the bug categories;
/// the instance holds no per-path data and is immutable across the whole
/// exploration. All per-path data lives in the state's
/// [`AllocMap`](crate::AllocMap) slot.
pub struct AllocChecker {
    pub(crate) names: ReservedNames,
    pub(crate) categories: Categories,
}

impl AllocChecker {
    pub fn new(interner: &StringInterner) -> Self {
        AllocChecker {
            names: ReservedNames::new(interner),
            categories: Categories::new(),
        }
    }
}

impl Checker for AllocChecker {
    fn name(&self) -> &'static str {
        "malloc"
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::EVAL_CALL
            | Subscriptions::BIND
            | Subscriptions::LOCATION
            | Subscriptions::DEAD_SYMBOLS
            | Subscriptions::END_PATH
            | Subscriptions::PRE_RETURN
            | Subscriptions::ASSUME
    }

    fn eval_call(&self, call: &CallExpr, ctx: &mut CheckerContext<'_>) -> Result<bool, PathError> {
        // Indirect calls resolve to no declaration and classify as nothing.
        let Some(decl_id) = call.decl else {
            return Ok(false);
        };
        let decl = ctx.fn_decl(decl_id).clone();
        let actions = classify(&decl, &self.names);
        if actions.is_empty() {
            return Ok(false);
        }

        // Every action models the call from the incoming state; several
        // matching attributes fork several successors.
        for action in actions {
            match action {
                CallAction::Malloc => self.malloc_mem(call, ctx)?,
                CallAction::Free => self.free_mem(call, ctx)?,
                CallAction::Realloc => self.realloc_mem(call, ctx)?,
                CallAction::Calloc => self.calloc_mem(call, ctx)?,
                CallAction::AttrAlloc { size_arg } => self.attr_alloc(call, size_arg, ctx)?,
                CallAction::AttrFree { arg, hold } => self.attr_free(call, arg, hold, ctx)?,
            }
        }
        Ok(true)
    }

    fn check_bind(
        &self,
        location: &SVal,
        value: &SVal,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        self.track_binding(location, value, ctx)
    }

    fn check_location(
        &self,
        location: &SVal,
        _access: AccessKind,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        // Flag every dereference of a released symbol, one report per
        // occurrence. The defect does not corrupt the allocator model, so
        // the path continues.
        let Some(symbol) = ctx.regions().loc_symbol_in_base(location) else {
            return Ok(());
        };
        let released = alloc_map(ctx.state())
            .get(symbol)
            .is_some_and(RefState::is_released);
        if released {
            let state = ctx.state().clone();
            if let Some(node) = ctx.generate_node(state) {
                self.report_use_after_free(node, ctx);
            }
        }
        Ok(())
    }

    fn check_dead_symbols(
        &self,
        reaper: &SymbolReaper,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        self.reap_dead_symbols(reaper, ctx)
    }

    fn check_end_path(&self, ctx: &mut CheckerContext<'_>) -> Result<(), PathError> {
        self.end_path_leaks(ctx)
    }

    fn check_pre_return(
        &self,
        ret: Option<ExprId>,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        self.return_escape(ret, ctx)
    }

    fn eval_assume(
        &self,
        state: ProgramState,
        _cond: &Condition,
        _assumption: bool,
        _regions: &RegionTable,
    ) -> Result<ProgramState, PathError> {
        // Re-scan tracked symbols after every committed constraint: an
        // allocation proven null is a failed allocation, never a leak and
        // never freeable.
        let map = alloc_map(&state);
        let mut next = map.clone();
        let mut changed = false;
        for (symbol, entry) in map.iter() {
            if entry.is_allocated() && state.is_provably_null(symbol) {
                next = next.transition(symbol, RefState::AllocationFailed)?;
                changed = true;
            }
        }
        if changed {
            Ok(state.set_slot(next))
        } else {
            Ok(state)
        }
    }
}
