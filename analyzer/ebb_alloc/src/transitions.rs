//! Allocation and deallocation transition rules.
//!
//! Every rule is a function from the incoming state to at most one
//! successor state per feasible branch; diagnostics are a side output
//! through the context. A rule that cannot classify its operand returns the
//! state unchanged — unresolvable values are "nothing to track", not
//! errors.

use ebb_exec::{eval_mul, CheckerContext, Condition, PathError, ProgramState};
use ebb_sym::{CallExpr, Loc, MemSpace, Region, SVal};

use crate::checker::AllocChecker;
use crate::state::{alloc_map, RefState};

impl AllocChecker {
    /// `malloc(size)`: allocate with undefined contents.
    pub(crate) fn malloc_mem(
        &self,
        call: &CallExpr,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        let size = call.arg(0).map_or(SVal::Unknown, |e| state.sval_of(e));
        if let Some(next) = self.malloc_mem_aux(call, size, SVal::Undefined, &state, ctx)? {
            ctx.add_transition(next);
        }
        Ok(())
    }

    /// An attribute-declared allocator: size from the attribute's argument
    /// index when it names one, unknown otherwise. Contents undefined.
    pub(crate) fn attr_alloc(
        &self,
        call: &CallExpr,
        size_arg: Option<u32>,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        let size = size_arg
            .and_then(|idx| call.arg(idx as usize))
            .map_or(SVal::Unknown, |e| state.sval_of(e));
        if let Some(next) = self.malloc_mem_aux(call, size, SVal::Undefined, &state, ctx)? {
            ctx.add_transition(next);
        }
        Ok(())
    }

    /// `calloc(count, element_size)`: allocate `count * element_size`
    /// zero-filled bytes. Overflow semantics belong to the engine's
    /// arithmetic, not to this rule.
    pub(crate) fn calloc_mem(
        &self,
        call: &CallExpr,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        let (Some(count_expr), Some(elem_expr)) = (call.arg(0), call.arg(1)) else {
            return Ok(());
        };
        let total = eval_mul(&state.sval_of(count_expr), &state.sval_of(elem_expr));
        if let Some(next) = self.malloc_mem_aux(call, total, SVal::Int(0), &state, ctx)? {
            ctx.add_transition(next);
        }
        Ok(())
    }

    /// The shared allocation rule: conjure a fresh symbol and region for
    /// the call's result, fill it with `init`, constrain its extent to the
    /// size when the size is defined, and start tracking the symbol as
    /// allocated-unchecked.
    ///
    /// Yields `None` only when the engine cannot produce a symbolic region
    /// for the result — nothing to track, not an error.
    pub(crate) fn malloc_mem_aux(
        &self,
        call: &CallExpr,
        size: SVal,
        init: SVal,
        state: &ProgramState,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<Option<ProgramState>, PathError> {
        let (symbol, region) = ctx.conjure_region();
        let ret = SVal::Loc(Loc::Region(region));

        let mut next = state.bind_expr(call.expr, ret);
        next = next.bind_default(region, init);
        // An added path constraint, not a hard failure: if the size is
        // unknowable the extent simply stays unconstrained.
        if size.is_defined() {
            next = next.set_extent(symbol, size);
        }

        let map = alloc_map(&next).enter(symbol, RefState::AllocatedUnchecked(ctx.point()))?;
        tracing::debug!(symbol = symbol.raw(), ?size, "tracking allocation");
        Ok(Some(next.set_slot(map)))
    }

    /// `free(ptr)`: terminal release of argument 0.
    pub(crate) fn free_mem(
        &self,
        call: &CallExpr,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        if let Some(next) = self.free_mem_aux(call, 0, &state, false, ctx)? {
            ctx.add_transition(next);
        }
        Ok(())
    }

    /// An attribute-declared deallocator releasing argument `arg`;
    /// `hold` releases non-terminally.
    pub(crate) fn attr_free(
        &self,
        call: &CallExpr,
        arg: u32,
        hold: bool,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        if let Some(next) = self.free_mem_aux(call, arg as usize, &state, hold, ctx)? {
            ctx.add_transition(next);
        }
        Ok(())
    }

    /// The shared deallocation rule.
    ///
    /// Yields the successor state to continue with, or `None` when the
    /// path was pruned (bad free, double free) — the caller must not
    /// commit anything after a `None`.
    pub(crate) fn free_mem_aux(
        &self,
        call: &CallExpr,
        arg_index: usize,
        state: &ProgramState,
        hold: bool,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<Option<ProgramState>, PathError> {
        let Some(arg_expr) = call.arg(arg_index) else {
            // An attribute can name an argument the call does not have.
            return Ok(Some(state.clone()));
        };
        let arg_val = state.sval_of(arg_expr);

        // Integers, unknown, and undefined values are not locations this
        // rule can say anything about; true null and garbage arguments are
        // other checkers' business.
        if !arg_val.is_loc() {
            return Ok(Some(state.clone()));
        }

        // Freeing null is defined and benign: the null branch is a no-op,
        // analysis continues on the non-null branch only.
        let branches = state.assume(&Condition::IsNull(arg_val), ctx.regions());
        let not_null = match (branches.if_false, branches.if_true) {
            (Some(not_null), _) => not_null,
            (None, Some(null_state)) => return Ok(Some(null_state)),
            (None, None) => return Ok(Some(state.clone())),
        };

        // Labels and literal addresses are locations without a region;
        // they never came from an allocator.
        let Some(arg_region) = arg_val.as_region() else {
            self.report_bad_free(&arg_val, &not_null, ctx);
            return Ok(None);
        };

        let base = ctx.regions().base_region(arg_region);

        // Blocks can surface as heap-looking data but must not be freed.
        if matches!(ctx.regions().region(base), Region::BlockData) {
            self.report_bad_free(&arg_val, &not_null, ctx);
            return Ok(None);
        }

        // Parameters, locals, statics, globals, and code shouldn't be
        // freed. Memory from outside the analyzed function lives in the
        // unknown space, so unknown must stay freeable: false negatives
        // over false positives.
        let space = ctx.regions().memory_space(base);
        if !matches!(space, MemSpace::Unknown | MemSpace::Heap) {
            self.report_bad_free(&arg_val, &not_null, ctx);
            return Ok(None);
        }

        let Region::Symbolic { symbol, .. } = ctx.regions().region(base) else {
            // Not a symbolic allocation: no claims about memory that did
            // not come from a tracked allocator.
            return Ok(Some(not_null));
        };
        let symbol = *symbol;

        let map = alloc_map(&not_null);
        let Some(entry) = map.get(symbol) else {
            // Untracked symbol, e.g. a pointer whose pointee was allocated
            // by a caller. Tracking it would need interprocedural analysis.
            return Ok(Some(not_null));
        };

        if entry.is_released() {
            self.report_double_free(&not_null, ctx);
            return Ok(None);
        }

        let released = if hold {
            RefState::Relinquished(ctx.point())
        } else {
            RefState::Released(ctx.point())
        };
        tracing::debug!(symbol = symbol.raw(), hold, "releasing allocation");
        let map = map.transition(symbol, released)?;
        Ok(Some(not_null.set_slot(map)))
    }

    /// `realloc(ptr, size)`: a three-way split.
    ///
    /// - `ptr == null`: exactly `malloc(size)`; a tracked null symbol is
    ///   marked released first so the null value itself never reads as a
    ///   leak.
    /// - `ptr != null, size == 0`: exactly `free(ptr)`, result undefined.
    /// - `ptr != null, size != 0`: `free(ptr)` then a fresh allocation of
    ///   the requested size. The old block's contents are not carried into
    ///   the new one.
    pub(crate) fn realloc_mem(
        &self,
        call: &CallExpr,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();
        let (Some(ptr_expr), Some(size_expr)) = (call.arg(0), call.arg(1)) else {
            return Ok(());
        };
        let ptr_val = state.sval_of(ptr_expr);

        let branches = state.assume(&Condition::IsNull(ptr_val), ctx.regions());

        if let Some(null_branch) = branches.if_true {
            let mut eq_state = null_branch;
            if let Some(symbol) = ctx.regions().loc_symbol_in_base(&ptr_val) {
                let map = alloc_map(&eq_state);
                if map.contains(symbol) {
                    let map = map.transition(symbol, RefState::Released(ctx.point()))?;
                    eq_state = eq_state.set_slot(map);
                }
            }
            let size = eq_state.sval_of(size_expr);
            if let Some(next) =
                self.malloc_mem_aux(call, size, SVal::Undefined, &eq_state, ctx)?
            {
                ctx.add_transition(next);
            }
        }

        if let Some(not_null) = branches.if_false {
            let size_val = not_null.sval_of(size_expr);
            let size_branches = not_null.assume(&Condition::IsZero(size_val), ctx.regions());

            if let Some(size_zero) = size_branches.if_true {
                if let Some(freed) = self.free_mem_aux(call, 0, &size_zero, false, ctx)? {
                    ctx.add_transition(freed.bind_expr(call.expr, SVal::Undefined));
                }
            }

            if let Some(size_nonzero) = size_branches.if_false {
                if let Some(freed) = self.free_mem_aux(call, 0, &size_nonzero, false, ctx)? {
                    let size = freed.sval_of(size_expr);
                    if let Some(next) =
                        self.malloc_mem_aux(call, size, SVal::Unknown, &freed, ctx)?
                    {
                        ctx.add_transition(next);
                    }
                }
            }
        }

        Ok(())
    }
}
