//! Escape and rebinding tracking.
//!
//! A tracked pointer stored into storage that survives the function is no
//! longer this path's to leak-check: someone else can free it now. Storing
//! within the current frame's locals changes nothing — the path still owns
//! the allocation and a later missing free is still a leak.

use ebb_exec::{CheckerContext, Condition, PathError};
use ebb_sym::{ExprId, MemSpace, SVal};

use crate::checker::AllocChecker;
use crate::state::{alloc_map, RefState};

impl AllocChecker {
    /// A value is stored into a location.
    pub(crate) fn track_binding(
        &self,
        location: &SVal,
        value: &SVal,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let state = ctx.state().clone();

        if !location.is_loc() {
            return Ok(());
        }

        // Only stores of values we track are interesting.
        let Some(symbol) = ctx.regions().loc_symbol_in_base(value) else {
            return Ok(());
        };
        let map = alloc_map(&state);
        let Some(entry) = map.get(symbol).copied() else {
            return Ok(());
        };

        // A store through a null location performs nothing; record that
        // branch as a plain successor and track the binding on the other.
        let branches = state.assume(&Condition::IsNull(*location), ctx.regions());
        if let Some(null_state) = branches.if_true {
            ctx.add_transition(null_state);
        }
        let Some(not_null) = branches.if_false else {
            return Ok(());
        };

        let mut next = not_null.clone();
        if entry.is_allocated() {
            let Some(loc_region) = location.as_region() else {
                return Ok(());
            };
            let base = ctx.regions().base_region(loc_region);
            let in_frame_locals = ctx.regions().memory_space(base) == MemSpace::StackLocals;

            // Representable store outside the frame's locals: the pointer
            // escaped, relinquish so a never-observed free does not read
            // as a leak. An unrepresentable store leaks no ownership — the
            // binding is invisible to the rest of the path.
            if !in_frame_locals && not_null.bind_loc(location, SVal::Unknown).is_some() {
                tracing::debug!(symbol = symbol.raw(), "pointer escaped via store");
                let map = map.transition(symbol, RefState::Relinquished(ctx.point()))?;
                next = not_null.set_slot(map);
            }
        }
        ctx.add_transition(next);
        Ok(())
    }

    /// A return statement hands the returned allocation to the caller.
    pub(crate) fn return_escape(
        &self,
        ret: Option<ExprId>,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        let Some(ret_expr) = ret else {
            return Ok(());
        };
        let state = ctx.state().clone();
        let ret_val = state.sval_of(ret_expr);

        let Some(symbol) = ctx.regions().loc_symbol_in_base(&ret_val) else {
            return Ok(());
        };
        let map = alloc_map(&state);
        let Some(entry) = map.get(symbol) else {
            return Ok(());
        };

        let next = if entry.is_allocated() {
            tracing::debug!(symbol = symbol.raw(), "allocation escapes to caller");
            let map = map.transition(symbol, RefState::Escaped(ctx.point()))?;
            state.set_slot(map)
        } else {
            state
        };
        ctx.add_transition(next);
        Ok(())
    }
}
