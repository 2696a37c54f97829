//! Dead-symbol reclamation and end-of-path leak detection.

use ebb_diagnostic::BugReport;
use ebb_exec::{CheckerContext, PathError, SymbolReaper};

use crate::checker::AllocChecker;
use crate::state::alloc_map;

impl AllocChecker {
    /// A batch of symbols became unreachable: anything still owned among
    /// them leaked. Every dead symbol leaves the map regardless of state,
    /// and exactly one successor carries the pruned map.
    pub(crate) fn reap_dead_symbols(
        &self,
        reaper: &SymbolReaper,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        if !reaper.has_dead_symbols() {
            return Ok(());
        }

        let state = ctx.state().clone();
        let snapshot = alloc_map(&state);
        let mut map = snapshot.clone();
        let mut leaked = 0u32;
        let mut pruned = 0u32;

        for (symbol, entry) in snapshot.iter() {
            if !reaper.is_dead(symbol) {
                continue;
            }
            if entry.is_allocated() {
                if let Some(node) = ctx.generate_node(state.clone()) {
                    ctx.report(BugReport::new(&self.categories.leak, node));
                }
                leaked += 1;
            }
            map = map.remove(symbol)?;
            pruned += 1;
        }

        tracing::debug!(pruned, leaked, "dead-symbol sweep");
        ctx.add_transition(state.set_slot(map));
        Ok(())
    }

    /// The path ended: every allocation still owned is a leak. The map is
    /// left alone — nothing runs after this on the path.
    pub(crate) fn end_path_leaks(&self, ctx: &mut CheckerContext<'_>) -> Result<(), PathError> {
        let state = ctx.state().clone();
        let map = alloc_map(&state);

        for (symbol, entry) in map.iter() {
            if entry.is_allocated() {
                tracing::debug!(symbol = symbol.raw(), "allocation leaked at path end");
                if let Some(node) = ctx.generate_node(state.clone()) {
                    ctx.report(BugReport::new(&self.categories.leak, node));
                }
            }
        }
        Ok(())
    }
}
