//! Shared test utilities for the allocation checker.
//!
//! The `Harness` plays the engine driver: it fires one checker event at a
//! time and hands back the committed nodes, leaving the test to thread
//! successor states by hand the way exploration would.

use ebb_diagnostic::DiagnosticQueue;
use ebb_exec::{
    AccessKind, Checker, CheckerContext, Condition, ExecContext, PathNode, ProgramState,
    SymbolReaper,
};
use ebb_sym::{
    CallExpr, ExprId, FnDecl, FnDeclId, OwnershipAttr, ProgPoint, SVal, Span, Symbol,
};

use crate::state::{alloc_map, RefState};
use crate::AllocChecker;

/// Shorthand for `ExprId::from_raw(n)`.
pub(crate) fn e(n: u32) -> ExprId {
    ExprId::from_raw(n)
}

/// The nodes one checker event committed.
pub(crate) struct EventOutcome {
    pub(crate) claimed: bool,
    pub(crate) nodes: Vec<PathNode>,
}

impl EventOutcome {
    /// Non-sink successor states, in commit order.
    pub(crate) fn successors(&self) -> Vec<ProgramState> {
        self.nodes
            .iter()
            .filter(|n| !n.is_sink())
            .map(|n| n.state.clone())
            .collect()
    }

    /// The single non-sink successor this event must have produced.
    pub(crate) fn sole_successor(&self) -> ProgramState {
        let succ = self.successors();
        assert_eq!(succ.len(), 1, "expected exactly one successor");
        succ.into_iter().next().unwrap()
    }

    pub(crate) fn sink_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_sink()).count()
    }
}

pub(crate) struct Harness {
    pub(crate) ecx: ExecContext,
    pub(crate) sink: DiagnosticQueue,
    pub(crate) checker: AllocChecker,
    next_point: u32,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let ecx = ExecContext::new();
        let checker = AllocChecker::new(ecx.interner());
        Harness {
            ecx,
            sink: DiagnosticQueue::new(),
            checker,
            next_point: 0,
        }
    }

    pub(crate) fn declare(&mut self, name: &str) -> FnDeclId {
        let name = self.ecx.name(name);
        self.ecx.declare_fn(FnDecl::new(name))
    }

    pub(crate) fn declare_with_attrs(
        &mut self,
        name: &str,
        attrs: impl IntoIterator<Item = OwnershipAttr>,
    ) -> FnDeclId {
        let name = self.ecx.name(name);
        let mut decl = FnDecl::new(name);
        for attr in attrs {
            decl = decl.with_attr(attr);
        }
        self.ecx.declare_fn(decl)
    }

    fn run<R>(
        &mut self,
        state: &ProgramState,
        f: impl FnOnce(&AllocChecker, &mut CheckerContext<'_>) -> R,
    ) -> (R, Vec<PathNode>) {
        self.next_point += 1;
        let point = ProgPoint::new(
            self.next_point,
            Span::new(self.next_point * 10, self.next_point * 10 + 4),
        );
        let Harness {
            ecx, sink, checker, ..
        } = self;
        let mut ctx = CheckerContext::new(ecx, sink, state.clone(), point);
        let result = f(checker, &mut ctx);
        (result, ctx.into_nodes())
    }

    pub(crate) fn eval_call(&mut self, state: &ProgramState, call: &CallExpr) -> EventOutcome {
        let (claimed, nodes) = self.run(state, |c, ctx| c.eval_call(call, ctx).unwrap());
        EventOutcome { claimed, nodes }
    }

    pub(crate) fn bind(
        &mut self,
        state: &ProgramState,
        location: SVal,
        value: SVal,
    ) -> EventOutcome {
        let ((), nodes) = self.run(state, |c, ctx| {
            c.check_bind(&location, &value, ctx).unwrap();
        });
        EventOutcome {
            claimed: true,
            nodes,
        }
    }

    pub(crate) fn access(&mut self, state: &ProgramState, location: SVal) -> EventOutcome {
        let ((), nodes) = self.run(state, |c, ctx| {
            c.check_location(&location, AccessKind::Load, ctx).unwrap();
        });
        EventOutcome {
            claimed: true,
            nodes,
        }
    }

    pub(crate) fn dead_sweep(&mut self, state: &ProgramState, dead: &[Symbol]) -> EventOutcome {
        let reaper: SymbolReaper = dead.iter().copied().collect();
        let ((), nodes) = self.run(state, |c, ctx| {
            c.check_dead_symbols(&reaper, ctx).unwrap();
        });
        EventOutcome {
            claimed: true,
            nodes,
        }
    }

    pub(crate) fn end_path(&mut self, state: &ProgramState) -> EventOutcome {
        let ((), nodes) = self.run(state, |c, ctx| c.check_end_path(ctx).unwrap());
        EventOutcome {
            claimed: true,
            nodes,
        }
    }

    pub(crate) fn pre_return(&mut self, state: &ProgramState, ret: Option<ExprId>) -> EventOutcome {
        let ((), nodes) = self.run(state, |c, ctx| c.check_pre_return(ret, ctx).unwrap());
        EventOutcome {
            claimed: true,
            nodes,
        }
    }

    /// Branch the state on `cond`, pick the `want_true` side, and let the
    /// checker react to the committed constraint — the engine's assume
    /// sequence. Returns `None` when that side is infeasible.
    pub(crate) fn assume_and_commit(
        &mut self,
        state: &ProgramState,
        cond: &Condition,
        want_true: bool,
    ) -> Option<ProgramState> {
        let branches = state.assume(cond, self.ecx.regions());
        let chosen = if want_true {
            branches.if_true
        } else {
            branches.if_false
        }?;
        Some(
            self.checker
                .eval_assume(chosen, cond, want_true, self.ecx.regions())
                .unwrap(),
        )
    }

    /// The symbol conjured for a call result bound at `expr`.
    pub(crate) fn result_symbol(&self, state: &ProgramState, expr: ExprId) -> Symbol {
        self.ecx
            .regions()
            .loc_symbol_in_base(&state.sval_of(expr))
            .unwrap()
    }

    /// The tracked lifecycle state of `symbol`, if any.
    pub(crate) fn tracked(&self, state: &ProgramState, symbol: Symbol) -> Option<RefState> {
        alloc_map(state).get(symbol).copied()
    }
}
