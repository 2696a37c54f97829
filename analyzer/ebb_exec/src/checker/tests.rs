use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use ebb_diagnostic::DiagnosticQueue;
use ebb_sym::{CallExpr, ExprId, ProgPoint};

use super::{Checker, CheckerRegistry, Subscriptions};
use crate::{CheckerContext, ExecContext, PathError, ProgramState};

/// Claims every call and counts how often it was offered one.
struct ClaimingChecker {
    offered: Rc<Cell<u32>>,
}

impl Checker for ClaimingChecker {
    fn name(&self) -> &'static str {
        "claiming"
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::EVAL_CALL
    }

    fn eval_call(&self, _call: &CallExpr, ctx: &mut CheckerContext<'_>) -> Result<bool, PathError> {
        self.offered.set(self.offered.get() + 1);
        ctx.add_transition(ctx.state().clone());
        Ok(true)
    }
}

/// Subscribes to end-path only; counts every event it receives.
struct CountingChecker {
    events: Rc<Cell<u32>>,
}

impl Checker for CountingChecker {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::END_PATH
    }

    fn eval_call(
        &self,
        _call: &CallExpr,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<bool, PathError> {
        self.events.set(self.events.get() + 1);
        Ok(true)
    }

    fn check_end_path(&self, _ctx: &mut CheckerContext<'_>) -> Result<(), PathError> {
        self.events.set(self.events.get() + 1);
        Ok(())
    }
}

#[test]
fn dispatch_respects_subscriptions() {
    let offered = Rc::new(Cell::new(0));
    let events = Rc::new(Cell::new(0));

    let mut registry = CheckerRegistry::new();
    registry.register(Box::new(CountingChecker {
        events: Rc::clone(&events),
    }));
    registry.register(Box::new(ClaimingChecker {
        offered: Rc::clone(&offered),
    }));
    assert_eq!(registry.len(), 2);

    let mut ecx = ExecContext::new();
    let mut sink = DiagnosticQueue::new();
    let call = CallExpr::new(ExprId::from_raw(0), None, []);

    let mut ctx = CheckerContext::new(&mut ecx, &mut sink, ProgramState::new(), ProgPoint::DUMMY);
    let claimed = registry.eval_call(&call, &mut ctx);
    assert_eq!(claimed, Ok(true));
    // The counting checker is not subscribed to calls: only the claiming
    // checker saw it, even though both implement eval_call.
    assert_eq!(offered.get(), 1);
    assert_eq!(events.get(), 0);

    let mut ctx = CheckerContext::new(&mut ecx, &mut sink, ProgramState::new(), ProgPoint::DUMMY);
    assert_eq!(registry.check_end_path(&mut ctx), Ok(()));
    assert_eq!(events.get(), 1);
}

#[test]
fn first_claim_stops_call_dispatch() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let mut registry = CheckerRegistry::new();
    registry.register(Box::new(ClaimingChecker {
        offered: Rc::clone(&first),
    }));
    registry.register(Box::new(ClaimingChecker {
        offered: Rc::clone(&second),
    }));

    let mut ecx = ExecContext::new();
    let mut sink = DiagnosticQueue::new();
    let call = CallExpr::new(ExprId::from_raw(0), None, []);
    let mut ctx = CheckerContext::new(&mut ecx, &mut sink, ProgramState::new(), ProgPoint::DUMMY);

    let claimed = registry.eval_call(&call, &mut ctx);
    assert_eq!(claimed, Ok(true));
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}
