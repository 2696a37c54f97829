//! The checker interface and registry.
//!
//! A checker subscribes to the analysis events it cares about via a
//! capability-flag set, and the registry dispatches each event to exactly
//! the subscribers that asked for it. Checkers are pure with respect to
//! paths: every callback maps an incoming immutable state to zero or more
//! successor states through the [`CheckerContext`].

use bitflags::bitflags;

use ebb_sym::{CallExpr, ExprId, RegionTable, SVal};

use crate::context::CheckerContext;
use crate::error::PathError;
use crate::reaper::SymbolReaper;
use crate::state::{Condition, ProgramState};

bitflags! {
    /// The analysis events a checker can subscribe to.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Subscriptions: u8 {
        /// Call-evaluation: the checker may claim and model a call.
        const EVAL_CALL = 1 << 0;
        /// A value is stored into a location.
        const BIND = 1 << 1;
        /// A location is loaded from or stored through.
        const LOCATION = 1 << 2;
        /// A batch of symbols became unreachable.
        const DEAD_SYMBOLS = 1 << 3;
        /// A path reached the end of the analyzed function.
        const END_PATH = 1 << 4;
        /// A return statement is about to execute.
        const PRE_RETURN = 1 << 5;
        /// The engine committed a new path constraint.
        const ASSUME = 1 << 6;
    }
}

/// Whether a location access reads or writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Load,
    Store,
}

/// One checker plugged into the analysis.
///
/// Default implementations are no-ops so a checker only writes the events
/// it subscribes to. Every callback may fail with a [`PathError`], which
/// aborts the path — never silently continue on a broken invariant.
pub trait Checker {
    /// Stable name for logging.
    fn name(&self) -> &'static str;

    /// The events this checker subscribes to.
    fn subscriptions(&self) -> Subscriptions;

    /// Claim and model a call. Returns `true` if this checker evaluated
    /// the call; the registry stops dispatching it once claimed.
    fn eval_call(
        &self,
        _call: &CallExpr,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<bool, PathError> {
        Ok(false)
    }

    /// A value is stored into a location.
    fn check_bind(
        &self,
        _location: &SVal,
        _value: &SVal,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        Ok(())
    }

    /// A location is accessed.
    fn check_location(
        &self,
        _location: &SVal,
        _access: AccessKind,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        Ok(())
    }

    /// A batch of symbols is no longer reachable on this path.
    fn check_dead_symbols(
        &self,
        _reaper: &SymbolReaper,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        Ok(())
    }

    /// The path reached function end with no further successors.
    fn check_end_path(&self, _ctx: &mut CheckerContext<'_>) -> Result<(), PathError> {
        Ok(())
    }

    /// A return statement is about to execute; `ret` is the returned
    /// expression, if any.
    fn check_pre_return(
        &self,
        _ret: Option<ExprId>,
        _ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        Ok(())
    }

    /// The engine committed `cond` (with truth `assumption`) to the path.
    /// The checker may reclassify its tracked values in the returned state.
    fn eval_assume(
        &self,
        state: ProgramState,
        _cond: &Condition,
        _assumption: bool,
        _regions: &RegionTable,
    ) -> Result<ProgramState, PathError> {
        Ok(state)
    }
}

/// Composes checkers and routes each event to its subscribers.
#[derive(Default)]
pub struct CheckerRegistry {
    checkers: Vec<Box<dyn Checker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, checker: Box<dyn Checker>) {
        tracing::debug!(checker = checker.name(), "registering checker");
        self.checkers.push(checker);
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    fn subscribers(&self, event: Subscriptions) -> impl Iterator<Item = &dyn Checker> {
        self.checkers
            .iter()
            .map(|c| &**c)
            .filter(move |c| c.subscriptions().contains(event))
    }

    /// Offer a call to subscribers until one claims it.
    pub fn eval_call(
        &self,
        call: &CallExpr,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<bool, PathError> {
        for checker in self.subscribers(Subscriptions::EVAL_CALL) {
            if checker.eval_call(call, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn check_bind(
        &self,
        location: &SVal,
        value: &SVal,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        for checker in self.subscribers(Subscriptions::BIND) {
            checker.check_bind(location, value, ctx)?;
        }
        Ok(())
    }

    pub fn check_location(
        &self,
        location: &SVal,
        access: AccessKind,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        for checker in self.subscribers(Subscriptions::LOCATION) {
            checker.check_location(location, access, ctx)?;
        }
        Ok(())
    }

    pub fn check_dead_symbols(
        &self,
        reaper: &SymbolReaper,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        for checker in self.subscribers(Subscriptions::DEAD_SYMBOLS) {
            checker.check_dead_symbols(reaper, ctx)?;
        }
        Ok(())
    }

    pub fn check_end_path(&self, ctx: &mut CheckerContext<'_>) -> Result<(), PathError> {
        for checker in self.subscribers(Subscriptions::END_PATH) {
            checker.check_end_path(ctx)?;
        }
        Ok(())
    }

    pub fn check_pre_return(
        &self,
        ret: Option<ExprId>,
        ctx: &mut CheckerContext<'_>,
    ) -> Result<(), PathError> {
        for checker in self.subscribers(Subscriptions::PRE_RETURN) {
            checker.check_pre_return(ret, ctx)?;
        }
        Ok(())
    }

    /// Thread a freshly constrained state through every subscriber.
    pub fn eval_assume(
        &self,
        mut state: ProgramState,
        cond: &Condition,
        assumption: bool,
        regions: &RegionTable,
    ) -> Result<ProgramState, PathError> {
        for checker in self.subscribers(Subscriptions::ASSUME) {
            state = checker.eval_assume(state, cond, assumption, regions)?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests;
