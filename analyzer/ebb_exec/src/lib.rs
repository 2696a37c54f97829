//! Path-sensitive execution boundary for the Ebb analyzer.
//!
//! The surrounding driver explores one candidate execution trace ("path") at
//! a time; this crate defines everything a checker sees of that exploration:
//!
//! - [`ProgramState`] — the immutable per-path state: expression bindings,
//!   the store, region extents, nullness constraints, and an extensible slot
//!   map where each checker keeps its own persistent data. Every update is
//!   functional; forking a path is an O(1) clone with structural sharing.
//! - [`Condition`] / [`BranchStates`] — the branching primitive: assuming a
//!   condition yields the (possibly absent) constrained true and false
//!   states.
//! - [`ExecContext`] / [`CheckerContext`] — the per-analysis supplies
//!   (regions, declarations, symbols, node ids, interner) and the per-event
//!   view a checker works through: state access, transitions, sinks,
//!   reports.
//! - [`Checker`] / [`CheckerRegistry`] — the capability-flag subscription
//!   interface and the registry that composes subscribers per event.
//! - [`SymbolReaper`] — the dead-symbol batch announced when tracked values
//!   become unreachable on a path.
//! - [`PathError`] — internal contract violations, fatal to the path and
//!   distinct from analysis diagnostics.

pub mod checker;
pub mod context;
pub mod error;
pub mod reaper;
pub mod state;

pub use checker::{AccessKind, Checker, CheckerRegistry, Subscriptions};
pub use context::{CheckerContext, ExecContext, NodeKind, PathNode};
pub use error::PathError;
pub use reaper::SymbolReaper;
pub use state::{eval_mul, BranchStates, Condition, Nullness, ProgramState};
