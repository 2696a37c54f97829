//! Heap allocation lifecycle checker.
//!
//! Tracks every allocation a path obtains from `malloc`/`calloc`/`realloc`
//! (or from a function carrying an ownership-transfer attribute) through a
//! per-symbol lifecycle lattice, and reports:
//!
//! - **double free** — releasing an already-released allocation;
//! - **use after free** — dereferencing a released allocation;
//! - **bad free** — releasing something that is not an owned heap
//!   allocation (a stack address, a global, a function pointer, …);
//! - **leak** — an allocation still owned when it becomes unreachable or
//!   the path ends.
//!
//! The lattice ([`RefState`]) lives in a persistent map ([`AllocMap`])
//! stored in the path state's checker slot, so forking a path shares the
//! whole map and updating it copies only the touched entries.
//!
//! Double free and bad free prune their path (continuing with a corrupted
//! allocator model would be unsound); leaks and use-after-free are
//! informational and the path continues. The checker is deliberately
//! conservative toward false negatives: whenever a value, region, or
//! attribute is too imprecise to classify, the rule is a no-op rather than
//! a report.

mod checker;
mod classify;
mod escape;
mod reclaim;
mod report;
mod state;
mod transitions;

pub use checker::AllocChecker;
pub use state::{alloc_map, AllocMap, RefState};

#[cfg(test)]
mod test_helpers;
