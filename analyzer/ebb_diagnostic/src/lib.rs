//! Diagnostics for the Ebb analyzer.
//!
//! Checkers describe what they found; this crate gives that description a
//! shape the surrounding driver can render:
//!
//! - [`BugKind`] — the closed set of defect classes checkers report.
//! - [`BugCategory`] — one per kind per checker instance, constructed once
//!   and reused across reports; carries the kind's display name and default
//!   description.
//! - [`BugReport`] — one per occurrence, anchored to the path node the
//!   checker committed when it found the defect, with an optional source
//!   range.
//! - [`DiagnosticSink`] / [`DiagnosticQueue`] — where reports go. Rendering,
//!   deduplication, and output belong to the consumer of the queue, not to
//!   this crate.

mod category;
mod queue;
mod report;

pub use category::{BugCategory, BugKind, Severity};
pub use queue::{DiagnosticQueue, DiagnosticSink};
pub use report::BugReport;
