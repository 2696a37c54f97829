//! Report collection.

use crate::{BugKind, BugReport};

/// Where checkers send their reports.
///
/// The sink takes ownership of rendering, deduplication, and output; a
/// checker's obligation ends at `report`.
pub trait DiagnosticSink {
    fn report(&mut self, report: BugReport);
}

/// A sink that collects reports in order of emission.
#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    reports: Vec<BugReport>,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BugReport> {
        self.reports.iter()
    }

    /// Number of collected reports of `kind`.
    pub fn count_of(&self, kind: BugKind) -> usize {
        self.reports.iter().filter(|r| r.kind == kind).count()
    }

    /// Drain the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<BugReport> {
        std::mem::take(&mut self.reports)
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, report: BugReport) {
        self.reports.push(report);
    }
}
