use std::fmt;

/// Severity level for analyzer findings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// The defect classes the allocation checker reports.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BugKind {
    /// A released allocation was released again.
    DoubleFree,
    /// An allocation became unreachable or the path ended while it was
    /// still owned.
    Leak,
    /// A released allocation was dereferenced.
    UseAfterFree,
    /// Something that is not an owned heap allocation was released.
    BadFree,
}

impl fmt::Display for BugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BugKind::DoubleFree => write!(f, "double free"),
            BugKind::Leak => write!(f, "memory leak"),
            BugKind::UseAfterFree => write!(f, "use after free"),
            BugKind::BadFree => write!(f, "bad free"),
        }
    }
}

/// A bug category: the once-per-checker identity of a defect class.
///
/// Categories are constructed when a checker is built and reused for every
/// report of that kind; the per-occurrence data lives on
/// [`BugReport`](crate::BugReport). Categories are not shared across checker
/// instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BugCategory {
    pub kind: BugKind,
    pub severity: Severity,
    /// Short display name, e.g. "Double free".
    pub name: &'static str,
    /// Default description used when a report has no targeted message.
    pub description: &'static str,
}

impl BugCategory {
    /// Create a category with [`Severity::Warning`], the severity of every
    /// best-effort analyzer finding.
    pub fn new(kind: BugKind, name: &'static str, description: &'static str) -> Self {
        BugCategory {
            kind,
            severity: Severity::Warning,
            name,
            description,
        }
    }
}
