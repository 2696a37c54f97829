use ebb_sym::{NodeId, Span};

use crate::{BugCategory, BugKind, Severity};

/// One defect occurrence, anchored to a path node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "reports should be handed to a sink, not silently dropped"]
pub struct BugReport {
    pub kind: BugKind,
    pub severity: Severity,
    /// One-line classification, from the category name.
    pub title: &'static str,
    /// Human-readable description of this occurrence.
    pub message: String,
    /// The path node the reporting checker committed for this finding.
    pub anchor: NodeId,
    /// Source range of the offending expression, when known.
    pub span: Option<Span>,
}

impl BugReport {
    /// A report carrying its category's default description.
    pub fn new(category: &BugCategory, anchor: NodeId) -> Self {
        BugReport {
            kind: category.kind,
            severity: category.severity,
            title: category.name,
            message: category.description.to_owned(),
            anchor,
            span: None,
        }
    }

    /// A report with a targeted, per-occurrence message.
    pub fn with_message(category: &BugCategory, message: String, anchor: NodeId) -> Self {
        BugReport {
            message,
            ..BugReport::new(category, anchor)
        }
    }

    /// Attach the source range of the offending expression.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}
