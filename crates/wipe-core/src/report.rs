//! Action and batch outcome types.

use serde::{Deserialize, Serialize};

use crate::element::ElementId;

/// Information about a registered action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    /// Unique name within the registry.
    pub name: String,

    /// Display title, also used as the transaction title.
    pub title: String,

    /// Human-readable description.
    pub description: String,

    /// Whether the action's effect is order-sensitive.
    pub is_dependent: bool,

    /// Whether the action was synthesized from document contents.
    #[serde(default)]
    pub generated: bool,
}

/// Why an element was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The validity predicate returned false.
    Rejected,
    /// The element is currently open in the UI.
    Open,
}

/// A deletion that failed without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementFailure {
    pub id: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
}

impl ElementFailure {
    /// Build a failure, flattening the message onto one line.
    pub fn new(id: ElementId, category: Option<String>, message: &str) -> Self {
        Self {
            id,
            category,
            message: normalize_message(message),
        }
    }
}

/// Per-element outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemovalResult {
    Removed,
    Skipped { reason: SkipReason },
    Failed { failure: ElementFailure },
}

/// Aggregated outcome of one action.
///
/// Built through [`BatchRecorder`]; read-only once finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    candidates: usize,
    removed: usize,
    skipped: usize,
    failed: Vec<ElementFailure>,
    outcomes: Vec<(ElementId, RemovalResult)>,
}

impl BatchReport {
    /// An empty report for actions that remove nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of elements handed to the batch.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// Deletions actually attempted (removed + failed).
    pub fn attempted(&self) -> usize {
        self.removed + self.failed.len()
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> &[ElementFailure] {
        &self.failed
    }

    pub fn outcomes(&self) -> &[(ElementId, RemovalResult)] {
        &self.outcomes
    }

    /// Outcome recorded for one element.
    pub fn outcome_of(&self, id: ElementId) -> Option<&RemovalResult> {
        self.outcomes
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, r)| r)
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Mutable accumulator for a [`BatchReport`].
#[derive(Debug, Default)]
pub struct BatchRecorder {
    report: BatchReport,
}

impl BatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ElementId, result: RemovalResult) {
        self.report.candidates += 1;
        match &result {
            RemovalResult::Removed => self.report.removed += 1,
            RemovalResult::Skipped { .. } => self.report.skipped += 1,
            RemovalResult::Failed { failure } => self.report.failed.push(failure.clone()),
        }
        self.report.outcomes.push((id, result));
    }

    pub fn finish(self) -> BatchReport {
        self.report
    }
}

/// Replace newlines with spaces and drop carriage returns.
pub fn normalize_message(message: &str) -> String {
    message.replace('\n', " ").replace('\r', "")
}
