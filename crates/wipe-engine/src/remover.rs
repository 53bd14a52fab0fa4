//! Batch remover.
//!
//! The generic "collect, filter, remove" loop shared by every action.
//!
//! ## Fault Isolation
//!
//! Cleanup runs against documents with unpredictable cross-element
//! dependencies (a type cannot go before its last instance, a view owner
//! before its views, ...). A rejected deletion is recorded as `Failed` and
//! the loop moves on to the next candidate. Only fatal document errors
//! (connection loss) stop the batch, so the enclosing transaction can roll
//! back.

use std::collections::HashSet;

use wipe_core::{
    BatchRecorder, BatchReport, Element, ElementFailure, ElementId, RemovalResult, SkipReason,
    WipeError, WipeResult,
};

use crate::document::DocumentSession;

/// Formats the per-element log line.
pub type Describe = fn(&Element) -> String;

fn describe_by_id(element: &Element) -> String {
    format!("ID: {}", element.id)
}

/// Deletes a candidate set, one element at a time.
pub struct BatchRemover<'d, 'p> {
    document: &'d dyn DocumentSession,
    label: &'static str,
    exclude: HashSet<ElementId>,
    validity: Option<Box<dyn Fn(&Element) -> bool + 'p>>,
    describe: Describe,
}

impl<'d, 'p> BatchRemover<'d, 'p> {
    /// Create a remover. `label` names the element kind in log lines.
    pub fn new(document: &'d dyn DocumentSession, label: &'static str) -> Self {
        Self {
            document,
            label,
            exclude: HashSet::new(),
            validity: None,
            describe: describe_by_id,
        }
    }

    /// Never delete these ids, whatever the predicate says.
    pub fn excluding(mut self, ids: HashSet<ElementId>) -> Self {
        self.exclude = ids;
        self
    }

    /// Only delete elements for which `validity` returns true.
    pub fn only_if(mut self, validity: impl Fn(&Element) -> bool + 'p) -> Self {
        self.validity = Some(Box::new(validity));
        self
    }

    pub fn describe_with(mut self, describe: Describe) -> Self {
        self.describe = describe;
        self
    }

    /// Attempt to delete every qualifying candidate, in the order given.
    pub fn remove_all<I>(self, candidates: I) -> WipeResult<BatchReport>
    where
        I: IntoIterator<Item = Element>,
    {
        let mut recorder = BatchRecorder::new();

        for element in candidates {
            let result = self.remove_one(&element)?;
            recorder.record(element.id, result);
        }

        let report = recorder.finish();
        tracing::info!(
            "{}: {} removed, {} skipped, {} failed",
            self.label,
            report.removed(),
            report.skipped(),
            report.failed().len()
        );
        Ok(report)
    }

    fn remove_one(&self, element: &Element) -> WipeResult<RemovalResult> {
        if self.exclude.contains(&element.id) {
            tracing::debug!("{} {} is open, skipping", self.label, element.id);
            return Ok(RemovalResult::Skipped {
                reason: SkipReason::Open,
            });
        }

        if let Some(validity) = &self.validity {
            if !validity(element) {
                return Ok(RemovalResult::Skipped {
                    reason: SkipReason::Rejected,
                });
            }
        }

        tracing::debug!("{}", (self.describe)(element));

        match self.document.delete(element.id) {
            Ok(()) => Ok(RemovalResult::Removed),
            Err(e) if e.is_fatal() => {
                tracing::error!("Lost document while removing {}: {}", element.id, e);
                Err(WipeError::from_document(e))
            }
            Err(e) => {
                let failure = ElementFailure::new(
                    element.id,
                    element.category_name().map(str::to_owned),
                    &e.to_string(),
                );
                tracing::error!(
                    "Error Removing Element with Id: {} Type: {} | {}",
                    failure.id,
                    failure.category.as_deref().unwrap_or(self.label),
                    failure.message
                );
                Ok(RemovalResult::Failed { failure })
            }
        }
    }
}

/// Remove every candidate for which `validity` (when given) holds.
pub fn remove_all(
    document: &dyn DocumentSession,
    candidates: Vec<Element>,
    validity: Option<&dyn Fn(&Element) -> bool>,
) -> WipeResult<BatchReport> {
    let remover = BatchRemover::new(document, "Element");
    match validity {
        Some(validity) => remover.only_if(validity).remove_all(candidates),
        None => remover.remove_all(candidates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentQuery;
    use crate::memory::{DeletionFault, DocumentSnapshot, MemoryDocument};
    use crate::transaction::with_transaction;
    use wipe_core::{BuiltInCategory, DocumentError, ElementClass};

    fn room(id: i64, name: &str) -> Element {
        Element::new(id, ElementClass::Other, name).with_category(BuiltInCategory::Rooms, "Rooms")
    }

    fn document_with(elements: Vec<Element>, faults: Vec<DeletionFault>) -> MemoryDocument {
        MemoryDocument::new(DocumentSnapshot {
            elements,
            faults,
            ..Default::default()
        })
    }

    fn rooms(doc: &MemoryDocument) -> Vec<Element> {
        doc.elements_by_category(BuiltInCategory::Rooms).unwrap()
    }

    #[test]
    fn test_removes_everything_without_predicate() {
        let doc = document_with(vec![room(1, "A"), room(2, "B"), room(3, "C")], vec![]);

        let report =
            with_transaction(&doc, "Remove All Rooms", |d| remove_all(d, rooms(&doc), None))
                .unwrap();

        assert_eq!(report.candidates(), 3);
        assert_eq!(report.removed(), 3);
        assert!(report.is_clean());
        assert_eq!(doc.element_count(), 0);
    }

    #[test]
    fn test_predicate_false_is_never_removed() {
        let doc = document_with(vec![room(1, "Keep"), room(2, "Drop"), room(3, "Keep too")], vec![]);
        let keep: &dyn Fn(&Element) -> bool = &|e: &Element| !e.name.starts_with("Keep");

        let report = with_transaction(&doc, "Remove All Rooms", |d| {
            remove_all(d, rooms(&doc), Some(keep))
        })
        .unwrap();

        assert_eq!(report.removed(), 1);
        assert_eq!(report.skipped(), 2);
        assert!(doc.contains(ElementId(1)));
        assert!(!doc.contains(ElementId(2)));
        assert!(doc.contains(ElementId(3)));
        assert_eq!(
            report.skipped() + report.removed() + report.failed().len(),
            report.candidates()
        );
    }

    #[test]
    fn test_poisoned_element_does_not_stop_batch() {
        let elements: Vec<Element> = (1..=5).map(|i| room(i, "R")).collect();
        let fault = DeletionFault {
            id: ElementId(3),
            message: "Element is referenced\nby a schedule".to_string(),
            fatal: false,
        };
        let doc = document_with(elements, vec![fault]);

        let report =
            with_transaction(&doc, "Remove All Rooms", |d| remove_all(d, rooms(&doc), None))
                .unwrap();

        assert_eq!(report.removed(), 4);
        assert_eq!(report.failed().len(), 1);
        let failure = &report.failed()[0];
        assert_eq!(failure.id, ElementId(3));
        assert_eq!(failure.category.as_deref(), Some("Rooms"));
        assert!(!failure.message.contains('\n'));
        assert!(failure.message.contains("Element is referenced by a schedule"));
        assert_eq!(doc.stats().commits, 1);
    }

    #[test]
    fn test_excluded_ids_skipped_regardless_of_predicate() {
        let doc = document_with(vec![room(1, "A"), room(2, "B")], vec![]);
        let open: HashSet<ElementId> = [ElementId(2)].into_iter().collect();

        let report = with_transaction(&doc, "Remove All Rooms", |d| {
            BatchRemover::new(d, "Room")
                .excluding(open)
                .only_if(|_| true)
                .remove_all(rooms(&doc))
        })
        .unwrap();

        assert_eq!(report.removed(), 1);
        assert_eq!(
            report.outcome_of(ElementId(2)),
            Some(&RemovalResult::Skipped {
                reason: SkipReason::Open
            })
        );
        assert!(doc.contains(ElementId(2)));
    }

    #[test]
    fn test_fatal_fault_aborts_and_rolls_back() {
        let fault = DeletionFault {
            id: ElementId(2),
            message: "host went away".to_string(),
            fatal: true,
        };
        let doc = document_with(vec![room(1, "A"), room(2, "B"), room(3, "C")], vec![fault]);

        let result =
            with_transaction(&doc, "Remove All Rooms", |d| remove_all(d, rooms(&doc), None));

        assert!(matches!(result, Err(WipeError::TransactionAborted { .. })));
        // Rolled back: the first deletion is undone.
        assert_eq!(doc.element_count(), 3);
        assert_eq!(doc.stats().rollbacks, 1);
    }

    #[test]
    fn test_deletion_outside_transaction_is_recorded() {
        let doc = document_with(vec![room(1, "A")], vec![]);

        let report = remove_all(&doc, rooms(&doc), None).unwrap();

        assert_eq!(report.failed().len(), 1);
        assert_eq!(
            report.failed()[0].message,
            DocumentError::NoTransaction.to_string()
        );
    }
}
