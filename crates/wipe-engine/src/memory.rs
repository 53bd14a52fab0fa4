//! In-memory document.
//!
//! A `DocumentSession` backed by a JSON snapshot. It follows the host rules
//! the engine relies on:
//! - mutations need an open transaction, and only one may be open
//! - rollback restores the elements captured at `begin`
//! - an element type still used by an instance cannot be deleted
//! - ungrouping deletes the group instance and releases its members
//!
//! Deletion faults can be injected per element, either recoverable (the host
//! refuses the deletion) or fatal (connection loss).

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use wipe_core::{
    BuiltInCategory, DocumentError, Element, ElementClass, ElementId, Workset, WorksetId,
};

use crate::document::{DocumentQuery, DocumentSession};

/// A deletion the document will refuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionFault {
    pub id: ElementId,
    pub message: String,
    /// Report connection loss instead of a rejected deletion.
    #[serde(default)]
    pub fatal: bool,
}

/// Serializable document contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_name: Option<String>,

    #[serde(default)]
    pub workshared: bool,

    #[serde(default)]
    pub worksets: Vec<Workset>,

    #[serde(default)]
    pub elements: Vec<Element>,

    /// Views open in the UI.
    #[serde(default)]
    pub open_views: Vec<ElementId>,

    #[serde(default)]
    pub external_references: Vec<ElementId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<DeletionFault>,
}

/// Call counters, for asserting transaction discipline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub deletions: usize,
    pub purge_requests: usize,
    pub transaction_titles: Vec<String>,
}

/// Errors loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

struct OpenTransaction {
    saved: Vec<Element>,
}

struct State {
    snapshot: DocumentSnapshot,
    connected: bool,
    transaction: Option<OpenTransaction>,
    stats: SessionStats,
}

impl State {
    fn check_connected(&self) -> Result<(), DocumentError> {
        if self.connected {
            Ok(())
        } else {
            Err(DocumentError::Unavailable)
        }
    }

    fn check_transaction(&self) -> Result<(), DocumentError> {
        self.check_connected()?;
        if self.transaction.is_some() {
            Ok(())
        } else {
            Err(DocumentError::NoTransaction)
        }
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.snapshot.elements.iter().position(|e| e.id == id)
    }

    fn select(&self, pred: impl Fn(&Element) -> bool) -> Result<Vec<Element>, DocumentError> {
        self.check_connected()?;
        Ok(self
            .snapshot
            .elements
            .iter()
            .filter(|e| pred(e))
            .cloned()
            .collect())
    }
}

/// A document held entirely in memory.
pub struct MemoryDocument {
    state: Mutex<State>,
}

impl MemoryDocument {
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        Self {
            state: Mutex::new(State {
                snapshot,
                connected: true,
                transaction: None,
                stats: SessionStats::default(),
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the current contents as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let text = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.state.lock().snapshot.clone()
    }

    pub fn stats(&self) -> SessionStats {
        self.state.lock().stats.clone()
    }

    /// Drop the session; every later call fails with `Unavailable`.
    pub fn disconnect(&self) {
        self.state.lock().connected = false;
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.state.lock().position(id).is_some()
    }

    pub fn element_count(&self) -> usize {
        self.state.lock().snapshot.elements.len()
    }

    pub fn in_transaction(&self) -> bool {
        self.state.lock().transaction.is_some()
    }
}

impl DocumentQuery for MemoryDocument {
    fn elements_by_category(
        &self,
        category: BuiltInCategory,
    ) -> Result<Vec<Element>, DocumentError> {
        self.state
            .lock()
            .select(|e| !e.is_type && e.in_category(category))
    }

    fn elements_by_class(&self, class: ElementClass) -> Result<Vec<Element>, DocumentError> {
        self.state.lock().select(|e| e.class == class)
    }

    fn element(&self, id: ElementId) -> Result<Option<Element>, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        Ok(state.position(id).map(|i| state.snapshot.elements[i].clone()))
    }

    fn open_view_ids(&self) -> Result<HashSet<ElementId>, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        Ok(state.snapshot.open_views.iter().copied().collect())
    }

    fn is_workshared(&self) -> Result<bool, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        Ok(state.snapshot.workshared)
    }

    fn worksets(&self) -> Result<Vec<Workset>, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        if !state.snapshot.workshared {
            return Ok(Vec::new());
        }
        Ok(state.snapshot.worksets.clone())
    }

    fn elements_on_workset(&self, workset: WorksetId) -> Result<Vec<Element>, DocumentError> {
        self.state.lock().select(|e| e.workset == Some(workset))
    }

    fn path_name(&self) -> Result<Option<String>, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        Ok(state.snapshot.path_name.clone())
    }

    fn external_file_references(&self) -> Result<Vec<ElementId>, DocumentError> {
        let state = self.state.lock();
        state.check_connected()?;
        Ok(state.snapshot.external_references.clone())
    }
}

impl DocumentSession for MemoryDocument {
    fn begin_transaction(&self, title: &str) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.check_connected()?;
        if state.transaction.is_some() {
            return Err(DocumentError::TransactionActive);
        }
        let saved = state.snapshot.elements.clone();
        state.transaction = Some(OpenTransaction { saved });
        state.stats.begins += 1;
        state.stats.transaction_titles.push(title.to_string());
        Ok(())
    }

    fn commit_transaction(&self) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.check_transaction()?;
        state.transaction = None;
        state.stats.commits += 1;
        Ok(())
    }

    fn rollback_transaction(&self) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.check_connected()?;
        let open = state
            .transaction
            .take()
            .ok_or(DocumentError::NoTransaction)?;
        state.snapshot.elements = open.saved;
        state.stats.rollbacks += 1;
        Ok(())
    }

    fn delete(&self, id: ElementId) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.check_transaction()?;

        if let Some(fault) = state.snapshot.faults.iter().find(|f| f.id == id) {
            return Err(if fault.fatal {
                DocumentError::ConnectionLost(fault.message.clone())
            } else {
                DocumentError::DeleteRejected {
                    id,
                    message: fault.message.clone(),
                }
            });
        }

        let index = state
            .position(id)
            .ok_or(DocumentError::ElementNotFound(id))?;

        let users = state
            .snapshot
            .elements
            .iter()
            .filter(|e| e.type_id == Some(id))
            .count();
        if users > 0 {
            return Err(DocumentError::DeleteRejected {
                id,
                message: format!("element type is still used by {} instance(s)", users),
            });
        }

        state.snapshot.elements.remove(index);
        state.stats.deletions += 1;
        Ok(())
    }

    fn ungroup(&self, group: ElementId) -> Result<Vec<ElementId>, DocumentError> {
        let mut state = self.state.lock();
        state.check_transaction()?;

        let index = state
            .position(group)
            .ok_or(DocumentError::ElementNotFound(group))?;
        if state.snapshot.elements[index].class != ElementClass::Group {
            return Err(DocumentError::DeleteRejected {
                id: group,
                message: "element is not a group".to_string(),
            });
        }

        let removed = state.snapshot.elements.remove(index);
        Ok(removed.members)
    }

    fn post_purge_unused(&self) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.check_connected()?;
        state.stats.purge_requests += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wipe_core::ViewKind;

    fn sample() -> DocumentSnapshot {
        DocumentSnapshot {
            path_name: Some("C:/models/tower.rvt".to_string()),
            elements: vec![
                Element::new(10, ElementClass::GroupType, "Desk Cluster").as_type(),
                Element::new(11, ElementClass::Group, "Desk Cluster 1"),
                Element::new(20, ElementClass::View, "Level 1").with_view(ViewKind::FloorPlan, false),
            ],
            open_views: vec![ElementId(20)],
            ..Default::default()
        }
    }

    #[test]
    fn test_delete_requires_transaction() {
        let doc = MemoryDocument::new(sample());
        assert_eq!(doc.delete(ElementId(20)), Err(DocumentError::NoTransaction));
    }

    #[test]
    fn test_type_in_use_is_rejected() {
        let mut snapshot = sample();
        snapshot.elements[1].type_id = Some(ElementId(10));
        let doc = MemoryDocument::new(snapshot);

        doc.begin_transaction("t").unwrap();
        let err = doc.delete(ElementId(10)).unwrap_err();
        assert!(matches!(err, DocumentError::DeleteRejected { .. }));

        // Once the instance is gone the type can go.
        doc.ungroup(ElementId(11)).unwrap();
        doc.delete(ElementId(10)).unwrap();
        doc.commit_transaction().unwrap();
        assert_eq!(doc.element_count(), 1);
    }

    #[test]
    fn test_rollback_restores_elements() {
        let doc = MemoryDocument::new(sample());

        doc.begin_transaction("t").unwrap();
        doc.delete(ElementId(20)).unwrap();
        assert!(!doc.contains(ElementId(20)));
        doc.rollback_transaction().unwrap();

        assert!(doc.contains(ElementId(20)));
        assert_eq!(doc.stats().rollbacks, 1);
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let doc = MemoryDocument::new(sample());
        doc.begin_transaction("a").unwrap();
        assert_eq!(
            doc.begin_transaction("b"),
            Err(DocumentError::TransactionActive)
        );
        assert_eq!(doc.stats().begins, 1);
    }

    #[test]
    fn test_disconnected_document_is_unavailable() {
        let doc = MemoryDocument::new(sample());
        doc.disconnect();
        assert_eq!(doc.path_name(), Err(DocumentError::Unavailable));
        assert_eq!(
            doc.begin_transaction("t"),
            Err(DocumentError::Unavailable)
        );
    }

    #[test]
    fn test_category_query_skips_types() {
        let mut snapshot = sample();
        snapshot.elements.push(
            Element::new(30, ElementClass::Other, "Room")
                .with_category(BuiltInCategory::Rooms, "Rooms"),
        );
        snapshot.elements.push(
            Element::new(31, ElementClass::Other, "Room Tag Type")
                .with_category(BuiltInCategory::Rooms, "Rooms")
                .as_type(),
        );
        let doc = MemoryDocument::new(snapshot);

        let rooms = doc.elements_by_category(BuiltInCategory::Rooms).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, ElementId(30));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let doc = MemoryDocument::new(sample());
        doc.save(&path).unwrap();

        let loaded = MemoryDocument::load(&path).unwrap();
        assert_eq!(loaded.snapshot(), sample());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let result = MemoryDocument::from_json("{ not json");
        assert!(matches!(result, Err(SnapshotError::Json(_))));
    }
}
