//! Document boundary.
//!
//! The host document is an external collaborator. The engine only sees it
//! through these two traits:
//! - `DocumentQuery` - read-only snapshots (the query facade)
//! - `DocumentSession` - transactions and mutation
//!
//! Every call may fail; `DocumentError::Unavailable` means there is no
//! active session at all.

use std::collections::HashSet;

use wipe_core::{
    BuiltInCategory, DocumentError, Element, ElementClass, ElementId, Workset, WorksetId,
};

/// Read-only view over the host document.
pub trait DocumentQuery {
    /// Element instances in a category (element types excluded).
    fn elements_by_category(&self, category: BuiltInCategory)
        -> Result<Vec<Element>, DocumentError>;

    /// Every element of a class, types included.
    fn elements_by_class(&self, class: ElementClass) -> Result<Vec<Element>, DocumentError>;

    /// Look up a single element.
    fn element(&self, id: ElementId) -> Result<Option<Element>, DocumentError>;

    /// Ids of views currently open in the UI.
    fn open_view_ids(&self) -> Result<HashSet<ElementId>, DocumentError>;

    fn is_workshared(&self) -> Result<bool, DocumentError>;

    fn worksets(&self) -> Result<Vec<Workset>, DocumentError>;

    fn elements_on_workset(&self, workset: WorksetId) -> Result<Vec<Element>, DocumentError>;

    /// Persisted path, `None` for documents never saved.
    fn path_name(&self) -> Result<Option<String>, DocumentError>;

    /// Ids recorded as external file references (links, imports).
    fn external_file_references(&self) -> Result<Vec<ElementId>, DocumentError>;
}

/// Mutating session over the host document.
pub trait DocumentSession: DocumentQuery {
    fn begin_transaction(&self, title: &str) -> Result<(), DocumentError>;

    fn commit_transaction(&self) -> Result<(), DocumentError>;

    fn rollback_transaction(&self) -> Result<(), DocumentError>;

    /// Delete one element. Requires an active transaction.
    fn delete(&self, id: ElementId) -> Result<(), DocumentError>;

    /// Detach the members of a group instance, returning their ids.
    fn ungroup(&self, group: ElementId) -> Result<Vec<ElementId>, DocumentError>;

    /// Ask the host to run its "purge unused" command once control returns.
    fn post_purge_unused(&self) -> Result<(), DocumentError>;
}
