//! Wipe engine.
//!
//! This crate provides the bulk cleanup machinery:
//! - Document session traits and an in-memory document
//! - Transaction scopes that roll back unless committed
//! - A batch remover that isolates per-element failures
//! - The static action catalog and workset action generation
//! - The action registry and dependency-ordered execution

pub mod action;
pub mod catalog;
pub mod document;
pub mod generator;
pub mod memory;
pub mod orderer;
pub mod registry;
pub mod remover;
pub mod transaction;

// Re-export commonly used types
pub use action::{Action, ActionBody};
pub use catalog::{catalog, is_removable_view};
pub use document::{DocumentQuery, DocumentSession};
pub use generator::{workset_action, workset_action_name, workset_actions, WORKSET_TEMPLATE_NAME};
pub use memory::{DeletionFault, DocumentSnapshot, MemoryDocument, SessionStats, SnapshotError};
pub use orderer::{dependency_order, ActionOutcome, Orchestrator};
pub use registry::ActionRegistry;
pub use remover::{remove_all, BatchRemover, Describe};
pub use transaction::{with_transaction, TransactionScope};

// Re-export wipe_core types for convenience
pub use wipe_core::{
    ActionInfo, BatchReport, DocumentError, Element, ElementId, RemovalResult, WipeConfig,
    WipeError, WipeResult,
};
