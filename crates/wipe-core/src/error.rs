//! Error types for the Wipe engine.

use thiserror::Error;

use crate::element::ElementId;

/// Errors reported by the host document boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// No active document session.
    #[error("No active document")]
    Unavailable,

    /// The connection to the document was lost mid-operation.
    #[error("Document connection lost: {0}")]
    ConnectionLost(String),

    #[error("Element {0} not found")]
    ElementNotFound(ElementId),

    /// The host refused to delete an element.
    #[error("Cannot delete element {id}: {message}")]
    DeleteRejected { id: ElementId, message: String },

    /// A transaction is already open.
    #[error("A transaction is already active")]
    TransactionActive,

    /// Mutation attempted outside a transaction.
    #[error("No active transaction")]
    NoTransaction,

    /// The host rejected a posted command.
    #[error("Command rejected: {0}")]
    CommandRejected(String),
}

impl DocumentError {
    /// Faults that stop the whole batch rather than a single element.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DocumentError::Unavailable | DocumentError::ConnectionLost(_)
        )
    }
}

/// Engine errors - surfaced to the invocation surface.
#[derive(Debug, Error)]
pub enum WipeError {
    #[error("Document unavailable")]
    DocumentUnavailable,

    /// The action cannot run against the document in its current state.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Action '{0}' is already registered")]
    DuplicateActionName(String),

    #[error("Action '{0}' not found")]
    ActionNotFound(String),

    /// Workset actions were required on a document that is not workshared.
    #[error("Document is not workshared")]
    NotWorkshared,

    /// The transaction was rolled back by an unrecoverable fault.
    #[error("Transaction '{title}' aborted: {reason}")]
    TransactionAborted { title: String, reason: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl WipeError {
    /// Map a document error, collapsing a missing session to `DocumentUnavailable`.
    pub fn from_document(err: DocumentError) -> Self {
        match err {
            DocumentError::Unavailable => WipeError::DocumentUnavailable,
            other => WipeError::Document(other),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for engine operations.
pub type WipeResult<T> = Result<T, WipeError>;
