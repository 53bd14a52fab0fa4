//! Transaction scope.
//!
//! One action maps to one host transaction. The scope guarantees exactly one
//! `begin` and exactly one terminal `commit` or `rollback` per invocation,
//! on every exit path including unwinding.
//!
//! Per-element deletion failures do not roll anything back: the batch remover
//! records them and the scope still commits. Only errors returned by the body
//! (connection loss, a query that cannot run) roll the transaction back.

use wipe_core::{DocumentError, WipeError, WipeResult};

use crate::document::DocumentSession;

/// RAII guard around an open host transaction.
///
/// Dropping the guard without calling [`commit`](Self::commit) or
/// [`abort`](Self::abort) rolls the transaction back.
pub struct TransactionScope<'d> {
    document: &'d dyn DocumentSession,
    title: String,
    open: bool,
}

impl<'d> TransactionScope<'d> {
    /// Begin a named transaction.
    pub fn begin(document: &'d dyn DocumentSession, title: impl Into<String>) -> WipeResult<Self> {
        let title = title.into();
        match document.begin_transaction(&title) {
            Ok(()) => {
                tracing::debug!("Transaction started: {}", title);
                Ok(Self {
                    document,
                    title,
                    open: true,
                })
            }
            Err(DocumentError::Unavailable) => Err(WipeError::DocumentUnavailable),
            Err(e) => Err(WipeError::TransactionAborted {
                title,
                reason: e.to_string(),
            }),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Commit the transaction.
    ///
    /// A failed commit is terminal too; the host owns the transaction state
    /// afterwards, so no rollback is attempted.
    pub fn commit(mut self) -> WipeResult<()> {
        self.open = false;
        match self.document.commit_transaction() {
            Ok(()) => {
                tracing::debug!("Transaction committed: {}", self.title);
                Ok(())
            }
            Err(e) => Err(WipeError::TransactionAborted {
                title: self.title.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Roll the transaction back.
    pub fn abort(mut self, reason: &str) {
        self.open = false;
        tracing::warn!("Rolling back '{}': {}", self.title, reason);
        self.rollback();
    }

    fn rollback(&self) {
        if let Err(e) = self.document.rollback_transaction() {
            tracing::error!("Rollback of '{}' failed: {}", self.title, e);
        }
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            tracing::warn!("Transaction '{}' dropped while open, rolling back", self.title);
            self.rollback();
        }
    }
}

/// Run `body` inside a named transaction.
///
/// Commits when the body returns `Ok`. An `Err` from the body rolls back and
/// surfaces as [`WipeError::TransactionAborted`].
pub fn with_transaction<T, F>(document: &dyn DocumentSession, title: &str, body: F) -> WipeResult<T>
where
    F: FnOnce(&dyn DocumentSession) -> WipeResult<T>,
{
    let scope = TransactionScope::begin(document, title)?;

    match body(document) {
        Ok(value) => {
            scope.commit()?;
            Ok(value)
        }
        Err(err) => {
            let reason = err.to_string();
            scope.abort(&reason);
            Err(match err {
                WipeError::TransactionAborted { .. } => err,
                _ => WipeError::TransactionAborted {
                    title: title.to_string(),
                    reason,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::mock::MockSession;
    use crate::memory::{DocumentSnapshot, MemoryDocument};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn counting_document() -> MemoryDocument {
        MemoryDocument::new(DocumentSnapshot::default())
    }

    #[test]
    fn test_commit_on_success() {
        let mut session = MockSession::new();
        session
            .expect_begin_transaction()
            .times(1)
            .returning(|_| Ok(()));
        session
            .expect_commit_transaction()
            .times(1)
            .returning(|| Ok(()));
        session.expect_rollback_transaction().times(0);

        let value = with_transaction(&session, "Remove All Rooms", |_| Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_rollback_on_body_error() {
        let mut session = MockSession::new();
        session
            .expect_begin_transaction()
            .times(1)
            .returning(|_| Ok(()));
        session.expect_commit_transaction().times(0);
        session
            .expect_rollback_transaction()
            .times(1)
            .returning(|| Ok(()));

        let result: WipeResult<()> = with_transaction(&session, "Remove All Rooms", |_| {
            Err(DocumentError::ConnectionLost("pipe closed".to_string()).into())
        });

        match result {
            Err(WipeError::TransactionAborted { title, reason }) => {
                assert_eq!(title, "Remove All Rooms");
                assert!(reason.contains("pipe closed"));
            }
            other => panic!("Expected TransactionAborted, got {:?}", other),
        }
    }

    #[test]
    fn test_begin_on_missing_document() {
        let mut session = MockSession::new();
        session
            .expect_begin_transaction()
            .times(1)
            .returning(|_| Err(DocumentError::Unavailable));
        session.expect_commit_transaction().times(0);
        session.expect_rollback_transaction().times(0);

        let result = with_transaction(&session, "Remove All Rooms", |_| Ok(()));
        assert!(matches!(result, Err(WipeError::DocumentUnavailable)));
    }

    #[test]
    fn test_one_begin_one_commit_per_scope() {
        let doc = counting_document();

        with_transaction(&doc, "first", |_| Ok(())).unwrap();
        with_transaction(&doc, "second", |_| Ok(())).unwrap();

        let stats = doc.stats();
        assert_eq!(stats.begins, 2);
        assert_eq!(stats.commits, 2);
        assert_eq!(stats.rollbacks, 0);
        assert_eq!(stats.transaction_titles, vec!["first", "second"]);
    }

    #[test]
    fn test_early_error_return_rolls_back_once() {
        let doc = counting_document();

        let result: WipeResult<()> = with_transaction(&doc, "early", |_| {
            Err(WipeError::PreconditionFailed("stop".to_string()))
        });
        assert!(matches!(result, Err(WipeError::TransactionAborted { .. })));

        let stats = doc.stats();
        assert_eq!(stats.begins, 1);
        assert_eq!(stats.commits, 0);
        assert_eq!(stats.rollbacks, 1);
    }

    #[test]
    fn test_panic_rolls_back_once() {
        let doc = counting_document();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _: WipeResult<()> = with_transaction(&doc, "panics", |_| panic!("boom"));
        }));
        assert!(outcome.is_err());

        let stats = doc.stats();
        assert_eq!(stats.begins, 1);
        assert_eq!(stats.commits, 0);
        assert_eq!(stats.rollbacks, 1);
        assert!(!doc.in_transaction());
    }

    #[test]
    fn test_nested_scope_is_rejected() {
        let doc = counting_document();

        let result = with_transaction(&doc, "outer", |doc| {
            with_transaction(doc, "inner", |_| Ok(()))
        });

        // Inner begin fails, the outer body returns that error and rolls back.
        assert!(matches!(result, Err(WipeError::TransactionAborted { .. })));
        let stats = doc.stats();
        assert_eq!(stats.begins, 1);
        assert_eq!(stats.rollbacks, 1);
    }
}
