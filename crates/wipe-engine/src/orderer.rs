//! Dependency ordering and serialized execution.
//!
//! Independent actions run first, dependent ones last. Within each group the
//! incoming order is kept. One action failing does not stop the next one.

use parking_lot::Mutex;
use std::sync::Arc;

use wipe_core::{BatchReport, WipeError, WipeResult};

use crate::action::Action;
use crate::document::DocumentSession;
use crate::registry::ActionRegistry;

/// Stable partition: independent actions, then dependent actions.
pub fn dependency_order(actions: Vec<Arc<Action>>) -> Vec<Arc<Action>> {
    let (mut ordered, dependent): (Vec<_>, Vec<_>) =
        actions.into_iter().partition(|a| !a.is_dependent());
    ordered.extend(dependent);
    ordered
}

/// Result of one action in a sequence.
#[derive(Debug)]
pub struct ActionOutcome {
    pub name: String,
    pub result: WipeResult<BatchReport>,
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs registry actions one at a time against a document.
///
/// The document session is single-threaded; every run takes the gate, so
/// concurrent callers are serialized.
pub struct Orchestrator {
    registry: Arc<ActionRegistry>,
    gate: Mutex<()>,
}

impl Orchestrator {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self {
            registry,
            gate: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run a single action by name.
    pub fn run(&self, name: &str, document: &dyn DocumentSession) -> WipeResult<BatchReport> {
        let _gate = self.gate.lock();
        self.registry.run(name, document)
    }

    /// Run the named actions exactly in the given order.
    pub fn run_named(&self, names: &[String], document: &dyn DocumentSession) -> Vec<ActionOutcome> {
        let _gate = self.gate.lock();
        names
            .iter()
            .map(|name| ActionOutcome {
                name: name.clone(),
                result: self.registry.run(name, document),
            })
            .collect()
    }

    /// Run the named actions in dependency order.
    ///
    /// Unknown names are reported as `ActionNotFound` after the known ones.
    pub fn run_ordered(
        &self,
        names: &[String],
        document: &dyn DocumentSession,
    ) -> Vec<ActionOutcome> {
        let mut actions = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            match self.registry.get(name) {
                Some(action) => actions.push(action),
                None => missing.push(name.clone()),
            }
        }

        let _gate = self.gate.lock();
        let mut outcomes = run_sequence(dependency_order(actions), document);
        outcomes.extend(missing.into_iter().map(|name| ActionOutcome {
            result: Err(WipeError::ActionNotFound(name.clone())),
            name,
        }));
        outcomes
    }

    /// Run every registered action in dependency order.
    pub fn run_all(&self, document: &dyn DocumentSession) -> Vec<ActionOutcome> {
        let actions = dependency_order(self.registry.actions());
        let _gate = self.gate.lock();
        run_sequence(actions, document)
    }
}

fn run_sequence(actions: Vec<Arc<Action>>, document: &dyn DocumentSession) -> Vec<ActionOutcome> {
    actions
        .iter()
        .map(|action| {
            let result = action.run(document);
            if let Err(e) = &result {
                tracing::warn!("Continuing after '{}' failed: {}", action.name(), e);
            }
            ActionOutcome {
                name: action.name().to_string(),
                result,
            }
        })
        .collect()
}
