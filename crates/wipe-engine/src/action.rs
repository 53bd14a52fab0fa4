//! The action abstraction.
//!
//! An action is a named, described, dependency-tagged unit of cleanup work.
//! The body receives the document session explicitly; actions never reach for
//! a process-wide document.

use std::fmt;
use std::sync::Arc;

use wipe_core::{ActionInfo, BatchReport, WipeResult};

use crate::document::DocumentSession;

/// Action body: performs one cleanup operation against a document.
pub type ActionBody = Arc<dyn Fn(&dyn DocumentSession) -> WipeResult<BatchReport> + Send + Sync>;

/// A registered unit of cleanup work.
#[derive(Clone)]
pub struct Action {
    name: String,
    title: String,
    description: String,
    is_dependent: bool,
    generated: bool,
    body: ActionBody,
}

impl Action {
    /// Create an independent action.
    pub fn new<F>(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        body: F,
    ) -> Self
    where
        F: Fn(&dyn DocumentSession) -> WipeResult<BatchReport> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            is_dependent: false,
            generated: false,
            body: Arc::new(body),
        }
    }

    /// Mark the action as order-sensitive.
    ///
    /// Metadata only: nothing in the action or the registry enforces it.
    pub fn dependent(mut self) -> Self {
        self.is_dependent = true;
        self
    }

    /// Mark the action as synthesized from document contents.
    pub(crate) fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_dependent(&self) -> bool {
        self.is_dependent
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn info(&self) -> ActionInfo {
        ActionInfo {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            is_dependent: self.is_dependent,
            generated: self.generated,
        }
    }

    /// Run the action against a document.
    pub fn run(&self, document: &dyn DocumentSession) -> WipeResult<BatchReport> {
        tracing::info!("Running action '{}': {}", self.name, self.title);
        let result = (self.body)(document);
        match &result {
            Ok(report) => tracing::info!(
                "Action '{}' finished: {} removed, {} skipped, {} failed",
                self.name,
                report.removed(),
                report.skipped(),
                report.failed().len()
            ),
            Err(e) => tracing::error!("Action '{}' failed: {}", self.name, e),
        }
        result
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("is_dependent", &self.is_dependent)
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}
