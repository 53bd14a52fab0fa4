//! Action Registry
//!
//! Stores every invocable action by unique name:
//! - the static catalog, registered at initialization
//! - workset actions, generated from the document at initialization
//!
//! Names are unique. Registering a duplicate is a configuration error and
//! leaves the first registration in place.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use wipe_core::{ActionInfo, BatchReport, WipeConfig, WipeError, WipeResult};

use crate::action::Action;
use crate::catalog::catalog;
use crate::document::DocumentSession;
use crate::generator::workset_actions;

#[derive(Default)]
struct Entries {
    /// Actions by name.
    by_name: HashMap<String, Arc<Action>>,

    /// Names in registration order.
    order: Vec<String>,
}

impl Entries {
    fn insert(&mut self, action: Action) {
        let name = action.name().to_string();
        self.order.push(name.clone());
        self.by_name.insert(name, Arc::new(action));
    }
}

/// Registry for storing actions.
pub struct ActionRegistry {
    config: WipeConfig,
    entries: RwLock<Entries>,
}

impl ActionRegistry {
    /// Create a new empty registry.
    pub fn new(config: WipeConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Build the full registry for a document: the static catalog plus one
    /// action per user workset.
    pub fn initialize(document: &dyn DocumentSession, config: WipeConfig) -> WipeResult<Self> {
        let registry = Self::new(config);
        for action in catalog(&registry.config) {
            registry.register(action)?;
        }
        registry.generate_workset_actions(document)?;
        tracing::info!("Action registry initialized with {} actions", registry.len());
        Ok(registry)
    }

    pub fn config(&self) -> &WipeConfig {
        &self.config
    }

    /// Register an action.
    ///
    /// Returns an error if an action with the same name already exists.
    pub fn register(&self, action: Action) -> WipeResult<()> {
        let mut entries = self.entries.write();
        if entries.by_name.contains_key(action.name()) {
            return Err(WipeError::DuplicateActionName(action.name().to_string()));
        }
        tracing::info!("Registered action: {}", action.name());
        entries.insert(action);
        Ok(())
    }

    /// Generate and register the workset actions for a document.
    ///
    /// All-or-nothing: if any generated name collides, nothing is registered.
    /// Returns the names of the new actions.
    pub fn generate_workset_actions(
        &self,
        document: &dyn DocumentSession,
    ) -> WipeResult<Vec<String>> {
        let actions = workset_actions(document, &self.config)?;

        let mut entries = self.entries.write();
        let mut seen = std::collections::HashSet::new();
        for action in &actions {
            if entries.by_name.contains_key(action.name()) || !seen.insert(action.name()) {
                return Err(WipeError::DuplicateActionName(action.name().to_string()));
            }
        }

        let names: Vec<String> = actions.iter().map(|a| a.name().to_string()).collect();
        for action in actions {
            entries.insert(action);
        }
        Ok(names)
    }

    /// Drop previously generated actions and generate them again, e.g. after
    /// switching to another document.
    pub fn regenerate(&self, document: &dyn DocumentSession) -> WipeResult<Vec<String>> {
        {
            let mut entries = self.entries.write();
            let Entries { by_name, order } = &mut *entries;
            by_name.retain(|_, action| !action.is_generated());
            order.retain(|name| by_name.contains_key(name));
        }
        self.generate_workset_actions(document)
    }

    /// Get an action by name.
    pub fn get(&self, name: &str) -> Option<Arc<Action>> {
        self.entries.read().by_name.get(name).cloned()
    }

    /// Run an action by name.
    pub fn run(&self, name: &str, document: &dyn DocumentSession) -> WipeResult<BatchReport> {
        let action = self
            .get(name)
            .ok_or_else(|| WipeError::ActionNotFound(name.to_string()))?;
        action.run(document)
    }

    /// All actions, in registration order.
    pub fn actions(&self) -> Vec<Arc<Action>> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|name| entries.by_name.get(name).cloned())
            .collect()
    }

    /// Describe all actions, in registration order.
    pub fn list(&self) -> Vec<ActionInfo> {
        self.actions().iter().map(|a| a.info()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new(WipeConfig::default())
    }
}
