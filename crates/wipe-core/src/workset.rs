//! Workset types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Workset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorksetId(pub i64);

impl fmt::Display for WorksetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of workset. Only user worksets get generated removal actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorksetKind {
    #[default]
    User,
    Family,
    Standard,
    View,
}

/// A named partition of elements, discovered on workshared documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workset {
    pub id: WorksetId,
    pub name: String,
    #[serde(default)]
    pub kind: WorksetKind,
}

impl Workset {
    pub fn user(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: WorksetId(id),
            name: name.into(),
            kind: WorksetKind::User,
        }
    }
}
