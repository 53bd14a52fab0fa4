//! Core types for the Wipe document-cleanup engine.
//!
//! This crate contains shared data structures used across all Wipe crates:
//! - Element and workset types mirrored from the host document
//! - Batch reports and action descriptions
//! - Configuration types
//! - Error types

mod config;
mod element;
mod error;
mod report;
mod workset;

pub use config::{config_dir, config_path, WipeConfig};
pub use element::{
    BuiltInCategory, Category, Element, ElementClass, ElementId, ParamValue, ViewData, ViewKind,
};
pub use error::{ConfigError, DocumentError, WipeError, WipeResult};
pub use report::{
    normalize_message, ActionInfo, BatchRecorder, BatchReport, ElementFailure, RemovalResult,
    SkipReason,
};
pub use workset::{Workset, WorksetId, WorksetKind};
