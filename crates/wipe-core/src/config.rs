//! Configuration types.
//!
//! The reserved literals used by the cleanup actions can be overridden from
//! `config.toml`. Every field has a default matching the host's conventions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Runtime configuration for the action catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WipeConfig {
    /// Group types in this category survive group removal.
    pub preserved_group_category: String,

    /// Materials whose name contains this (case-insensitive) survive.
    pub protected_material_substring: String,

    /// Name of the default 3D view, never removed.
    pub default_3d_view_name: String,

    /// Views whose name contains this marker are treated as reserved.
    pub reserved_view_marker: String,

    /// Fail registry initialization on documents without worksets.
    pub require_worksets: bool,
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            preserved_group_category: "Attached Detail Groups".to_string(),
            protected_material_substring: "poche".to_string(),
            default_3d_view_name: "{3D}".to_string(),
            reserved_view_marker: "<".to_string(),
            require_worksets: false,
        }
    }
}

impl WipeConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wipe"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WipeConfig::default();
        assert_eq!(config.preserved_group_category, "Attached Detail Groups");
        assert_eq!(config.protected_material_substring, "poche");
        assert_eq!(config.default_3d_view_name, "{3D}");
        assert_eq!(config.reserved_view_marker, "<");
        assert!(!config.require_worksets);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WipeConfig::from_toml("require_worksets = true\n").unwrap();
        assert!(config.require_worksets);
        assert_eq!(config.protected_material_substring, "poche");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "protected_material_substring = \"keep\"").unwrap();

        let config = WipeConfig::load(file.path()).unwrap();
        assert_eq!(config.protected_material_substring, "keep");
    }

    #[test]
    fn test_parse_error() {
        let result = WipeConfig::from_toml("require_worksets = \"maybe\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WipeConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
