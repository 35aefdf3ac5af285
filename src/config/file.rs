//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files. Discovery is deliberately
//! small: an explicit path wins, otherwise the current directory is searched
//! for the standard file names.

use std::path::{Path, PathBuf};

use crate::error::{BomGraphError, Result};

use super::types::AppConfig;
use super::validation::Validatable;

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".bom-graph.yaml",
    ".bom-graph.yml",
    "bom-graph.yaml",
    "bom-graph.yml",
];

/// Discover a config file.
///
/// An explicit path is returned when it exists; otherwise the current
/// directory is searched for the standard names.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILE_NAMES {
            let path = cwd.join(name);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).map_err(|e| BomGraphError::io(path.to_path_buf(), e))?;
    let config: AppConfig = serde_yaml::from_str(&content)
        .map_err(|e| BomGraphError::config(format!("parsing {}: {e}", path.display())))?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load the discovered config file, or fall back to defaults.
pub fn load_or_default(explicit_path: Option<&Path>) -> Result<AppConfig> {
    match discover_config_file(explicit_path) {
        Some(path) => load_config(&path),
        None => Ok(AppConfig::default()),
    }
}
