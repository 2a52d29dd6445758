//! Persistence layer for console configuration.
//!
//! Provides RON-based save/load for [`ConsoleConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::core::ConsoleConfig;

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "console.ron";

impl ConsoleConfig {
    /// Load config from a RON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save config to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::Io(parent.display().to_string(), e.to_string()))?;
            }
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load config from file, returning default if it can't be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error (path, message).
    Io(String, String),
    /// Parse error (path, message).
    Parse(String, String),
    /// Serialization error.
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "IO error for '{}': {}", path, msg),
            ConfigError::Parse(path, msg) => write!(f, "Parse error for '{}': {}", path, msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resource tracking the config file the console was built from.
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub PathBuf);

impl Default for ConfigPath {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

/// Read the config at `path`, logging and falling back to defaults when it
/// is missing or invalid.
pub fn load_config(path: &Path) -> ConsoleConfig {
    if !path.exists() {
        info!("No console config found at '{}', using defaults", path.display());
        return ConsoleConfig::default();
    }

    match ConsoleConfig::load(path) {
        Ok(config) => {
            info!("Loaded console config from '{}'", path.display());
            config
        }
        Err(e) => {
            error!("Failed to load console config: {}", e);
            ConsoleConfig::default()
        }
    }
}
