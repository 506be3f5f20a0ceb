//! Configuration management for the lab.

use std::env;
use std::path::PathBuf;

/// Lab configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that holds the `.ser` blobs
    pub data_dir: PathBuf,
    /// Optional registry document replacing the built-in demo types
    pub schema_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("OBJSTREAM_DATA_DIR").unwrap_or_else(|| "resources".to_string());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        let schema_path = match lookup("OBJSTREAM_SCHEMA") {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptySchemaPath),
            Some(path) => Some(PathBuf::from(path)),
            None => None,
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            schema_path,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OBJSTREAM_DATA_DIR must not be empty")]
    EmptyDataDir,

    #[error("OBJSTREAM_SCHEMA is set but empty")]
    EmptySchemaPath,
}
