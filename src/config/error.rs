//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Why an [`EngineConfig`](super::EngineConfig) could not be loaded or was
/// rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A setting parsed but would make the engine misbehave
    #[error("invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ConfigError {
    /// Dotted path of the offending setting, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
