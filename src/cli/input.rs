//! Loading engine configuration and JSON inputs for CLI commands

use crate::cli::EngineArgs;
use crate::config::{ConfigError, EngineConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A file holding either one record or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Load the engine configuration for a command.
///
/// A missing file falls back to defaults; a present but invalid file is an
/// error. Environment overrides and `--log-level` are applied on top.
pub fn load_engine_config(args: &EngineArgs) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match EngineConfig::load(Some(&args.config)) {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => EngineConfig::default(),
        Err(e) => return Err(e.into()),
    };
    let mut config = config.with_env_overrides();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Read a JSON value from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
    Ok(value)
}

/// Read a file holding one record or an array of records.
pub fn read_json_list<T: DeserializeOwned>(
    path: &Path,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    Ok(match read_json::<OneOrMany<T>>(path)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}
