//! Logging configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Engine modules that accept their own log level under
/// `[logging.component_levels]`.
pub const LOG_COMPONENTS: &[&str] = &[
    "advisory",
    "cli",
    "dispatch",
    "health",
    "orchestrator",
    "pricing",
    "registry",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format '{}', expected pretty or json", s)),
        }
    }
}

/// Where engine logs go and how loud each module is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for every target
    pub level: String,
    pub format: LogFormat,
    /// Per-module overrides keyed by engine module, e.g. `dispatch = "debug"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Reject levels `tracing` cannot parse and components the engine does
    /// not have.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LevelFilter::from_str(&self.level).is_err() {
            return Err(ConfigError::Validation {
                field: "logging.level".to_string(),
                message: format!("unknown level '{}'", self.level),
            });
        }

        for (component, level) in &self.component_levels {
            let field = format!("logging.component_levels.{}", component);
            if !LOG_COMPONENTS.contains(&component.as_str()) {
                return Err(ConfigError::Validation {
                    field,
                    message: format!("no such module, expected one of {}", LOG_COMPONENTS.join(", ")),
                });
            }
            if LevelFilter::from_str(level).is_err() {
                return Err(ConfigError::Validation {
                    field,
                    message: format!("unknown level '{}'", level),
                });
            }
        }

        Ok(())
    }
}
