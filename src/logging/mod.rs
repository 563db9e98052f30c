//! Structured logging setup
//!
//! Every module logs through `tracing` with structured fields (`booking_id`,
//! `driver_id`, `subsystem`). This module turns a [`LoggingConfig`] into an
//! `EnvFilter` and installs a pretty or JSON subscriber. Logs go to stderr so
//! CLI output on stdout stays machine-readable.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the `EnvFilter` directive string for a [`LoggingConfig`].
///
/// # Examples
///
/// ```
/// use sentinel::config::LoggingConfig;
/// use sentinel::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config
///     .component_levels
///     .insert("dispatch".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,sentinel::dispatch=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();
    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",sentinel::{}={}", component, level));
    }
    filter_str
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_base_level_only() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_component_levels_sorted() {
        let levels = BTreeMap::from([
            ("health".to_string(), "warn".to_string()),
            ("dispatch".to_string(), "trace".to_string()),
            ("orchestrator".to_string(), "debug".to_string()),
        ]);

        let config = LoggingConfig {
            component_levels: levels,
            ..LoggingConfig::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,sentinel::dispatch=trace,sentinel::health=warn,sentinel::orchestrator=debug"
        );
    }

    #[test]
    fn test_directives_parse_as_env_filter() {
        let levels = BTreeMap::from([("pricing".to_string(), "debug".to_string())]);
        let config = LoggingConfig {
            component_levels: levels,
            ..LoggingConfig::default()
        };
        assert!(EnvFilter::try_new(build_filter_directives(&config)).is_ok());
    }
}
