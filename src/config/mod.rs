//! Configuration module for Sentinel
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SENTINEL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sentinel::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.health_check.interval_seconds, 60);
//!
//! let toml = r#"
//! [pricing]
//! per_mile_rate = "4.25"
//! "#;
//! let config: EngineConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.pricing.per_mile_rate.to_string(), "4.25");
//! ```

pub mod error;
pub mod logging;
pub mod matching;
pub mod orchestrator;
pub mod pricing;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig, LOG_COMPONENTS};
pub use matching::{MatchWeights, MatchingConfig, PerformanceWeights};
pub use orchestrator::OrchestratorConfig;
pub use pricing::{PricingConfig, SurgeConfig};

// Re-export HealthThresholds from health module
pub use crate::health::HealthThresholds;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the booking decision engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Fare calculation rates and surge windows
    pub pricing: PricingConfig,
    /// Driver scoring weights and ETA model
    pub matching: MatchingConfig,
    /// Fan-out deadlines and advisory tuning
    pub orchestrator: OrchestratorConfig,
    /// Health monitor configuration
    pub health_check: HealthThresholds,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports SENTINEL_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("SENTINEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SENTINEL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(health) = std::env::var("SENTINEL_HEALTH_CHECK") {
            self.health_check.enabled = health.to_lowercase() == "true";
        }
        if let Ok(interval) = std::env::var("SENTINEL_HEALTH_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.health_check.interval_seconds = secs;
            }
        }
        if let Ok(timeout) = std::env::var("SENTINEL_TASK_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.orchestrator.task_timeout_ms = ms;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pricing = &self.pricing;

        let non_negative = [
            ("pricing.per_mile_rate", pricing.per_mile_rate),
            ("pricing.minimum_fare", pricing.minimum_fare),
            ("pricing.security_premium_rate", pricing.security_premium_rate),
            (
                "pricing.waiting_rate_per_minute",
                pricing.waiting_rate_per_minute,
            ),
            ("pricing.vat_rate", pricing.vat_rate),
            (
                "pricing.default_airport_surcharge",
                pricing.default_airport_surcharge,
            ),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
        }

        if pricing.fallback_fare <= Decimal::ZERO {
            return Err(ConfigError::Validation {
                field: "pricing.fallback_fare".to_string(),
                message: "fallback fare must be positive".to_string(),
            });
        }

        for (code, fee) in &pricing.airport_surcharges {
            if *fee < Decimal::ZERO {
                return Err(ConfigError::Validation {
                    field: format!("pricing.airport_surcharges.{}", code),
                    message: "must not be negative".to_string(),
                });
            }
        }

        if !(pricing.max_distance_miles.is_finite() && pricing.max_distance_miles > 0.0) {
            return Err(ConfigError::Validation {
                field: "pricing.max_distance_miles".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if pricing.min_passengers == 0 || pricing.min_passengers > pricing.max_passengers {
            return Err(ConfigError::Validation {
                field: "pricing.min_passengers".to_string(),
                message: "passenger range must be non-empty and start at 1 or more".to_string(),
            });
        }

        let surge = &pricing.surge;
        for (field, value) in [
            ("pricing.surge.weekend", surge.weekend),
            ("pricing.surge.night", surge.night),
            ("pricing.surge.peak", surge.peak),
        ] {
            if value < Decimal::ONE {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "multiplier must be at least 1.0".to_string(),
                });
            }
        }

        self.matching
            .weights
            .validate()
            .map_err(|message| ConfigError::Validation {
                field: "matching.weights".to_string(),
                message,
            })?;

        if !(self.matching.distance_horizon_km > 0.0) {
            return Err(ConfigError::Validation {
                field: "matching.distance_horizon_km".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !(self.matching.base_speed_kmh > 0.0) {
            return Err(ConfigError::Validation {
                field: "matching.base_speed_kmh".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.matching.max_congestion_slowdown) {
            return Err(ConfigError::Validation {
                field: "matching.max_congestion_slowdown".to_string(),
                message: "must be in [0, 1)".to_string(),
            });
        }

        if self.orchestrator.task_timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "orchestrator.task_timeout_ms".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if self.health_check.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "health_check.interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.health_check.degraded_ratio) {
            return Err(ConfigError::Validation {
                field: "health_check.degraded_ratio".to_string(),
                message: "must be in [0, 1]".to_string(),
            });
        }
        if self.health_check.accuracy_window == 0 {
            return Err(ConfigError::Validation {
                field: "health_check.accuracy_window".to_string(),
                message: "window must hold at least one probe".to_string(),
            });
        }

        self.logging.validate()?;

        Ok(())
    }
}
