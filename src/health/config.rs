//! Configuration for subsystem health monitoring.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds and timing for the health monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    /// Whether the background monitor runs at all
    pub enabled: bool,
    /// Seconds between probe cycles
    pub interval_seconds: u64,
    /// Deadline for each individual probe
    pub probe_timeout_ms: u64,
    /// Minimum fraction of online subsystems for `degraded` (below is `critical`)
    pub degraded_ratio: f64,
    /// Number of recent probes feeding the rolling accuracy estimate
    pub accuracy_window: usize,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
            probe_timeout_ms: 1_000,
            degraded_ratio: 0.75,
            accuracy_window: 10,
        }
    }
}

impl HealthThresholds {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
