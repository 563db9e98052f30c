//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the booking decision pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Deadline for each fan-out branch
    pub task_timeout_ms: u64,
    /// Confidence reported for a normal price quote
    pub pricing_confidence: f64,
    /// Confidence reported for the fallback price quote
    pub fallback_pricing_confidence: f64,
    /// Minutes either side of an event window that still count as impacted
    pub event_margin_minutes: i64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            task_timeout_ms: 2_000,
            pricing_confidence: 0.95,
            fallback_pricing_confidence: 0.5,
            event_margin_minutes: 60,
        }
    }
}

impl OrchestratorConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }
}
