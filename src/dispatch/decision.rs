use crate::booking::{BookingId, DriverId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a dispatch decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStrategy {
    /// Full weighted scoring
    Scored,
    /// Scoring failed; nearest eligible driver substituted
    NearestFallback,
    /// No eligible driver
    NoneAvailable,
}

/// Distance and duration to the pickup. Turn text is a placeholder until a
/// routing provider supplies real directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub turns: Vec<String>,
}

impl RouteSummary {
    pub fn empty() -> Self {
        Self {
            distance_km: 0.0,
            duration_minutes: 0.0,
            turns: Vec::new(),
        }
    }
}

/// The outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchDecision {
    /// Selected driver, `None` when nobody is available
    pub driver_id: Option<DriverId>,
    pub score: f64,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub route: RouteSummary,
    /// Human-readable justification, most significant first
    pub reasoning: Vec<String>,
    pub strategy: DecisionStrategy,
}

impl DispatchDecision {
    /// The "no driver" sentinel.
    pub fn none_available(reason: impl Into<String>) -> Self {
        Self {
            driver_id: None,
            score: 0.0,
            confidence: 0.0,
            estimated_arrival: None,
            route: RouteSummary::empty(),
            reasoning: vec![reason.into()],
            strategy: DecisionStrategy::NoneAvailable,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.driver_id.is_some()
    }

    pub fn is_fallback(&self) -> bool {
        self.strategy == DecisionStrategy::NearestFallback
    }

    /// Minutes from `now` until the estimated arrival.
    pub fn eta_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.estimated_arrival
            .map(|arrival| (arrival - now).num_minutes().max(0))
    }
}

/// One booking's result from a batch assignment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub booking_id: BookingId,
    pub decision: DispatchDecision,
}
