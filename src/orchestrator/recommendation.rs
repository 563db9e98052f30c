//! Pipeline output types.

use super::DegradationReason;
use crate::advisory::CustomerInsights;
use crate::booking::BookingId;
use crate::dispatch::DispatchDecision;
use crate::health::SystemHealthStatus;
use crate::pricing::{PriceBreakdown, PriceEstimate, SurgeWindow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAdvice {
    pub confidence: f64,
    pub surge_window: SurgeWindow,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchAdvice {
    pub confidence: f64,
    /// Minutes until the driver reaches the pickup
    pub eta_minutes: Option<i64>,
}

/// Guidance attached to a decision, one section per concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub pricing: PricingAdvice,
    pub dispatch: Option<DispatchAdvice>,
    pub customer: Option<CustomerInsights>,
    pub operational: Vec<String>,
}

/// A fully computed decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub booking_id: BookingId,
    pub pricing: PriceBreakdown,
    pub estimate: PriceEstimate,
    /// `None` when no driver could be considered
    pub dispatch: Option<DispatchDecision>,
    pub recommendations: Recommendations,
    pub system_health: SystemHealthStatus,
    /// Branches that failed without blocking the decision
    pub warnings: Vec<String>,
}

/// The fallback answer when pricing could not run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedRecommendation {
    pub booking_id: BookingId,
    pub pricing: PriceBreakdown,
    pub dispatch: Option<DispatchDecision>,
    pub recommendations: Recommendations,
    pub system_health: SystemHealthStatus,
    pub reason: DegradationReason,
}

/// What the orchestrator returns for every booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Recommended(Recommendation),
    Degraded(DegradedRecommendation),
}

impl DecisionOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, DecisionOutcome::Degraded(_))
    }

    pub fn booking_id(&self) -> &BookingId {
        match self {
            DecisionOutcome::Recommended(r) => &r.booking_id,
            DecisionOutcome::Degraded(d) => &d.booking_id,
        }
    }

    pub fn pricing(&self) -> &PriceBreakdown {
        match self {
            DecisionOutcome::Recommended(r) => &r.pricing,
            DecisionOutcome::Degraded(d) => &d.pricing,
        }
    }

    pub fn dispatch(&self) -> Option<&DispatchDecision> {
        match self {
            DecisionOutcome::Recommended(r) => r.dispatch.as_ref(),
            DecisionOutcome::Degraded(d) => d.dispatch.as_ref(),
        }
    }

    pub fn recommendations(&self) -> &Recommendations {
        match self {
            DecisionOutcome::Recommended(r) => &r.recommendations,
            DecisionOutcome::Degraded(d) => &d.recommendations,
        }
    }

    pub fn system_health(&self) -> &SystemHealthStatus {
        match self {
            DecisionOutcome::Recommended(r) => &r.system_health,
            DecisionOutcome::Degraded(d) => &d.system_health,
        }
    }

    pub fn into_result(self) -> Result<Recommendation, DegradedRecommendation> {
        match self {
            DecisionOutcome::Recommended(r) => Ok(r),
            DecisionOutcome::Degraded(d) => Err(d),
        }
    }

    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            DecisionOutcome::Recommended(_) => "recommended",
            DecisionOutcome::Degraded(_) => "degraded",
        }
    }
}
