//! Error types for the decision pipeline.

use crate::advisory::AdvisoryError;
use crate::pricing::PricingError;
use crate::registry::DirectoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure of one fan-out branch.
///
/// These never escape [`process_booking_request`]; they become warnings or a
/// [`DegradationReason`].
///
/// [`process_booking_request`]: super::DecisionOrchestrator::process_booking_request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pricing failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("advisory service failed: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("{task} timed out after {timeout_ms}ms")]
    Timeout { task: &'static str, timeout_ms: u64 },

    #[error("{task} task panicked: {message}")]
    TaskPanicked { task: &'static str, message: String },
}

/// Why a booking got the fallback quote instead of a computed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradationReason {
    /// The booking failed pricing validation
    InvalidBooking { violations: Vec<String> },
    PricingTimeout { timeout_ms: u64 },
    PricingPanicked { message: String },
    PricingFailed { message: String },
}

impl From<PipelineError> for DegradationReason {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Pricing(PricingError::Validation(violations)) => {
                DegradationReason::InvalidBooking {
                    violations: violations.iter().map(ToString::to_string).collect(),
                }
            }
            PipelineError::Timeout { timeout_ms, .. } => {
                DegradationReason::PricingTimeout { timeout_ms }
            }
            PipelineError::TaskPanicked { message, .. } => {
                DegradationReason::PricingPanicked { message }
            }
            other => DegradationReason::PricingFailed {
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationReason::InvalidBooking { violations } => {
                write!(f, "invalid booking: {}", violations.join("; "))
            }
            DegradationReason::PricingTimeout { timeout_ms } => {
                write!(f, "pricing timed out after {timeout_ms}ms")
            }
            DegradationReason::PricingPanicked { message } => {
                write!(f, "pricing task panicked: {message}")
            }
            DegradationReason::PricingFailed { message } => write!(f, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Violation;

    #[test]
    fn validation_failure_maps_to_invalid_booking() {
        let error = PipelineError::from(PricingError::Validation(vec![
            Violation::MissingAirportCode,
        ]));
        let reason = DegradationReason::from(error);
        assert_eq!(
            reason,
            DegradationReason::InvalidBooking {
                violations: vec!["airport transfer requires an airport code".to_string()]
            }
        );
    }

    #[test]
    fn timeout_maps_to_pricing_timeout() {
        let reason = DegradationReason::from(PipelineError::Timeout {
            task: "pricing",
            timeout_ms: 2000,
        });
        assert_eq!(reason.to_string(), "pricing timed out after 2000ms");
    }

    #[test]
    fn reason_serializes_with_kind_tag() {
        let json = serde_json::to_value(DegradationReason::PricingTimeout { timeout_ms: 5 }).unwrap();
        assert_eq!(json["kind"], "pricing_timeout");
        assert_eq!(json["timeout_ms"], 5);
    }
}
