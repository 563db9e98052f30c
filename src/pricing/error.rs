//! Error types for fare calculation.

use rust_decimal::Decimal;
use thiserror::Error;

/// A single constraint a booking fails to meet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("distance must be a finite number of miles")]
    DistanceNotFinite,

    #[error("distance must be greater than zero, got {distance_miles}")]
    DistanceNotPositive { distance_miles: f64 },

    #[error("distance {distance_miles} exceeds the maximum of {max_miles} miles")]
    DistanceTooLong { distance_miles: f64, max_miles: f64 },

    #[error("passenger count {passengers} outside allowed range {min}-{max}")]
    PassengersOutOfRange { passengers: u8, min: u8, max: u8 },

    #[error("airport transfer requires an airport code")]
    MissingAirportCode,

    #[error("discount {percent}% outside allowed range 0-100")]
    DiscountOutOfRange { percent: Decimal },
}

/// Errors returned by the fare calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The booking violates one or more constraints; nothing was computed.
    #[error("booking failed validation: {}", format_violations(.0))]
    Validation(Vec<Violation>),

    /// A numeric input could not be represented as a decimal amount.
    #[error("cannot convert {field} to a decimal amount")]
    Conversion { field: &'static str },
}

impl PricingError {
    /// Violations carried by a validation failure, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            PricingError::Validation(violations) => violations,
            PricingError::Conversion { .. } => &[],
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let err = PricingError::Validation(vec![
            Violation::MissingAirportCode,
            Violation::PassengersOutOfRange {
                passengers: 0,
                min: 1,
                max: 8,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "booking failed validation: airport transfer requires an airport code; \
             passenger count 0 outside allowed range 1-8"
        );
        assert_eq!(err.violations().len(), 2);
    }
}
