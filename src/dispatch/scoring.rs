//! Scoring functions for driver selection.
//!
//! Each component produces a value in `[0, 1]`; the total is the weighted sum
//! using [`MatchWeights`](crate::config::MatchWeights).

use crate::booking::{Coordinates, ServiceTier};
use crate::config::{MatchingConfig, PerformanceWeights};
use crate::registry::{Certification, CustomerProfile, DriverProfile, PerformanceRecord};
use serde::Serialize;
use thiserror::Error;

/// Why a candidate could not be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("pickup coordinates are invalid")]
    InvalidPickup,

    #[error("driver {driver_id} has invalid coordinates")]
    InvalidLocation { driver_id: String },

    #[error("driver {driver_id} has rating {rating} outside 0-5")]
    InvalidRating { driver_id: String, rating: f64 },

    #[error("driver {driver_id} has a non-numeric performance record")]
    InvalidPerformance { driver_id: String },
}

/// How each component contributed to a driver's total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub distance_km: f64,
    pub distance: f64,
    pub rating: f64,
    pub performance: f64,
    pub customer_preference: f64,
    pub service_expertise: f64,
    pub total: f64,
}

/// Linear decay from 1.0 at the pickup to 0.0 at `horizon_km`.
pub fn distance_score(distance_km: f64, horizon_km: f64) -> f64 {
    (1.0 - distance_km / horizon_km).max(0.0)
}

pub fn rating_score(rating: f64) -> f64 {
    (rating / 5.0).clamp(0.0, 1.0)
}

/// Blend of punctuality, satisfaction, completion and responsiveness.
pub fn performance_score(
    record: &PerformanceRecord,
    weights: &PerformanceWeights,
    response_ceiling_minutes: f64,
) -> f64 {
    let on_time = (record.on_time_percentage / 100.0).clamp(0.0, 1.0);
    let satisfaction = (record.customer_satisfaction / 5.0).clamp(0.0, 1.0);
    let completion = record.completion_rate.clamp(0.0, 1.0);
    let response = (1.0 - record.average_response_minutes / response_ceiling_minutes).max(0.0);

    on_time * weights.on_time
        + satisfaction * weights.satisfaction
        + completion * weights.completion
        + response * weights.response_time
}

/// How well the driver fits what this customer has asked for before.
pub fn preference_score(driver: &DriverProfile, customer: Option<&CustomerProfile>) -> f64 {
    match customer {
        Some(c) if c.prefers_driver(&driver.id) => 1.0,
        Some(c) if !c.preferred_services.is_disjoint(&driver.service_types) => 0.8,
        _ => 0.5,
    }
}

/// How well the driver fits the requested service tier.
pub fn expertise_score(driver: &DriverProfile, tier: ServiceTier) -> f64 {
    if driver.service_types.contains(&tier) {
        1.0
    } else if driver
        .certifications
        .contains(&Certification::for_service(tier))
    {
        0.8
    } else {
        0.5
    }
}

/// Score one candidate against a pickup point.
pub fn score_driver(
    driver: &DriverProfile,
    pickup: &Coordinates,
    tier: ServiceTier,
    customer: Option<&CustomerProfile>,
    config: &MatchingConfig,
) -> Result<ScoreBreakdown, ScoringError> {
    if !pickup.is_valid() {
        return Err(ScoringError::InvalidPickup);
    }
    if !driver.location.is_valid() {
        return Err(ScoringError::InvalidLocation {
            driver_id: driver.id.clone(),
        });
    }
    if !(driver.rating.is_finite() && (0.0..=5.0).contains(&driver.rating)) {
        return Err(ScoringError::InvalidRating {
            driver_id: driver.id.clone(),
            rating: driver.rating,
        });
    }
    let perf = &driver.performance;
    let perf_values = [
        perf.on_time_percentage,
        perf.customer_satisfaction,
        perf.completion_rate,
        perf.average_response_minutes,
    ];
    if perf_values.iter().any(|v| !v.is_finite()) {
        return Err(ScoringError::InvalidPerformance {
            driver_id: driver.id.clone(),
        });
    }

    let weights = &config.weights;
    let distance_km = driver.location.distance_km(pickup);

    let distance = distance_score(distance_km, config.distance_horizon_km);
    let rating = rating_score(driver.rating);
    let performance = performance_score(
        perf,
        &config.performance_weights,
        config.response_ceiling_minutes,
    );
    let customer_preference = preference_score(driver, customer);
    let service_expertise = expertise_score(driver, tier);

    let total = distance * weights.distance
        + rating * weights.rating
        + performance * weights.performance
        + customer_preference * weights.customer_preference
        + service_expertise * weights.service_expertise;

    Ok(ScoreBreakdown {
        distance_km,
        distance,
        rating,
        performance,
        customer_preference,
        service_expertise,
        total,
    })
}
