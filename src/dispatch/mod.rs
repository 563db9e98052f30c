//! Driver matching for security transport bookings
//!
//! The matcher filters the candidates it is handed down to those who can take
//! the job, scores each one, and returns the best as a [`DispatchDecision`].
//! When scoring fails it falls back to the nearest eligible driver so that a
//! booking is never left without an answer because of one bad record.

mod decision;
pub mod eta;
pub mod scoring;
#[cfg(test)]
mod tests;
mod utilization;

pub use decision::{Assignment, DecisionStrategy, DispatchDecision, RouteSummary};
pub use scoring::{score_driver, ScoreBreakdown, ScoringError};

use crate::booking::BookingRequest;
use crate::config::MatchingConfig;
use crate::external::TrafficConditions;
use crate::registry::{Certification, CustomerProfile, DriverProfile};
use chrono::{DateTime, Duration, Utc};

/// Selects drivers for bookings.
///
/// The matcher is pure: it never mutates driver records and gives the same
/// answer for the same inputs and clock.
#[derive(Debug, Clone)]
pub struct DriverMatcher {
    config: MatchingConfig,
}

impl DriverMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Pick the best driver for `booking` from `candidates`.
    pub fn find_optimal_driver(
        &self,
        booking: &BookingRequest,
        candidates: &[DriverProfile],
        traffic: &TrafficConditions,
        customer: Option<&CustomerProfile>,
    ) -> DispatchDecision {
        self.find_optimal_driver_at(booking, candidates, traffic, customer, Utc::now())
    }

    /// Same as [`find_optimal_driver`](Self::find_optimal_driver) with an
    /// explicit clock for the arrival estimate.
    pub fn find_optimal_driver_at(
        &self,
        booking: &BookingRequest,
        candidates: &[DriverProfile],
        traffic: &TrafficConditions,
        customer: Option<&CustomerProfile>,
        now: DateTime<Utc>,
    ) -> DispatchDecision {
        let eligible = self.filter_candidates(booking, candidates);

        if eligible.is_empty() {
            tracing::debug!(
                booking_id = %booking.id,
                candidates = candidates.len(),
                "No eligible driver"
            );
            return DispatchDecision::none_available(format!(
                "No eligible driver among {} candidate(s)",
                candidates.len()
            ));
        }

        match self.select_scored(booking, &eligible, customer) {
            Ok((driver, breakdown)) => {
                tracing::debug!(
                    booking_id = %booking.id,
                    driver_id = %driver.id,
                    score = breakdown.total,
                    eligible = eligible.len(),
                    "Driver selected"
                );
                self.scored_decision(booking, driver, &breakdown, traffic, now)
            }
            Err(error) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    error = %error,
                    "Scoring failed, falling back to nearest driver"
                );
                metrics::counter!("sentinel_dispatch_fallbacks_total").increment(1);
                self.nearest_fallback(booking, &eligible, traffic, &error, now)
            }
        }
    }

    /// Drivers who are available, licensed if required, and willing to
    /// travel to the pickup. Input order is preserved.
    fn filter_candidates<'a>(
        &self,
        booking: &BookingRequest,
        candidates: &'a [DriverProfile],
    ) -> Vec<&'a DriverProfile> {
        let pickup = &booking.pickup.coordinates;
        candidates
            .iter()
            .filter(|d| d.available)
            .filter(|d| !booking.requires_sia_driver || d.is_sia_licensed())
            .filter(|d| {
                // Unmeasurable distances are left for scoring to reject
                let distance = d.location.distance_km(pickup);
                !distance.is_finite() || distance <= d.max_distance_km
            })
            .collect()
    }

    /// Highest total wins; on a tie the earlier candidate is kept.
    fn select_scored<'a>(
        &self,
        booking: &BookingRequest,
        eligible: &[&'a DriverProfile],
        customer: Option<&CustomerProfile>,
    ) -> Result<(&'a DriverProfile, ScoreBreakdown), ScoringError> {
        let pickup = &booking.pickup.coordinates;
        let mut best: Option<(&DriverProfile, ScoreBreakdown)> = None;

        for driver in eligible {
            let breakdown =
                score_driver(driver, pickup, booking.service_tier, customer, &self.config)?;
            let better = match &best {
                Some((_, current)) => breakdown.total > current.total,
                None => true,
            };
            if better {
                best = Some((driver, breakdown));
            }
        }

        // eligible is non-empty, so best is always set here
        best.ok_or(ScoringError::InvalidPickup)
    }

    fn scored_decision(
        &self,
        booking: &BookingRequest,
        driver: &DriverProfile,
        breakdown: &ScoreBreakdown,
        traffic: &TrafficConditions,
        now: DateTime<Utc>,
    ) -> DispatchDecision {
        let minutes = eta::estimate_minutes(breakdown.distance_km, driver, traffic, &self.config);
        DispatchDecision {
            driver_id: Some(driver.id.clone()),
            score: breakdown.total,
            confidence: breakdown.total.clamp(0.0, 1.0),
            estimated_arrival: Some(arrival_at(now, minutes)),
            route: route_summary(booking, breakdown.distance_km, minutes),
            reasoning: self.reasoning(booking, driver, breakdown),
            strategy: DecisionStrategy::Scored,
        }
    }

    fn nearest_fallback(
        &self,
        booking: &BookingRequest,
        eligible: &[&DriverProfile],
        traffic: &TrafficConditions,
        error: &ScoringError,
        now: DateTime<Utc>,
    ) -> DispatchDecision {
        let pickup = &booking.pickup.coordinates;
        let nearest = eligible
            .iter()
            .map(|d| (*d, d.location.distance_km(pickup)))
            .filter(|(_, distance)| distance.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((driver, distance_km)) = nearest else {
            return DispatchDecision::none_available(format!(
                "Scoring unavailable ({error}) and no driver has a usable position"
            ));
        };

        let minutes = eta::estimate_minutes(distance_km, driver, traffic, &self.config);
        DispatchDecision {
            driver_id: Some(driver.id.clone()),
            score: 0.0,
            confidence: self.config.fallback_confidence,
            estimated_arrival: Some(arrival_at(now, minutes)),
            route: route_summary(booking, distance_km, minutes),
            reasoning: vec![
                format!("Scoring unavailable: {error}"),
                format!("Nearest available driver at {distance_km:.1} km"),
            ],
            strategy: DecisionStrategy::NearestFallback,
        }
    }

    /// Reasons in order of weight: proximity, rating, track record,
    /// customer fit, service fit, licensing, total.
    fn reasoning(
        &self,
        booking: &BookingRequest,
        driver: &DriverProfile,
        breakdown: &ScoreBreakdown,
    ) -> Vec<String> {
        let perf = &driver.performance;
        let mut reasons = vec![
            format!("{:.1} km from pickup", breakdown.distance_km),
            format!("Rated {:.1}/5", driver.rating),
            format!(
                "{:.0}% on time, {:.0}% completion",
                perf.on_time_percentage,
                perf.completion_rate * 100.0
            ),
        ];

        if breakdown.customer_preference >= 1.0 {
            reasons.push("Customer's preferred driver".to_string());
        } else if breakdown.customer_preference > 0.5 {
            reasons.push("Works the customer's usual service types".to_string());
        }

        if breakdown.service_expertise >= 1.0 {
            reasons.push(format!("Specialises in {} service", booking.service_tier));
        } else if breakdown.service_expertise > 0.5 {
            reasons.push(format!(
                "Holds {:?} certification",
                Certification::for_service(booking.service_tier)
            ));
        }

        if booking.requires_sia_driver {
            reasons.push("SIA licensed".to_string());
        }

        reasons.push(format!("Overall match score {:.2}", breakdown.total));
        reasons
    }
}

impl Default for DriverMatcher {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

fn arrival_at(now: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    let seconds = (minutes * 60.0).round();
    if seconds.is_finite() && seconds >= 0.0 {
        now + Duration::seconds(seconds as i64)
    } else {
        now
    }
}

fn route_summary(booking: &BookingRequest, distance_km: f64, minutes: f64) -> RouteSummary {
    let destination = if booking.pickup.address.is_empty() {
        "pickup point"
    } else {
        booking.pickup.address.as_str()
    };
    RouteSummary {
        distance_km,
        duration_minutes: minutes,
        turns: vec![
            format!("Head towards {destination}"),
            format!("Arrive at {destination}"),
        ],
    }
}
