//! Arrival time estimates.

use crate::config::MatchingConfig;
use crate::external::TrafficConditions;
use crate::registry::DriverProfile;

/// Effective travel speed once congestion is applied.
///
/// Congestion 0 keeps the free-flow speed; congestion 100 removes
/// `max_congestion_slowdown` of it.
pub fn effective_speed_kmh(traffic: &TrafficConditions, config: &MatchingConfig) -> f64 {
    let slowdown = config.max_congestion_slowdown * traffic.congestion() / 100.0;
    config.base_speed_kmh * (1.0 - slowdown)
}

/// Penalty applied to drivers who are slow to accept jobs.
pub fn response_multiplier(driver: &DriverProfile, config: &MatchingConfig) -> f64 {
    if driver.performance.average_response_minutes > config.slow_response_threshold_minutes {
        config.slow_responder_penalty
    } else {
        1.0
    }
}

/// Minutes for `driver` to cover `distance_km` to the pickup.
pub fn estimate_minutes(
    distance_km: f64,
    driver: &DriverProfile,
    traffic: &TrafficConditions,
    config: &MatchingConfig,
) -> f64 {
    let speed = effective_speed_kmh(traffic, config);
    distance_km / speed * 60.0 * response_multiplier(driver, config)
}
