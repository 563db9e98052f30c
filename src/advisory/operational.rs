//! Operational hints for dispatch staff.

use super::{DemandForecast, DemandLevel};
use crate::booking::BookingRequest;
use crate::external::{EventImpact, ExternalData, WeatherSeverity};

const HEAVY_CONGESTION: f64 = 70.0;
const NOTABLE_DELAY_MINUTES: f64 = 10.0;
const LOW_VISIBILITY_KM: f64 = 1.0;

/// Plain-language hints from the feeds and forecast, most urgent first.
pub fn operational_hints(
    booking: &BookingRequest,
    external: &ExternalData,
    forecast: Option<&DemandForecast>,
    event_margin_minutes: i64,
) -> Vec<String> {
    let mut hints = Vec::new();

    if let Some(weather) = &external.weather {
        if weather.severity >= WeatherSeverity::High {
            hints.push(format!(
                "{:?} weather ({:?} severity): allow extra journey time",
                weather.condition, weather.severity
            ));
        }
        if weather.visibility_km > 0.0 && weather.visibility_km < LOW_VISIBILITY_KM {
            hints.push(format!(
                "Visibility {:.1} km: brief driver on reduced-speed route",
                weather.visibility_km
            ));
        }
    }

    let traffic = &external.traffic;
    if traffic.congestion() >= HEAVY_CONGESTION {
        hints.push(format!(
            "Heavy congestion ({:.0}%): consider alternative routes",
            traffic.congestion()
        ));
    }
    if traffic.incident_count > 0 {
        hints.push(format!(
            "{} traffic incident(s) reported",
            traffic.incident_count
        ));
    }
    if traffic.predicted_delay_minutes > NOTABLE_DELAY_MINUTES {
        hints.push(format!(
            "Expect around {:.0} min delay",
            traffic.predicted_delay_minutes
        ));
    }

    for event in external.events.iter().filter(|e| {
        e.impact == EventImpact::High && e.overlaps(booking.requested_time, event_margin_minutes)
    }) {
        hints.push(format!("High-impact event nearby: {}", event.name));
    }

    if let Some(forecast) = forecast {
        if forecast.level >= DemandLevel::High {
            hints.push(format!(
                "Demand {}: position additional drivers near pickup",
                forecast.level
            ));
        }
    }

    hints
}
