//! External data feed snapshots.
//!
//! Weather, traffic and nearby events are fetched by a collaborator and
//! handed to the engine as plain values. Nothing in this crate calls out to a
//! maps or weather provider.

use crate::booking::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Storm,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSeverity {
    #[default]
    Low,
    Moderate,
    High,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeatherConditions {
    pub temperature_c: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub visibility_km: f64,
    pub condition: WeatherCondition,
    pub severity: WeatherSeverity,
}

/// A candidate route reported by the traffic feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrafficRoute {
    pub name: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConditions {
    /// Congestion on a 0-100 scale.
    pub congestion_level: f64,
    pub average_speed_kmh: f64,
    pub incident_count: u32,
    pub predicted_delay_minutes: f64,
    pub routes: Vec<TrafficRoute>,
}

impl Default for TrafficConditions {
    fn default() -> Self {
        Self {
            congestion_level: 0.0,
            average_speed_kmh: 30.0,
            incident_count: 0,
            predicted_delay_minutes: 0.0,
            routes: Vec::new(),
        }
    }
}

impl TrafficConditions {
    /// Congestion clamped into 0-100; non-finite readings count as free-flowing.
    pub fn congestion(&self) -> f64 {
        if self.congestion_level.is_finite() {
            self.congestion_level.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EventImpact {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyEvent {
    pub name: String,
    pub location: Coordinates,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub expected_attendance: u32,
    #[serde(default)]
    pub impact: EventImpact,
}

impl NearbyEvent {
    /// True when `at` falls inside the event window, widened by `margin_minutes`
    /// either side for arrivals and departures.
    pub fn overlaps(&self, at: DateTime<Utc>, margin_minutes: i64) -> bool {
        let margin = chrono::Duration::minutes(margin_minutes);
        at >= self.starts_at - margin && at <= self.ends_at + margin
    }
}

/// Everything the collaborator fetched for one booking evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExternalData {
    pub weather: Option<WeatherConditions>,
    pub traffic: TrafficConditions,
    pub events: Vec<NearbyEvent>,
}
