use super::{AdvisoryError, DemandForecaster};
use crate::booking::BookingRequest;
use crate::config::SurgeConfig;
use crate::external::{EventImpact, ExternalData, WeatherSeverity};
use crate::pricing::{SurgeSchedule, SurgeWindow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Normal,
    High,
    Extreme,
}

impl DemandLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.25 {
            DemandLevel::Low
        } else if score < 0.5 {
            DemandLevel::Normal
        } else if score < 0.75 {
            DemandLevel::High
        } else {
            DemandLevel::Extreme
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandLevel::Low => write!(f, "low"),
            DemandLevel::Normal => write!(f, "normal"),
            DemandLevel::High => write!(f, "high"),
            DemandLevel::Extreme => write!(f, "extreme"),
        }
    }
}

/// Expected demand around a pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub level: DemandLevel,
    /// Demand pressure in `[0, 1]`
    pub score: f64,
    /// What pushed the score up, in the order it was assessed
    pub factors: Vec<String>,
}

/// Scores demand from the surge window, overlapping events and weather.
#[derive(Debug, Clone)]
pub struct HeuristicDemandForecaster {
    schedule: SurgeSchedule,
    event_margin_minutes: i64,
}

impl HeuristicDemandForecaster {
    pub fn new(schedule: SurgeSchedule, event_margin_minutes: i64) -> Self {
        Self {
            schedule,
            event_margin_minutes,
        }
    }

    pub fn estimate(&self, booking: &BookingRequest, external: &ExternalData) -> DemandForecast {
        let mut score: f64 = 0.1;
        let mut factors = Vec::new();

        let window = self.schedule.window_at(booking.requested_time);
        let window_weight = match window {
            SurgeWindow::Peak => 0.3,
            SurgeWindow::Weekend => 0.2,
            SurgeWindow::Night => 0.1,
            SurgeWindow::Standard => 0.0,
        };
        if window_weight > 0.0 {
            score += window_weight;
            factors.push(format!("{window} window"));
        }

        for event in external
            .events
            .iter()
            .filter(|e| e.overlaps(booking.requested_time, self.event_margin_minutes))
        {
            score += match event.impact {
                EventImpact::High => 0.3,
                EventImpact::Medium => 0.15,
                EventImpact::Low => 0.05,
            };
            if event.expected_attendance > 10_000 {
                score += 0.1;
            }
            factors.push(format!("{} ({} expected)", event.name, event.expected_attendance));
        }

        if let Some(weather) = &external.weather {
            let weather_weight = match weather.severity {
                WeatherSeverity::Severe => 0.25,
                WeatherSeverity::High => 0.15,
                _ => 0.0,
            };
            if weather_weight > 0.0 {
                score += weather_weight;
                factors.push(format!("{:?} weather", weather.condition));
            }
        }

        let score = score.clamp(0.0, 1.0);
        DemandForecast {
            level: DemandLevel::from_score(score),
            score,
            factors,
        }
    }
}

impl Default for HeuristicDemandForecaster {
    fn default() -> Self {
        Self::new(SurgeSchedule::new(SurgeConfig::default(), 0), 60)
    }
}

#[async_trait]
impl DemandForecaster for HeuristicDemandForecaster {
    async fn forecast(
        &self,
        booking: &BookingRequest,
        external: &ExternalData,
    ) -> Result<DemandForecast, AdvisoryError> {
        Ok(self.estimate(booking, external))
    }
}
