//! Time-window surge resolution.
//!
//! Windows are checked in a fixed priority order and the first match wins:
//! weekend, then night, then peak. A Saturday 23:00 pickup is therefore a
//! weekend fare even though it also sits inside the night window.

use crate::config::SurgeConfig;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The surge window a pickup time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeWindow {
    Weekend,
    Night,
    Peak,
    Standard,
}

impl fmt::Display for SurgeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurgeWindow::Weekend => write!(f, "weekend"),
            SurgeWindow::Night => write!(f, "night"),
            SurgeWindow::Peak => write!(f, "peak"),
            SurgeWindow::Standard => write!(f, "standard"),
        }
    }
}

/// Resolves pickup times into surge windows and multipliers.
#[derive(Debug, Clone)]
pub struct SurgeSchedule {
    config: SurgeConfig,
    utc_offset: Duration,
}

impl SurgeSchedule {
    pub fn new(config: SurgeConfig, utc_offset_minutes: i32) -> Self {
        Self {
            config,
            utc_offset: Duration::minutes(i64::from(utc_offset_minutes)),
        }
    }

    /// Classify a pickup instant.
    pub fn window_at(&self, at: DateTime<Utc>) -> SurgeWindow {
        let local = (at + self.utc_offset).naive_utc();
        let hour = local.hour();
        let weekday = local.weekday();

        let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun)
            || (weekday == Weekday::Fri && hour >= 18);
        if weekend {
            return SurgeWindow::Weekend;
        }
        if hour >= 22 || hour < 6 {
            return SurgeWindow::Night;
        }
        if (6..9).contains(&hour) || (17..20).contains(&hour) {
            return SurgeWindow::Peak;
        }
        SurgeWindow::Standard
    }

    pub fn multiplier_for(&self, window: SurgeWindow) -> Decimal {
        match window {
            SurgeWindow::Weekend => self.config.weekend,
            SurgeWindow::Night => self.config.night,
            SurgeWindow::Peak => self.config.peak,
            SurgeWindow::Standard => Decimal::ONE,
        }
    }

    /// Window and multiplier for a pickup instant.
    pub fn resolve(&self, at: DateTime<Utc>) -> (SurgeWindow, Decimal) {
        let window = self.window_at(at);
        (window, self.multiplier_for(window))
    }

    pub fn config(&self) -> &SurgeConfig {
        &self.config
    }
}
