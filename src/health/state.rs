//! Subsystem health snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// The parts of the engine the monitor probes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    FareCalculator,
    DriverMatcher,
    DriverDirectory,
    CustomerDirectory,
    CustomerAnalysis,
    DemandForecast,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::FareCalculator,
        Subsystem::DriverMatcher,
        Subsystem::DriverDirectory,
        Subsystem::CustomerDirectory,
        Subsystem::CustomerAnalysis,
        Subsystem::DemandForecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::FareCalculator => "fare_calculator",
            Subsystem::DriverMatcher => "driver_matcher",
            Subsystem::DriverDirectory => "driver_directory",
            Subsystem::CustomerDirectory => "customer_directory",
            Subsystem::CustomerAnalysis => "customer_analysis",
            Subsystem::DemandForecast => "demand_forecast",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsystemState {
    Online,
    Offline,
    /// Answering, but only through its reduced-quality fallback path
    Fallback,
}

impl fmt::Display for SubsystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsystemState::Online => write!(f, "online"),
            SubsystemState::Offline => write!(f, "offline"),
            SubsystemState::Fallback => write!(f, "fallback"),
        }
    }
}

/// Whole-engine rating. Ordered from best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    Healthy,
    Degraded,
    Critical,
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallHealth::Healthy => write!(f, "healthy"),
            OverallHealth::Degraded => write!(f, "degraded"),
            OverallHealth::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemHealth {
    pub state: SubsystemState,
    pub last_response_ms: Option<u64>,
    /// Share of recent probes that succeeded
    pub accuracy: f64,
    pub last_error: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
}

impl SubsystemHealth {
    fn unchecked() -> Self {
        Self {
            state: SubsystemState::Online,
            last_response_ms: None,
            accuracy: 1.0,
            last_error: None,
            last_checked: None,
        }
    }
}

/// Point-in-time view of every subsystem plus the aggregate rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealthStatus {
    pub subsystems: BTreeMap<Subsystem, SubsystemHealth>,
    pub overall: OverallHealth,
    pub checked_at: Option<DateTime<Utc>>,
}

impl SystemHealthStatus {
    /// Status before the first probe: every subsystem assumed online.
    pub fn initial() -> Self {
        Self {
            subsystems: Subsystem::ALL
                .iter()
                .map(|s| (*s, SubsystemHealth::unchecked()))
                .collect(),
            overall: OverallHealth::Healthy,
            checked_at: None,
        }
    }

    pub fn subsystem(&self, subsystem: Subsystem) -> Option<&SubsystemHealth> {
        self.subsystems.get(&subsystem)
    }

    pub fn state_of(&self, subsystem: Subsystem) -> Option<SubsystemState> {
        self.subsystem(subsystem).map(|h| h.state)
    }

    pub fn online_ratio(&self) -> f64 {
        online_ratio(self.subsystems.values().map(|h| h.state))
    }

    /// Copy of this snapshot with `subsystem` forced offline and the overall
    /// rating no better than `floor`.
    pub fn with_failure(
        &self,
        subsystem: Subsystem,
        error: impl Into<String>,
        floor: OverallHealth,
    ) -> Self {
        let mut status = self.clone();
        let entry = status
            .subsystems
            .entry(subsystem)
            .or_insert_with(SubsystemHealth::unchecked);
        entry.state = SubsystemState::Offline;
        entry.last_error = Some(error.into());
        status.overall = status.overall.max(floor);
        status
    }
}

impl Default for SystemHealthStatus {
    fn default() -> Self {
        Self::initial()
    }
}

fn online_ratio(states: impl Iterator<Item = SubsystemState>) -> f64 {
    let mut total = 0usize;
    let mut online = 0usize;
    for state in states {
        total += 1;
        if state == SubsystemState::Online {
            online += 1;
        }
    }
    if total == 0 {
        1.0
    } else {
        online as f64 / total as f64
    }
}

/// Healthy when every subsystem is online, degraded while the online share
/// stays at or above `degraded_ratio`, critical below it.
pub fn aggregate(
    states: impl IntoIterator<Item = SubsystemState>,
    degraded_ratio: f64,
) -> OverallHealth {
    let states: Vec<_> = states.into_iter().collect();
    if states.iter().all(|s| *s == SubsystemState::Online) {
        return OverallHealth::Healthy;
    }
    if online_ratio(states.into_iter()) >= degraded_ratio {
        OverallHealth::Degraded
    } else {
        OverallHealth::Critical
    }
}

/// Rolling record of recent probe outcomes for one subsystem.
#[derive(Debug, Clone)]
pub struct ProbeHistory {
    window: usize,
    outcomes: VecDeque<bool>,
}

impl ProbeHistory {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            outcomes: VecDeque::with_capacity(window),
        }
    }

    /// Record an outcome and return the updated success ratio.
    pub fn record(&mut self, success: bool) -> f64 {
        if self.outcomes.len() == self.window {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(success);
        self.accuracy()
    }

    /// Number of outcomes currently in the window.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 1.0;
        }
        let ok = self.outcomes.iter().filter(|o| **o).count();
        ok as f64 / self.outcomes.len() as f64
    }
}
