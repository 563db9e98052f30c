//! Health monitoring for engine subsystems.
//!
//! The monitor sends a synthetic booking through each subsystem on a fixed
//! interval and publishes the result on a `watch` channel. It is the only
//! writer of [`SystemHealthStatus`]; everything else holds a receiver.
//! Probe cycles are serialised, so an on-demand check and a periodic tick
//! never interleave their updates.

mod config;
mod error;
mod state;

pub use config::*;
pub use error::*;
pub use state::*;

use crate::advisory::{CustomerAnalyzer, DemandForecaster};
use crate::booking::{BookingId, BookingRequest, Coordinates, Location};
use crate::dispatch::{DecisionStrategy, DriverMatcher};
use crate::external::{ExternalData, TrafficConditions};
use crate::pricing::FareCalculator;
use crate::registry::{CustomerDirectory, CustomerProfile, DriverDirectory, DriverProfile};
use chrono::Utc;
use dashmap::DashMap;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const PROBE_ID: &str = "health-probe";
const PROBE_PICKUP: Coordinates = Coordinates::new(51.5074, -0.1278);

/// The subsystems a [`HealthMonitor`] probes.
#[derive(Clone)]
pub struct MonitoredSubsystems {
    pub calculator: Arc<FareCalculator>,
    pub matcher: Arc<DriverMatcher>,
    pub drivers: Arc<dyn DriverDirectory>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub analyzer: Arc<dyn CustomerAnalyzer>,
    pub forecaster: Arc<dyn DemandForecaster>,
}

/// Result of probing one subsystem.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub subsystem: Subsystem,
    pub result: Result<SubsystemState, ProbeError>,
    pub elapsed_ms: u64,
}

/// Periodically probes every subsystem and publishes a status snapshot.
pub struct HealthMonitor {
    subsystems: MonitoredSubsystems,
    thresholds: HealthThresholds,
    history: DashMap<Subsystem, ProbeHistory>,
    sender: watch::Sender<SystemHealthStatus>,
    /// Held for a whole probe-and-publish cycle.
    cycle: Mutex<()>,
}

impl HealthMonitor {
    pub fn new(subsystems: MonitoredSubsystems, thresholds: HealthThresholds) -> Self {
        let (sender, _) = watch::channel(SystemHealthStatus::initial());
        Self {
            subsystems,
            thresholds,
            history: DashMap::new(),
            sender,
            cycle: Mutex::new(()),
        }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Latest published snapshot.
    pub fn status(&self) -> SystemHealthStatus {
        self.sender.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SystemHealthStatus> {
        self.sender.subscribe()
    }

    /// Probe every subsystem once, publish, and return the new snapshot.
    ///
    /// Waits for any cycle already in flight to publish first.
    pub async fn run_once(&self) -> SystemHealthStatus {
        let _cycle = self.cycle.lock().await;
        let (pricing, matcher, drivers, customers, analysis, forecast) = tokio::join!(
            self.timed(Subsystem::FareCalculator, self.probe_pricing()),
            self.timed(Subsystem::DriverMatcher, self.probe_matcher()),
            self.timed(Subsystem::DriverDirectory, self.probe_drivers()),
            self.timed(Subsystem::CustomerDirectory, self.probe_customers()),
            self.timed(Subsystem::CustomerAnalysis, self.probe_analysis()),
            self.timed(Subsystem::DemandForecast, self.probe_forecast()),
        );

        self.apply(vec![pricing, matcher, drivers, customers, analysis, forecast])
    }

    /// Start the monitor background task.
    /// Returns a JoinHandle that resolves when the monitor stops.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.thresholds.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.thresholds.interval_seconds,
                "Health monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let status = self.run_once().await;
                        tracing::debug!(
                            overall = %status.overall,
                            online_ratio = status.online_ratio(),
                            "Health check cycle completed"
                        );
                    }
                }
            }
        })
    }

    async fn timed<F>(&self, subsystem: Subsystem, probe: F) -> ProbeOutcome
    where
        F: Future<Output = Result<SubsystemState, ProbeError>>,
    {
        let start = Instant::now();
        let limit = self.thresholds.probe_timeout();
        let result = match tokio::time::timeout(limit, AssertUnwindSafe(probe).catch_unwind()).await
        {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => Err(ProbeError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(ProbeError::Timeout(self.thresholds.probe_timeout_ms)),
        };
        ProbeOutcome {
            subsystem,
            result,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn probe_pricing(&self) -> Result<SubsystemState, ProbeError> {
        let calculator = Arc::clone(&self.subsystems.calculator);
        let booking = probe_booking();
        tokio::task::spawn_blocking(move || calculator.calculate_price(&booking, None))
            .await
            .map_err(|e| ProbeError::Panicked(e.to_string()))??;
        Ok(SubsystemState::Online)
    }

    /// Runs the matcher over the live pool when it can be read, so corrupt
    /// driver records show up as a fallback answer.
    async fn probe_matcher(&self) -> Result<SubsystemState, ProbeError> {
        let booking = probe_booking();
        let pool_limit = self.thresholds.probe_timeout() / 2;
        let pool =
            tokio::time::timeout(pool_limit, self.subsystems.drivers.available_drivers(&booking))
                .await;
        let mut candidates = match pool {
            Ok(Ok(drivers)) if !drivers.is_empty() => drivers,
            _ => vec![probe_driver()],
        };
        for driver in &mut candidates {
            driver.max_distance_km = f64::INFINITY;
        }

        let decision = self.subsystems.matcher.find_optimal_driver(
            &booking,
            &candidates,
            &TrafficConditions::default(),
            None,
        );
        match decision.strategy {
            DecisionStrategy::Scored => Ok(SubsystemState::Online),
            DecisionStrategy::NearestFallback => Ok(SubsystemState::Fallback),
            DecisionStrategy::NoneAvailable => Err(ProbeError::NoDecision),
        }
    }

    async fn probe_drivers(&self) -> Result<SubsystemState, ProbeError> {
        self.subsystems
            .drivers
            .available_drivers(&probe_booking())
            .await?;
        Ok(SubsystemState::Online)
    }

    async fn probe_customers(&self) -> Result<SubsystemState, ProbeError> {
        self.subsystems.customers.get_customer(PROBE_ID).await?;
        Ok(SubsystemState::Online)
    }

    async fn probe_analysis(&self) -> Result<SubsystemState, ProbeError> {
        let customer = CustomerProfile::new(PROBE_ID, "Health probe");
        self.subsystems
            .analyzer
            .analyze(&customer, &probe_booking())
            .await?;
        Ok(SubsystemState::Online)
    }

    async fn probe_forecast(&self) -> Result<SubsystemState, ProbeError> {
        self.subsystems
            .forecaster
            .forecast(&probe_booking(), &ExternalData::default())
            .await?;
        Ok(SubsystemState::Online)
    }

    fn apply(&self, outcomes: Vec<ProbeOutcome>) -> SystemHealthStatus {
        let previous = self.status();
        let now = Utc::now();
        let mut subsystems = BTreeMap::new();

        for outcome in outcomes {
            let (state, last_error) = match &outcome.result {
                Ok(state) => (*state, None),
                Err(e) => (SubsystemState::Offline, Some(e.to_string())),
            };

            let accuracy = self
                .history
                .entry(outcome.subsystem)
                .or_insert_with(|| ProbeHistory::new(self.thresholds.accuracy_window))
                .record(state == SubsystemState::Online);

            let before = previous.state_of(outcome.subsystem);
            if before != Some(state) {
                match state {
                    SubsystemState::Online => tracing::info!(
                        subsystem = %outcome.subsystem,
                        "Subsystem back online"
                    ),
                    _ => tracing::warn!(
                        subsystem = %outcome.subsystem,
                        state = %state,
                        error = last_error.as_deref().unwrap_or(""),
                        "Subsystem health changed"
                    ),
                }
            }

            let online = if state == SubsystemState::Online { 1.0 } else { 0.0 };
            metrics::gauge!("sentinel_subsystem_online", "subsystem" => outcome.subsystem.as_str())
                .set(online);

            subsystems.insert(
                outcome.subsystem,
                SubsystemHealth {
                    state,
                    last_response_ms: Some(outcome.elapsed_ms),
                    accuracy,
                    last_error,
                    last_checked: Some(now),
                },
            );
        }

        let overall = aggregate(
            subsystems.values().map(|h| h.state),
            self.thresholds.degraded_ratio,
        );
        if overall != previous.overall {
            tracing::info!(from = %previous.overall, to = %overall, "Overall health changed");
        }

        let status = SystemHealthStatus {
            subsystems,
            overall,
            checked_at: Some(now),
        };
        self.sender.send_replace(status.clone());
        status
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn probe_booking() -> BookingRequest {
    BookingRequest::builder(
        Location::new(PROBE_PICKUP.lat, PROBE_PICKUP.lng, "Probe pickup"),
        Location::new(51.5155, -0.0922, "Probe dropoff"),
    )
    .id(BookingId::from(PROBE_ID))
    .distance_miles(3.0)
    .build()
}

fn probe_driver() -> DriverProfile {
    DriverProfile::new(PROBE_ID, "Health probe", PROBE_PICKUP)
}
