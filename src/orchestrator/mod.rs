//! Booking decision pipeline
//!
//! [`DecisionOrchestrator`] fans a booking out to pricing, the driver and
//! customer directories and the advisory subsystems, then folds whatever came
//! back into a single [`DecisionOutcome`]. Pricing is the only branch a
//! decision cannot do without; when it fails the caller gets the
//! [`DecisionOutcome::Degraded`] branch with the fallback fare. Every other
//! failure is absorbed and listed in `warnings`.

mod error;
mod recommendation;

pub use error::{DegradationReason, PipelineError};
pub use recommendation::{
    DecisionOutcome, DegradedRecommendation, DispatchAdvice, PricingAdvice, Recommendation,
    Recommendations,
};

use crate::advisory::{
    operational_hints, CustomerAnalyzer, CustomerInsights, DemandForecaster,
    HeuristicCustomerAnalyzer, HeuristicDemandForecaster,
};
use crate::booking::BookingRequest;
use crate::config::{ConfigError, EngineConfig};
use crate::dispatch::{Assignment, DispatchDecision, DriverMatcher};
use crate::external::{ExternalData, TrafficConditions};
use crate::health::{
    HealthMonitor, MonitoredSubsystems, OverallHealth, Subsystem, SystemHealthStatus,
};
use crate::pricing::{FareCalculator, PriceBreakdown, PriceEstimate, PricingError};
use crate::registry::{
    CustomerDirectory, CustomerProfile, CustomerRegistry, DriverDirectory, DriverProfile,
    DriverRegistry,
};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Coordinates pricing, matching and advisory subsystems for each booking.
///
/// Collaborators are injected through [`DecisionOrchestrator::builder`];
/// nothing is held in process-wide state, so independent instances can run
/// side by side.
pub struct DecisionOrchestrator {
    config: EngineConfig,
    calculator: Arc<FareCalculator>,
    matcher: Arc<DriverMatcher>,
    drivers: Arc<dyn DriverDirectory>,
    customers: Arc<dyn CustomerDirectory>,
    analyzer: Arc<dyn CustomerAnalyzer>,
    forecaster: Arc<dyn DemandForecaster>,
    monitor: Arc<HealthMonitor>,
}

/// Builder for [`DecisionOrchestrator`].
///
/// Directories default to empty in-memory registries and advisors to the
/// heuristic implementations.
#[derive(Default)]
pub struct OrchestratorBuilder {
    config: Option<EngineConfig>,
    drivers: Option<Arc<dyn DriverDirectory>>,
    customers: Option<Arc<dyn CustomerDirectory>>,
    analyzer: Option<Arc<dyn CustomerAnalyzer>>,
    forecaster: Option<Arc<dyn DemandForecaster>>,
}

impl OrchestratorBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn driver_directory(mut self, drivers: Arc<dyn DriverDirectory>) -> Self {
        self.drivers = Some(drivers);
        self
    }

    pub fn customer_directory(mut self, customers: Arc<dyn CustomerDirectory>) -> Self {
        self.customers = Some(customers);
        self
    }

    pub fn customer_analyzer(mut self, analyzer: Arc<dyn CustomerAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn demand_forecaster(mut self, forecaster: Arc<dyn DemandForecaster>) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    /// Validate the configuration and wire up the subsystems.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the configuration is rejected.
    pub fn build(self) -> Result<DecisionOrchestrator, ConfigError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let calculator = Arc::new(FareCalculator::new(config.pricing.clone()));
        let matcher = Arc::new(DriverMatcher::new(config.matching.clone()));
        let drivers = self
            .drivers
            .unwrap_or_else(|| Arc::new(DriverRegistry::new()));
        let customers = self
            .customers
            .unwrap_or_else(|| Arc::new(CustomerRegistry::new()));
        let analyzer = self
            .analyzer
            .unwrap_or_else(|| Arc::new(HeuristicCustomerAnalyzer::new()));
        let forecaster = self.forecaster.unwrap_or_else(|| {
            Arc::new(HeuristicDemandForecaster::new(
                calculator.surge_schedule().clone(),
                config.orchestrator.event_margin_minutes,
            ))
        });

        let monitor = Arc::new(HealthMonitor::new(
            MonitoredSubsystems {
                calculator: Arc::clone(&calculator),
                matcher: Arc::clone(&matcher),
                drivers: Arc::clone(&drivers),
                customers: Arc::clone(&customers),
                analyzer: Arc::clone(&analyzer),
                forecaster: Arc::clone(&forecaster),
            },
            config.health_check.clone(),
        ));

        Ok(DecisionOrchestrator {
            config,
            calculator,
            matcher,
            drivers,
            customers,
            analyzer,
            forecaster,
            monitor,
        })
    }
}

/// Handle to a running health monitor.
pub struct MonitorHandle {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the monitor and wait for its task to exit.
    pub async fn stop(self) {
        self.token.cancel();
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Health monitor task ended abnormally");
            }
        }
    }
}

impl DecisionOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &FareCalculator {
        &self.calculator
    }

    pub fn matcher(&self) -> &DriverMatcher {
        &self.matcher
    }

    /// Latest snapshot published by the health monitor.
    pub fn system_health(&self) -> SystemHealthStatus {
        self.monitor.status()
    }

    /// Run one probe cycle immediately.
    pub async fn check_health(&self) -> SystemHealthStatus {
        self.monitor.run_once().await
    }

    /// Start periodic health probing. Does nothing if health checks are
    /// disabled; the returned handle is still safe to stop.
    pub fn start_health_monitor(&self) -> MonitorHandle {
        let token = CancellationToken::new();
        if !self.config.health_check.enabled {
            tracing::info!("Health monitor disabled");
            return MonitorHandle {
                token,
                handle: None,
            };
        }
        let handle = Arc::clone(&self.monitor).start(token.clone());
        MonitorHandle {
            token,
            handle: Some(handle),
        }
    }

    /// Price, match and advise on one booking.
    ///
    /// Never fails: a pricing failure yields [`DecisionOutcome::Degraded`],
    /// any other branch failure is reported in `warnings`. Collaborator
    /// panics count as branch failures.
    pub async fn process_booking_request(
        &self,
        booking: &BookingRequest,
        external: &ExternalData,
    ) -> DecisionOutcome {
        let started = Instant::now();
        let limit = self.config.orchestrator.task_timeout();

        let (pricing, drivers, customer, forecast) = tokio::join!(
            self.run_pricing(booking, limit),
            bounded(
                "driver availability",
                limit,
                self.drivers.available_drivers(booking)
            ),
            self.lookup_customer(booking, limit),
            bounded(
                "demand forecast",
                limit,
                self.forecaster.forecast(booking, external)
            ),
        );

        let outcome = match pricing {
            Ok((breakdown, estimate)) => {
                let mut warnings = Vec::new();
                let drivers = absorb(booking, &mut warnings, "driver availability", drivers)
                    .unwrap_or_default();
                let customer = absorb(booking, &mut warnings, "customer lookup", customer).flatten();
                let forecast = absorb(booking, &mut warnings, "demand forecast", forecast);

                let (insights, dispatch) = tokio::join!(
                    self.analyze_customer(booking, customer.as_ref(), limit),
                    self.match_driver(booking, drivers, &external.traffic, customer.as_ref(), limit),
                );
                let insights = insights.and_then(|result| {
                    absorb(booking, &mut warnings, "customer analysis", result)
                });
                let dispatch = absorb(booking, &mut warnings, "driver matching", dispatch).flatten();

                let mut operational = operational_hints(
                    booking,
                    external,
                    forecast.as_ref(),
                    self.config.orchestrator.event_margin_minutes,
                );
                if !dispatch.as_ref().is_some_and(DispatchDecision::is_assigned) {
                    operational.push("No driver assigned: escalate to duty dispatcher".to_string());
                }

                let recommendations = Recommendations {
                    pricing: self.pricing_advice(&breakdown),
                    dispatch: dispatch.as_ref().and_then(dispatch_advice),
                    customer: insights,
                    operational,
                };

                DecisionOutcome::Recommended(Recommendation {
                    booking_id: booking.id.clone(),
                    pricing: breakdown,
                    estimate,
                    dispatch,
                    recommendations,
                    system_health: self.system_health(),
                    warnings,
                })
            }
            Err(error) => self.degraded(booking, error),
        };

        let elapsed = started.elapsed();
        metrics::counter!("sentinel_bookings_total", "outcome" => outcome.outcome_label())
            .increment(1);
        metrics::histogram!("sentinel_decision_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            booking_id = %booking.id,
            outcome = outcome.outcome_label(),
            total = %outcome.pricing().total,
            driver_id = outcome
                .dispatch()
                .and_then(|d| d.driver_id.as_deref())
                .unwrap_or("-"),
            duration_ms = elapsed.as_millis() as u64,
            "Booking processed"
        );

        outcome
    }

    /// Assign drivers from the directory to a batch of bookings.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if the driver pool cannot be read.
    pub async fn dispatch_batch(
        &self,
        bookings: &[BookingRequest],
        traffic: &TrafficConditions,
    ) -> Result<Vec<Assignment>, PipelineError> {
        let Some(first) = bookings.first() else {
            return Ok(Vec::new());
        };
        let limit = self.config.orchestrator.task_timeout();
        let drivers = bounded(
            "driver availability",
            limit,
            self.drivers.available_drivers(first),
        )
        .await?;

        let matcher = Arc::clone(&self.matcher);
        let bookings = bookings.to_vec();
        let traffic = traffic.clone();
        let task = tokio::task::spawn_blocking(move || {
            matcher.optimize_utilization(&bookings, &drivers, &traffic)
        });
        joined("batch matching", limit, task).await
    }

    async fn run_pricing(
        &self,
        booking: &BookingRequest,
        limit: Duration,
    ) -> Result<(PriceBreakdown, PriceEstimate), PipelineError> {
        let calculator = Arc::clone(&self.calculator);
        let booking = booking.clone();
        let task = tokio::task::spawn_blocking(move || {
            let breakdown = calculator.calculate_price(&booking, booking.discount_percent)?;
            let estimate = calculator.estimate_price(&booking)?;
            Ok::<_, PricingError>((breakdown, estimate))
        });

        joined("pricing", limit, task)
            .await?
            .map_err(PipelineError::from)
    }

    /// Score the pool on the blocking pool; `None` when there is nobody to
    /// score.
    async fn match_driver(
        &self,
        booking: &BookingRequest,
        drivers: Vec<DriverProfile>,
        traffic: &TrafficConditions,
        customer: Option<&CustomerProfile>,
        limit: Duration,
    ) -> Result<Option<DispatchDecision>, PipelineError> {
        if drivers.is_empty() {
            return Ok(None);
        }
        let matcher = Arc::clone(&self.matcher);
        let booking = booking.clone();
        let traffic = traffic.clone();
        let customer = customer.cloned();
        let task = tokio::task::spawn_blocking(move || {
            matcher.find_optimal_driver(&booking, &drivers, &traffic, customer.as_ref())
        });
        joined("driver matching", limit, task).await.map(Some)
    }

    async fn lookup_customer(
        &self,
        booking: &BookingRequest,
        limit: Duration,
    ) -> Result<Option<CustomerProfile>, PipelineError> {
        match &booking.customer_id {
            Some(id) => bounded("customer lookup", limit, self.customers.get_customer(id)).await,
            None => Ok(None),
        }
    }

    async fn analyze_customer(
        &self,
        booking: &BookingRequest,
        customer: Option<&CustomerProfile>,
        limit: Duration,
    ) -> Option<Result<CustomerInsights, PipelineError>> {
        let customer = customer?;
        Some(bounded("customer analysis", limit, self.analyzer.analyze(customer, booking)).await)
    }

    fn pricing_advice(&self, breakdown: &PriceBreakdown) -> PricingAdvice {
        let note = if breakdown.surge_pricing.is_zero() {
            "Standard rate".to_string()
        } else {
            format!(
                "{} surge x{} applied",
                breakdown.surge_window, breakdown.surge_multiplier
            )
        };
        PricingAdvice {
            confidence: self.config.orchestrator.pricing_confidence,
            surge_window: breakdown.surge_window,
            note,
        }
    }

    fn degraded(&self, booking: &BookingRequest, error: PipelineError) -> DecisionOutcome {
        tracing::warn!(
            booking_id = %booking.id,
            error = %error,
            "Pricing unavailable, returning fallback quote"
        );

        let reason = DegradationReason::from(error);
        let pricing = self.calculator.fallback_breakdown();
        let system_health = self.system_health().with_failure(
            Subsystem::FareCalculator,
            reason.to_string(),
            OverallHealth::Degraded,
        );

        DecisionOutcome::Degraded(DegradedRecommendation {
            booking_id: booking.id.clone(),
            recommendations: Recommendations {
                pricing: PricingAdvice {
                    confidence: self.config.orchestrator.fallback_pricing_confidence,
                    surge_window: pricing.surge_window,
                    note: "Fallback fare: confirm price manually".to_string(),
                },
                dispatch: None,
                customer: None,
                operational: vec![
                    "Pricing unavailable: quote the fallback fare and confirm manually"
                        .to_string(),
                    "Assign a driver manually from the duty roster".to_string(),
                ],
            },
            pricing,
            dispatch: None,
            system_health,
            reason,
        })
    }
}

fn dispatch_advice(decision: &DispatchDecision) -> Option<DispatchAdvice> {
    decision.driver_id.as_ref()?;
    Some(DispatchAdvice {
        confidence: decision.confidence,
        eta_minutes: decision.eta_minutes(Utc::now()),
    })
}

/// Run a branch under the fan-out deadline. A panic inside the branch is
/// caught and reported as [`PipelineError::TaskPanicked`].
async fn bounded<T, E, F>(task: &'static str, limit: Duration, fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, E>>,
    PipelineError: From<E>,
{
    match tokio::time::timeout(limit, AssertUnwindSafe(fut).catch_unwind()).await {
        Ok(Ok(result)) => result.map_err(PipelineError::from),
        Ok(Err(payload)) => Err(PipelineError::TaskPanicked {
            task,
            message: panic_message(payload.as_ref()),
        }),
        Err(_) => Err(PipelineError::Timeout {
            task,
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

/// Wait for a blocking-pool task under the fan-out deadline.
///
/// On timeout the task is left to finish on its own; its result is dropped.
async fn joined<T>(
    task: &'static str,
    limit: Duration,
    handle: JoinHandle<T>,
) -> Result<T, PipelineError> {
    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(PipelineError::TaskPanicked {
            task,
            message: join_error.to_string(),
        }),
        Err(_) => Err(PipelineError::Timeout {
            task,
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Keep a branch result, or log it and record a warning.
fn absorb<T>(
    booking: &BookingRequest,
    warnings: &mut Vec<String>,
    task: &'static str,
    result: Result<T, PipelineError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(
                booking_id = %booking.id,
                task,
                error = %error,
                "Branch failed, continuing without it"
            );
            warnings.push(format!("{task}: {error}"));
            None
        }
    }
}
