//! Advisory subsystems.
//!
//! Customer analysis and demand forecasting enrich a recommendation but are
//! never required for one. Both sit behind async traits so a deployment can
//! plug in a richer model; the heuristic implementations here are the
//! defaults and produce fixed, explainable figures.

mod customer;
mod demand;
pub mod operational;

pub use customer::{CustomerInsights, HeuristicCustomerAnalyzer, LoyaltyTier, RetentionRisk};
pub use demand::{DemandForecast, DemandLevel, HeuristicDemandForecaster};
pub use operational::operational_hints;

use crate::booking::BookingRequest;
use crate::external::ExternalData;
use crate::registry::CustomerProfile;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by advisory subsystems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisoryError {
    /// The subsystem could not be reached or refused the request.
    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),

    /// The input could not be analysed.
    #[error("Invalid advisory input: {0}")]
    InvalidInput(String),
}

/// Produces retention and upsell guidance for a customer.
#[async_trait]
pub trait CustomerAnalyzer: Send + Sync + 'static {
    async fn analyze(
        &self,
        customer: &CustomerProfile,
        booking: &BookingRequest,
    ) -> Result<CustomerInsights, AdvisoryError>;
}

/// Estimates demand around a booking's pickup time.
#[async_trait]
pub trait DemandForecaster: Send + Sync + 'static {
    async fn forecast(
        &self,
        booking: &BookingRequest,
        external: &ExternalData,
    ) -> Result<DemandForecast, AdvisoryError>;
}
