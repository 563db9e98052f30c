//! Shared fixtures for Sentinel integration tests.
//!
//! Provides booking and driver builders plus directory and advisory stubs
//! that always fail, for exercising the degraded paths.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sentinel::advisory::{
    AdvisoryError, CustomerAnalyzer, CustomerInsights, DemandForecast, DemandForecaster,
};
use sentinel::booking::{BookingRequest, Coordinates, Location};
use sentinel::external::ExternalData;
use sentinel::registry::{
    CustomerDirectory, CustomerProfile, CustomerRegistry, DirectoryError, DriverDirectory,
    DriverProfile, DriverRegistry, PerformanceRecord,
};
use std::sync::Arc;

// =============================================================================
// Well-Known Times
// =============================================================================

/// Wednesday 6 March 2024, 14:00 UTC: outside every surge window.
pub fn wednesday_2pm() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 6, 14, 0, 0).unwrap()
}

/// Saturday 9 March 2024, 14:00 UTC: weekend surge.
pub fn saturday_2pm() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap()
}

/// Saturday 9 March 2024, 23:00 UTC: weekend and night overlap.
pub fn saturday_11pm() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap()
}

// =============================================================================
// Builders
// =============================================================================

/// Central London pickup, 10 miles, no extras.
pub fn make_booking(id: &str, miles: f64, at: DateTime<Utc>) -> BookingRequest {
    BookingRequest::builder(
        Location::new(51.5074, -0.1278, "Trafalgar Square"),
        Location::new(51.4700, -0.4543, "Heathrow Terminal 5"),
    )
    .id(id)
    .distance_miles(miles)
    .requested_time(at)
    .build()
}

/// A driver `km` kilometres north of the standard pickup.
pub fn make_driver(id: &str, km_north: f64, rating: f64) -> DriverProfile {
    // One degree of latitude is ~111.2 km.
    let location = Coordinates::new(51.5074 + km_north / 111.195, -0.1278);
    DriverProfile::new(id, id, location).with_rating(rating)
}

pub fn perfect_record() -> PerformanceRecord {
    PerformanceRecord {
        on_time_percentage: 100.0,
        customer_satisfaction: 5.0,
        completion_rate: 1.0,
        average_response_minutes: 0.0,
    }
}

pub fn driver_registry(drivers: impl IntoIterator<Item = DriverProfile>) -> Arc<DriverRegistry> {
    Arc::new(drivers.into_iter().collect())
}

pub fn customer_registry(
    customers: impl IntoIterator<Item = CustomerProfile>,
) -> Arc<CustomerRegistry> {
    Arc::new(customers.into_iter().collect())
}

pub fn calm_external() -> ExternalData {
    ExternalData::default()
}

// =============================================================================
// Failing Stubs
// =============================================================================

pub struct OfflineDrivers;

#[async_trait]
impl DriverDirectory for OfflineDrivers {
    async fn available_drivers(
        &self,
        _booking: &BookingRequest,
    ) -> Result<Vec<DriverProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("driver directory offline".to_string()))
    }

    async fn get_driver(&self, _id: &str) -> Result<Option<DriverProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("driver directory offline".to_string()))
    }
}

pub struct OfflineCustomers;

#[async_trait]
impl CustomerDirectory for OfflineCustomers {
    async fn get_customer(&self, _id: &str) -> Result<Option<CustomerProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("customer directory offline".to_string()))
    }
}

pub struct OfflineAnalyzer;

#[async_trait]
impl CustomerAnalyzer for OfflineAnalyzer {
    async fn analyze(
        &self,
        _customer: &CustomerProfile,
        _booking: &BookingRequest,
    ) -> Result<CustomerInsights, AdvisoryError> {
        Err(AdvisoryError::Unavailable("analysis offline".to_string()))
    }
}

pub struct OfflineForecaster;

#[async_trait]
impl DemandForecaster for OfflineForecaster {
    async fn forecast(
        &self,
        _booking: &BookingRequest,
        _external: &ExternalData,
    ) -> Result<DemandForecast, AdvisoryError> {
        Err(AdvisoryError::Unavailable("forecast offline".to_string()))
    }
}
