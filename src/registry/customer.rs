use crate::booking::{CustomerId, DriverId, ServiceTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Booking history and preferences for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred_drivers: Vec<DriverId>,
    /// Service tiers the customer has historically booked
    #[serde(default)]
    pub preferred_services: HashSet<ServiceTier>,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub last_booking_at: Option<DateTime<Utc>>,
    /// Mean satisfaction the customer has reported (0-5)
    #[serde(default)]
    pub average_satisfaction: Option<f64>,
    #[serde(default)]
    pub corporate_account: bool,
}

impl CustomerProfile {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            preferred_drivers: Vec::new(),
            preferred_services: HashSet::new(),
            total_bookings: 0,
            last_booking_at: None,
            average_satisfaction: None,
            corporate_account: false,
        }
    }

    pub fn prefers_driver(&self, driver_id: &str) -> bool {
        self.preferred_drivers.iter().any(|id| id == driver_id)
    }
}
