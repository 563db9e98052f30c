//! Booking request model.
//!
//! A [`BookingRequest`] is the immutable input to every pricing and dispatch
//! decision. It is built once (usually via [`BookingRequest::builder`]) and
//! only ever read afterwards.

pub mod geo;

pub use geo::{haversine_km, miles_to_km, Coordinates};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque booking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Driver identifier as issued by the driver directory.
pub type DriverId = String;

/// Customer identifier as issued by the customer directory.
pub type CustomerId = String;

/// Service tier requested by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTier {
    #[default]
    Standard,
    CloseProtection,
    Vip,
    Corporate,
}

impl ServiceTier {
    pub const ALL: [ServiceTier; 4] = [
        ServiceTier::Standard,
        ServiceTier::CloseProtection,
        ServiceTier::Vip,
        ServiceTier::Corporate,
    ];
}

impl FromStr for ServiceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(ServiceTier::Standard),
            "close_protection" => Ok(ServiceTier::CloseProtection),
            "vip" => Ok(ServiceTier::Vip),
            "corporate" => Ok(ServiceTier::Corporate),
            _ => Err(format!("Unknown service tier: {}", s)),
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTier::Standard => write!(f, "standard"),
            ServiceTier::CloseProtection => write!(f, "close_protection"),
            ServiceTier::Vip => write!(f, "vip"),
            ServiceTier::Corporate => write!(f, "corporate"),
        }
    }
}

/// Vehicle class requested for the journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    #[default]
    Saloon,
    Executive,
    Suv,
    Armoured,
    Minibus,
}

/// Dispatch priority used when several bookings compete for the same drivers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum BookingPriority {
    #[default]
    Standard,
    Priority,
    Vip,
}

impl BookingPriority {
    /// Numeric rank, higher is served first.
    pub fn rank(&self) -> u8 {
        match self {
            BookingPriority::Standard => 1,
            BookingPriority::Priority => 2,
            BookingPriority::Vip => 3,
        }
    }
}

/// A named point on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: Coordinates,
    #[serde(default)]
    pub address: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            coordinates: Coordinates::new(lat, lng),
            address: address.into(),
        }
    }
}

/// A transport request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: BookingId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub pickup: Location,
    pub dropoff: Location,
    pub requested_time: DateTime<Utc>,
    pub distance_miles: f64,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub service_tier: ServiceTier,
    #[serde(default)]
    pub vehicle_class: VehicleClass,
    pub passengers: u8,
    #[serde(default)]
    pub requires_sia_driver: bool,
    #[serde(default)]
    pub airport_transfer: bool,
    #[serde(default)]
    pub airport_code: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Corporate account discount in percent (0-100).
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub priority: BookingPriority,
}

impl BookingRequest {
    pub fn builder(pickup: Location, dropoff: Location) -> BookingRequestBuilder {
        BookingRequestBuilder::new(pickup, dropoff)
    }
}

/// Builder for [`BookingRequest`].
#[derive(Debug, Clone)]
pub struct BookingRequestBuilder {
    request: BookingRequest,
}

impl BookingRequestBuilder {
    fn new(pickup: Location, dropoff: Location) -> Self {
        Self {
            request: BookingRequest {
                id: BookingId::generate(),
                customer_id: None,
                pickup,
                dropoff,
                requested_time: Utc::now(),
                distance_miles: 0.0,
                duration_minutes: 0,
                service_tier: ServiceTier::Standard,
                vehicle_class: VehicleClass::Saloon,
                passengers: 1,
                requires_sia_driver: false,
                airport_transfer: false,
                airport_code: None,
                special_requests: None,
                discount_percent: None,
                priority: BookingPriority::Standard,
            },
        }
    }

    pub fn id(mut self, id: impl Into<BookingId>) -> Self {
        self.request.id = id.into();
        self
    }

    pub fn customer(mut self, customer_id: impl Into<CustomerId>) -> Self {
        self.request.customer_id = Some(customer_id.into());
        self
    }

    pub fn requested_time(mut self, at: DateTime<Utc>) -> Self {
        self.request.requested_time = at;
        self
    }

    pub fn distance_miles(mut self, miles: f64) -> Self {
        self.request.distance_miles = miles;
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.request.duration_minutes = minutes;
        self
    }

    pub fn service_tier(mut self, tier: ServiceTier) -> Self {
        self.request.service_tier = tier;
        self
    }

    pub fn vehicle_class(mut self, class: VehicleClass) -> Self {
        self.request.vehicle_class = class;
        self
    }

    pub fn passengers(mut self, passengers: u8) -> Self {
        self.request.passengers = passengers;
        self
    }

    pub fn requires_sia_driver(mut self, required: bool) -> Self {
        self.request.requires_sia_driver = required;
        self
    }

    /// Mark as an airport transfer. `None` leaves the code unset, which
    /// fails validation.
    pub fn airport_transfer(mut self, code: Option<&str>) -> Self {
        self.request.airport_transfer = true;
        self.request.airport_code = code.map(str::to_string);
        self
    }

    pub fn special_requests(mut self, text: impl Into<String>) -> Self {
        self.request.special_requests = Some(text.into());
        self
    }

    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.request.discount_percent = Some(percent);
        self
    }

    pub fn priority(mut self, priority: BookingPriority) -> Self {
        self.request.priority = priority;
        self
    }

    pub fn build(self) -> BookingRequest {
        self.request
    }
}
