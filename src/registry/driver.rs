use crate::booking::{Coordinates, DriverId, ServiceTier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Credentials a driver can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certification {
    /// SIA licence, required for bookings that ask for a licensed driver
    SiaLicence,
    CloseProtection,
    VipProtocol,
    CorporateSecurity,
    AdvancedDriving,
    FirstAid,
}

impl Certification {
    /// The certification that qualifies a driver for a service tier.
    pub fn for_service(tier: ServiceTier) -> Certification {
        match tier {
            ServiceTier::Standard => Certification::AdvancedDriving,
            ServiceTier::CloseProtection => Certification::CloseProtection,
            ServiceTier::Vip => Certification::VipProtocol,
            ServiceTier::Corporate => Certification::CorporateSecurity,
        }
    }
}

/// Rolling performance figures for a driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Percentage of jobs arriving on time (0-100)
    pub on_time_percentage: f64,
    /// Mean customer satisfaction (0-5)
    pub customer_satisfaction: f64,
    /// Fraction of accepted jobs completed (0-1)
    pub completion_rate: f64,
    /// Mean minutes between offer and acceptance
    pub average_response_minutes: f64,
}

impl Default for PerformanceRecord {
    fn default() -> Self {
        Self {
            on_time_percentage: 90.0,
            customer_satisfaction: 4.5,
            completion_rate: 0.95,
            average_response_minutes: 3.0,
        }
    }
}

/// A driver as seen by the dispatcher.
///
/// Location and availability change between dispatch cycles through the
/// registry; the matcher only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: DriverId,
    pub name: String,
    pub location: Coordinates,
    /// Trailing-window rating (0-5)
    pub rating: f64,
    #[serde(default)]
    pub performance: PerformanceRecord,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Service tiers the driver prefers to work
    #[serde(default)]
    pub service_types: HashSet<ServiceTier>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: HashSet<Certification>,
    /// Furthest the driver will travel to a pickup
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
}

fn default_available() -> bool {
    true
}

fn default_max_distance_km() -> f64 {
    50.0
}

impl DriverProfile {
    pub fn new(id: impl Into<DriverId>, name: impl Into<String>, location: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            rating: 4.5,
            performance: PerformanceRecord::default(),
            available: true,
            service_types: HashSet::new(),
            skills: Vec::new(),
            certifications: HashSet::new(),
            max_distance_km: default_max_distance_km(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_performance(mut self, performance: PerformanceRecord) -> Self {
        self.performance = performance;
        self
    }

    pub fn with_service(mut self, tier: ServiceTier) -> Self {
        self.service_types.insert(tier);
        self
    }

    pub fn with_certification(mut self, certification: Certification) -> Self {
        self.certifications.insert(certification);
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = km;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn is_sia_licensed(&self) -> bool {
        self.certifications.contains(&Certification::SiaLicence)
    }
}
