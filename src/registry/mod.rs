//! Driver and customer directories.
//!
//! The decision engine never owns driver or customer records. It reads them
//! through the [`DriverDirectory`] and [`CustomerDirectory`] traits, which an
//! embedding application implements over its own data store. The in-memory
//! [`DriverRegistry`] and [`CustomerRegistry`] implementations back tests,
//! the CLI, and small deployments.

mod customer;
mod driver;
mod error;
#[cfg(test)]
mod tests;

pub use customer::*;
pub use driver::*;
pub use error::*;

use crate::booking::{BookingRequest, Coordinates};
use async_trait::async_trait;
use dashmap::DashMap;

/// Read-only lookups against the driver store.
#[async_trait]
pub trait DriverDirectory: Send + Sync + 'static {
    /// Drivers currently able to take `booking`, in a stable order.
    async fn available_drivers(
        &self,
        booking: &BookingRequest,
    ) -> Result<Vec<DriverProfile>, DirectoryError>;

    /// Look up a single driver.
    async fn get_driver(&self, id: &str) -> Result<Option<DriverProfile>, DirectoryError>;
}

/// Read-only lookups against the customer store.
#[async_trait]
pub trait CustomerDirectory: Send + Sync + 'static {
    async fn get_customer(&self, id: &str) -> Result<Option<CustomerProfile>, DirectoryError>;
}

/// Thread-safe in-memory driver store.
///
/// Location and availability updates go through `&self`, so a dispatcher can
/// keep reading snapshots while a telemetry feed writes positions.
///
/// # Examples
///
/// ```
/// use sentinel::booking::Coordinates;
/// use sentinel::registry::{DriverProfile, DriverRegistry};
///
/// let registry = DriverRegistry::new();
/// let driver = DriverProfile::new("drv-1", "Alex", Coordinates::new(51.5, -0.12));
///
/// registry.add_driver(driver).unwrap();
/// assert_eq!(registry.driver_count(), 1);
/// ```
pub struct DriverRegistry {
    drivers: DashMap<String, DriverProfile>,
}

impl DriverRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            drivers: DashMap::new(),
        }
    }

    /// Add a new driver.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateDriver` if a driver with the same ID already exists.
    pub fn add_driver(&self, driver: DriverProfile) -> Result<(), RegistryError> {
        let id = driver.id.clone();
        if self.drivers.contains_key(&id) {
            return Err(RegistryError::DuplicateDriver(id));
        }
        self.drivers.insert(id, driver);
        Ok(())
    }

    /// Remove a driver, returning the last known profile.
    pub fn remove_driver(&self, id: &str) -> Result<DriverProfile, RegistryError> {
        self.drivers
            .remove(id)
            .map(|(_, driver)| driver)
            .ok_or_else(|| RegistryError::DriverNotFound(id.to_string()))
    }

    /// Get a snapshot of one driver.
    pub fn get(&self, id: &str) -> Option<DriverProfile> {
        self.drivers.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of every driver, sorted by ID.
    pub fn all_drivers(&self) -> Vec<DriverProfile> {
        let mut drivers: Vec<_> = self
            .drivers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        drivers.sort_by(|a, b| a.id.cmp(&b.id));
        drivers
    }

    /// Snapshot of drivers flagged available, sorted by ID.
    pub fn available(&self) -> Vec<DriverProfile> {
        let mut drivers = self.all_drivers();
        drivers.retain(|d| d.available);
        drivers
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    /// Record a new position for a driver.
    pub fn update_location(&self, id: &str, location: Coordinates) -> Result<(), RegistryError> {
        let mut driver = self
            .drivers
            .get_mut(id)
            .ok_or_else(|| RegistryError::DriverNotFound(id.to_string()))?;
        driver.location = location;
        Ok(())
    }

    /// Toggle whether a driver can take new jobs.
    pub fn set_availability(&self, id: &str, available: bool) -> Result<(), RegistryError> {
        let mut driver = self
            .drivers
            .get_mut(id)
            .ok_or_else(|| RegistryError::DriverNotFound(id.to_string()))?;
        if driver.available != available {
            tracing::debug!(driver_id = id, available, "Driver availability changed");
        }
        driver.available = available;
        Ok(())
    }

    /// Replace the trailing-window rating.
    pub fn update_rating(&self, id: &str, rating: f64) -> Result<(), RegistryError> {
        let mut driver = self
            .drivers
            .get_mut(id)
            .ok_or_else(|| RegistryError::DriverNotFound(id.to_string()))?;
        driver.rating = rating.clamp(0.0, 5.0);
        Ok(())
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<DriverProfile> for DriverRegistry {
    /// Later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = DriverProfile>>(iter: I) -> Self {
        let registry = Self::new();
        for driver in iter {
            registry.drivers.insert(driver.id.clone(), driver);
        }
        registry
    }
}

#[async_trait]
impl DriverDirectory for DriverRegistry {
    async fn available_drivers(
        &self,
        _booking: &BookingRequest,
    ) -> Result<Vec<DriverProfile>, DirectoryError> {
        Ok(self.available())
    }

    async fn get_driver(&self, id: &str) -> Result<Option<DriverProfile>, DirectoryError> {
        Ok(self.get(id))
    }
}

/// Thread-safe in-memory customer store.
pub struct CustomerRegistry {
    customers: DashMap<String, CustomerProfile>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
        }
    }

    pub fn add_customer(&self, customer: CustomerProfile) -> Result<(), RegistryError> {
        let id = customer.id.clone();
        if self.customers.contains_key(&id) {
            return Err(RegistryError::DuplicateCustomer(id));
        }
        self.customers.insert(id, customer);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<CustomerProfile> {
        self.customers.get(id).map(|entry| entry.value().clone())
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<CustomerProfile> for CustomerRegistry {
    fn from_iter<I: IntoIterator<Item = CustomerProfile>>(iter: I) -> Self {
        let registry = Self::new();
        for customer in iter {
            registry.customers.insert(customer.id.clone(), customer);
        }
        registry
    }
}

#[async_trait]
impl CustomerDirectory for CustomerRegistry {
    async fn get_customer(&self, id: &str) -> Result<Option<CustomerProfile>, DirectoryError> {
        Ok(self.get(id))
    }
}
