//! Fare calculation.
//!
//! [`FareCalculator`] turns a [`BookingRequest`] into an itemised
//! [`PriceBreakdown`]. It is deterministic and side-effect free: the same
//! booking, configuration and discount always produce the same breakdown,
//! which is what billing disputes are settled against.
//!
//! # Example
//!
//! ```rust
//! use sentinel::booking::{BookingRequest, Location};
//! use sentinel::config::PricingConfig;
//! use sentinel::pricing::FareCalculator;
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let booking = BookingRequest::builder(
//!     Location::new(51.5074, -0.1278, "Trafalgar Square"),
//!     Location::new(51.5033, -0.1195, "London Eye"),
//! )
//! .requested_time(Utc.with_ymd_and_hms(2024, 3, 6, 14, 0, 0).unwrap())
//! .distance_miles(10.0)
//! .build();
//!
//! let calculator = FareCalculator::new(PricingConfig::default());
//! let quote = calculator.calculate_price(&booking, None).unwrap();
//! assert_eq!(quote.total, dec!(42.00));
//! ```

mod breakdown;
mod error;
mod surge;


pub use breakdown::{round_money, PriceBreakdown, PriceEstimate};
pub use error::{PricingError, Violation};
pub use surge::{SurgeSchedule, SurgeWindow};

use crate::booking::BookingRequest;
use crate::config::PricingConfig;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes prices from a [`PricingConfig`].
#[derive(Debug, Clone)]
pub struct FareCalculator {
    config: PricingConfig,
    surge: SurgeSchedule,
}

impl FareCalculator {
    pub fn new(config: PricingConfig) -> Self {
        let surge = SurgeSchedule::new(config.surge.clone(), config.utc_offset_minutes);
        Self { config, surge }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn surge_schedule(&self) -> &SurgeSchedule {
        &self.surge
    }

    /// Check every pricing constraint and report all violations at once.
    pub fn validate(&self, booking: &BookingRequest) -> Result<(), PricingError> {
        let violations = self.violations(booking, booking.discount_percent);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PricingError::Validation(violations))
        }
    }

    fn violations(&self, booking: &BookingRequest, discount: Option<Decimal>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let distance = booking.distance_miles;

        if !distance.is_finite() {
            violations.push(Violation::DistanceNotFinite);
        } else if distance <= 0.0 {
            violations.push(Violation::DistanceNotPositive {
                distance_miles: distance,
            });
        } else if distance > self.config.max_distance_miles {
            violations.push(Violation::DistanceTooLong {
                distance_miles: distance,
                max_miles: self.config.max_distance_miles,
            });
        }

        let (min, max) = (self.config.min_passengers, self.config.max_passengers);
        if !(min..=max).contains(&booking.passengers) {
            violations.push(Violation::PassengersOutOfRange {
                passengers: booking.passengers,
                min,
                max,
            });
        }

        let has_code = booking
            .airport_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty());
        if booking.airport_transfer && !has_code {
            violations.push(Violation::MissingAirportCode);
        }

        if let Some(percent) = discount {
            if percent < Decimal::ZERO || percent > HUNDRED {
                violations.push(Violation::DiscountOutOfRange { percent });
            }
        }

        violations
    }

    /// Price a booking at its requested time.
    ///
    /// `discount_percent` is an optional account discount (0-100). The
    /// discount never takes the subtotal below the configured minimum fare.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` with every violated constraint if the
    /// booking (or the discount) is invalid. No partial quote is produced.
    pub fn calculate_price(
        &self,
        booking: &BookingRequest,
        discount_percent: Option<Decimal>,
    ) -> Result<PriceBreakdown, PricingError> {
        let violations = self.violations(booking, discount_percent);
        if !violations.is_empty() {
            return Err(PricingError::Validation(violations));
        }

        let (window, multiplier) = self.surge.resolve(booking.requested_time);
        let breakdown = self.compute(booking, discount_percent, window, multiplier)?;

        tracing::debug!(
            booking_id = %booking.id,
            surge_window = %window,
            total = %breakdown.total,
            "Calculated price"
        );

        Ok(breakdown)
    }

    /// Quote a `[min, max]` range plus the price at the requested time.
    ///
    /// `min` applies no surge, `max` applies the highest configured multiplier.
    pub fn estimate_price(&self, booking: &BookingRequest) -> Result<PriceEstimate, PricingError> {
        let discount = booking.discount_percent;
        let estimated = self.calculate_price(booking, discount)?;

        let low = self.compute(booking, discount, SurgeWindow::Standard, Decimal::ONE)?;
        let high = self.compute(
            booking,
            discount,
            SurgeWindow::Peak,
            self.surge.config().max_multiplier(),
        )?;

        Ok(PriceEstimate {
            min: low.total,
            estimated: estimated.total,
            max: high.total,
        })
    }

    /// The fixed quote used when the pricing pipeline cannot run.
    pub fn fallback_breakdown(&self) -> PriceBreakdown {
        let subtotal = round_money(self.config.fallback_fare);
        let vat = round_money(subtotal * self.config.vat_rate);
        PriceBreakdown {
            base_fare: subtotal,
            security_premium: Decimal::ZERO,
            airport_surcharge: Decimal::ZERO,
            surge_pricing: Decimal::ZERO,
            waiting_time: Decimal::ZERO,
            discount: Decimal::ZERO,
            subtotal,
            vat,
            total: subtotal + vat,
            surge_multiplier: Decimal::ONE,
            surge_window: SurgeWindow::Standard,
        }
    }

    fn compute(
        &self,
        booking: &BookingRequest,
        discount_percent: Option<Decimal>,
        window: SurgeWindow,
        multiplier: Decimal,
    ) -> Result<PriceBreakdown, PricingError> {
        let config = &self.config;
        let distance = Decimal::try_from(booking.distance_miles).map_err(|_| {
            PricingError::Conversion {
                field: "distance_miles",
            }
        })?;

        let base_fare = round_money((distance * config.per_mile_rate).max(config.minimum_fare));

        let security_premium = if booking.requires_sia_driver {
            round_money(base_fare * config.security_premium_rate)
        } else {
            Decimal::ZERO
        };

        let airport_surcharge = if booking.airport_transfer {
            booking
                .airport_code
                .as_deref()
                .map(|code| code.trim().to_uppercase())
                .and_then(|code| config.airport_surcharges.get(&code).copied())
                .unwrap_or(config.default_airport_surcharge)
        } else {
            Decimal::ZERO
        };
        let airport_surcharge = round_money(airport_surcharge);

        // Surge never touches the flat airport surcharge or waiting time.
        let surge_pricing =
            round_money((base_fare + security_premium) * (multiplier - Decimal::ONE));

        let waiting_time =
            round_money(Decimal::from(booking.duration_minutes) * config.waiting_rate_per_minute);

        let gross = base_fare + security_premium + airport_surcharge + surge_pricing + waiting_time;

        let requested = discount_percent
            .map(|pct| round_money(gross * pct / HUNDRED))
            .unwrap_or(Decimal::ZERO);
        let headroom = (gross - round_money(config.minimum_fare)).max(Decimal::ZERO);
        let discount = requested.min(headroom).max(Decimal::ZERO);

        let subtotal = gross - discount;
        let vat = round_money(subtotal * config.vat_rate);

        Ok(PriceBreakdown {
            base_fare,
            security_premium,
            airport_surcharge,
            surge_pricing,
            waiting_time,
            discount,
            subtotal,
            vat,
            total: subtotal + vat,
            surge_multiplier: multiplier,
            surge_window: window,
        })
    }
}
