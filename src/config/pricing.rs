//! Fare calculation configuration

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multipliers applied per surge window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeConfig {
    /// Saturday, Sunday, or Friday from 18:00
    pub weekend: Decimal,
    /// 22:00-06:00
    pub night: Decimal,
    /// 06:00-09:00 and 17:00-20:00
    pub peak: Decimal,
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            weekend: dec!(1.2),
            night: dec!(1.3),
            peak: dec!(1.5),
        }
    }
}

impl SurgeConfig {
    /// Highest multiplier any window can apply (never below 1.0).
    pub fn max_multiplier(&self) -> Decimal {
        [self.weekend, self.night, self.peak]
            .into_iter()
            .fold(Decimal::ONE, Decimal::max)
    }
}

/// Pricing configuration. All money values are GBP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub per_mile_rate: Decimal,
    pub minimum_fare: Decimal,
    /// Fraction of the base fare charged when an SIA-licensed driver is required
    pub security_premium_rate: Decimal,
    pub waiting_rate_per_minute: Decimal,
    pub vat_rate: Decimal,
    pub max_distance_miles: f64,
    pub min_passengers: u8,
    pub max_passengers: u8,
    /// Flat surcharge keyed by IATA airport code
    pub airport_surcharges: BTreeMap<String, Decimal>,
    /// Surcharge for airport codes missing from the table
    pub default_airport_surcharge: Decimal,
    pub surge: SurgeConfig,
    /// Offset from UTC used to read the pickup wall clock
    pub utc_offset_minutes: i32,
    /// Pre-VAT fare quoted when the pricing pipeline cannot produce a quote
    pub fallback_fare: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let airport_surcharges = [
            ("LHR", dec!(15.00)),
            ("LGW", dec!(12.00)),
            ("STN", dec!(10.00)),
            ("LTN", dec!(10.00)),
            ("LCY", dec!(8.00)),
        ]
        .into_iter()
        .map(|(code, fee)| (code.to_string(), fee))
        .collect();

        Self {
            per_mile_rate: dec!(3.50),
            minimum_fare: dec!(8.00),
            security_premium_rate: dec!(0.25),
            waiting_rate_per_minute: dec!(0.50),
            vat_rate: dec!(0.20),
            max_distance_miles: 500.0,
            min_passengers: 1,
            max_passengers: 8,
            airport_surcharges,
            default_airport_surcharge: dec!(10.00),
            surge: SurgeConfig::default(),
            utc_offset_minutes: 0,
            fallback_fare: dec!(50.00),
        }
    }
}
