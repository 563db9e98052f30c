//! Price breakdown values.

use super::surge::SurgeWindow;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round to whole pence, half away from zero. The result always carries two
/// decimal places so `42` renders as `42.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// An itemised quote for one booking.
///
/// Every component is rounded to pence before it is summed, so
/// `subtotal` and `total` are exact sums of the fields shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_fare: Decimal,
    pub security_premium: Decimal,
    pub airport_surcharge: Decimal,
    pub surge_pricing: Decimal,
    pub waiting_time: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
    pub surge_multiplier: Decimal,
    pub surge_window: SurgeWindow,
}

impl PriceBreakdown {
    /// Sum of the chargeable components before any discount.
    pub fn gross(&self) -> Decimal {
        self.base_fare
            + self.security_premium
            + self.airport_surcharge
            + self.surge_pricing
            + self.waiting_time
    }

    /// True when the additive invariants hold to the penny.
    pub fn is_consistent(&self) -> bool {
        self.subtotal == self.gross() - self.discount
            && self.total == self.subtotal + self.vat
            && [
                self.base_fare,
                self.security_premium,
                self.airport_surcharge,
                self.surge_pricing,
                self.waiting_time,
                self.discount,
                self.subtotal,
                self.vat,
                self.total,
            ]
            .iter()
            .all(|amount| *amount >= Decimal::ZERO)
    }
}

/// A price range for quoting before the exact pickup time is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// Total with no surge applied
    pub min: Decimal,
    /// Total at the booking's own requested time
    pub estimated: Decimal,
    /// Total at the highest configured surge multiplier
    pub max: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(8.125)), dec!(8.13));
        assert_eq!(round_money(dec!(8.124)), dec!(8.12));
        assert_eq!(round_money(dec!(35)), dec!(35));
        assert_eq!(round_money(dec!(35)).to_string(), "35.00");
    }

    #[test]
    fn consistency_check_detects_drift() {
        let mut breakdown = PriceBreakdown {
            base_fare: dec!(35.00),
            security_premium: Decimal::ZERO,
            airport_surcharge: Decimal::ZERO,
            surge_pricing: Decimal::ZERO,
            waiting_time: Decimal::ZERO,
            discount: Decimal::ZERO,
            subtotal: dec!(35.00),
            vat: dec!(7.00),
            total: dec!(42.00),
            surge_multiplier: Decimal::ONE,
            surge_window: SurgeWindow::Standard,
        };
        assert!(breakdown.is_consistent());

        breakdown.total = dec!(42.01);
        assert!(!breakdown.is_consistent());
    }
}
