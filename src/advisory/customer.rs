use super::{AdvisoryError, CustomerAnalyzer};
use crate::booking::{BookingRequest, ServiceTier};
use crate::registry::CustomerProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    New,
    Regular,
    Loyal,
    Elite,
}

impl LoyaltyTier {
    pub fn from_bookings(total: u32) -> Self {
        match total {
            0..=1 => LoyaltyTier::New,
            2..=9 => LoyaltyTier::Regular,
            10..=49 => LoyaltyTier::Loyal,
            _ => LoyaltyTier::Elite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionRisk {
    Low,
    Medium,
    High,
}

/// Guidance about the customer behind a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInsights {
    pub loyalty_tier: LoyaltyTier,
    pub retention_risk: RetentionRisk,
    /// A tier worth offering instead of the one booked
    pub upsell: Option<ServiceTier>,
    pub notes: Vec<String>,
    pub confidence: f64,
}

/// Rule-based [`CustomerAnalyzer`].
///
/// Recency is measured against the booking's requested time, so the same
/// inputs always give the same insights.
#[derive(Debug, Clone, Default)]
pub struct HeuristicCustomerAnalyzer;

impl HeuristicCustomerAnalyzer {
    const LAPSED_DAYS: i64 = 180;
    const QUIET_DAYS: i64 = 90;

    pub fn new() -> Self {
        Self
    }

    pub fn insights(&self, customer: &CustomerProfile, booking: &BookingRequest) -> CustomerInsights {
        let loyalty_tier = LoyaltyTier::from_bookings(customer.total_bookings);
        let mut notes = Vec::new();

        let days_since_last = customer
            .last_booking_at
            .map(|last| (booking.requested_time - last).num_days());
        let satisfaction = customer.average_satisfaction;

        let retention_risk = match (days_since_last, satisfaction) {
            (Some(days), _) if days > Self::LAPSED_DAYS => {
                notes.push(format!("Returning after {days} days"));
                RetentionRisk::High
            }
            (_, Some(score)) if score < 3.5 => {
                notes.push(format!("Low reported satisfaction ({score:.1}/5)"));
                RetentionRisk::High
            }
            (Some(days), _) if days > Self::QUIET_DAYS => {
                notes.push(format!("Last booked {days} days ago"));
                RetentionRisk::Medium
            }
            (_, Some(score)) if score < 4.2 => RetentionRisk::Medium,
            _ => RetentionRisk::Low,
        };

        let upsell = if customer.corporate_account
            && customer.total_bookings >= 10
            && booking.service_tier != ServiceTier::Vip
        {
            Some(ServiceTier::Vip)
        } else if booking.service_tier == ServiceTier::Standard
            && customer
                .preferred_services
                .contains(&ServiceTier::CloseProtection)
        {
            Some(ServiceTier::CloseProtection)
        } else {
            None
        };

        if let Some(tier) = upsell {
            notes.push(format!("Offer {tier} service"));
        }
        if loyalty_tier >= LoyaltyTier::Loyal {
            notes.push(format!("{} previous bookings", customer.total_bookings));
        }

        CustomerInsights {
            loyalty_tier,
            retention_risk,
            upsell,
            notes,
            confidence: if customer.total_bookings >= 5 { 0.7 } else { 0.4 },
        }
    }
}

#[async_trait]
impl CustomerAnalyzer for HeuristicCustomerAnalyzer {
    async fn analyze(
        &self,
        customer: &CustomerProfile,
        booking: &BookingRequest,
    ) -> Result<CustomerInsights, AdvisoryError> {
        Ok(self.insights(customer, booking))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Location;
    use chrono::{Duration, TimeZone, Utc};

    fn booking(tier: ServiceTier) -> BookingRequest {
        BookingRequest::builder(Location::new(51.5, -0.1, "A"), Location::new(51.6, -0.1, "B"))
            .distance_miles(7.0)
            .service_tier(tier)
            .requested_time(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
            .build()
    }

    #[test]
    fn loyalty_tiers() {
        assert_eq!(LoyaltyTier::from_bookings(0), LoyaltyTier::New);
        assert_eq!(LoyaltyTier::from_bookings(5), LoyaltyTier::Regular);
        assert_eq!(LoyaltyTier::from_bookings(10), LoyaltyTier::Loyal);
        assert_eq!(LoyaltyTier::from_bookings(120), LoyaltyTier::Elite);
    }

    #[test]
    fn lapsed_customer_is_high_risk() {
        let b = booking(ServiceTier::Standard);
        let mut customer = CustomerProfile::new("c", "C");
        customer.total_bookings = 4;
        customer.last_booking_at = Some(b.requested_time - Duration::days(200));

        let insights = HeuristicCustomerAnalyzer::new().insights(&customer, &b);
        assert_eq!(insights.retention_risk, RetentionRisk::High);
        assert_eq!(insights.confidence, 0.4);
    }

    #[test]
    fn frequent_corporate_customer_gets_vip_upsell() {
        let b = booking(ServiceTier::Corporate);
        let mut customer = CustomerProfile::new("c", "Acme");
        customer.corporate_account = true;
        customer.total_bookings = 25;
        customer.average_satisfaction = Some(4.8);
        customer.last_booking_at = Some(b.requested_time - Duration::days(3));

        let insights = HeuristicCustomerAnalyzer::new().insights(&customer, &b);
        assert_eq!(insights.upsell, Some(ServiceTier::Vip));
        assert_eq!(insights.retention_risk, RetentionRisk::Low);
        assert_eq!(insights.loyalty_tier, LoyaltyTier::Loyal);
        assert!(insights.notes.iter().any(|n| n == "Offer vip service"));
    }

    #[tokio::test]
    async fn analyze_never_fails() {
        let customer = CustomerProfile::new("c", "C");
        let insights = HeuristicCustomerAnalyzer::new()
            .analyze(&customer, &booking(ServiceTier::Standard))
            .await
            .unwrap();
        assert_eq!(insights.upsell, None);
        assert_eq!(insights.loyalty_tier, LoyaltyTier::New);
    }
}
