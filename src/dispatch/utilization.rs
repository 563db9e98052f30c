use super::{Assignment, DriverMatcher};
use crate::booking::BookingRequest;
use crate::external::TrafficConditions;
use crate::registry::DriverProfile;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

impl DriverMatcher {
    /// Assign drivers to a batch of bookings, each driver at most once.
    ///
    /// Bookings are served highest priority first, then earliest requested
    /// time, then booking ID. Assignments come back in that serving order.
    /// A booking that finds nobody left gets a `NoneAvailable` decision.
    pub fn optimize_utilization(
        &self,
        bookings: &[BookingRequest],
        drivers: &[DriverProfile],
        traffic: &TrafficConditions,
    ) -> Vec<Assignment> {
        self.optimize_utilization_at(bookings, drivers, traffic, Utc::now())
    }

    pub fn optimize_utilization_at(
        &self,
        bookings: &[BookingRequest],
        drivers: &[DriverProfile],
        traffic: &TrafficConditions,
        now: DateTime<Utc>,
    ) -> Vec<Assignment> {
        let mut order: Vec<&BookingRequest> = bookings.iter().collect();
        order.sort_by_key(|b| (Reverse(b.priority), b.requested_time, b.id.clone()));

        let mut pool: Vec<DriverProfile> = drivers.to_vec();
        let mut assignments = Vec::with_capacity(order.len());

        for booking in order {
            let decision = self.find_optimal_driver_at(booking, &pool, traffic, None, now);
            if let Some(driver_id) = &decision.driver_id {
                pool.retain(|d| &d.id != driver_id);
            }
            assignments.push(Assignment {
                booking_id: booking.id.clone(),
                decision,
            });
        }

        let assigned = assignments.iter().filter(|a| a.decision.is_assigned()).count();
        tracing::info!(
            bookings = bookings.len(),
            drivers = drivers.len(),
            assigned,
            "Batch dispatch complete"
        );

        assignments
    }
}
