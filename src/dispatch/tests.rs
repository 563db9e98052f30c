use super::*;
use crate::booking::{BookingPriority, Coordinates, Location, ServiceTier};
use crate::registry::PerformanceRecord;
use chrono::TimeZone;

const PICKUP: Coordinates = Coordinates::new(51.5074, -0.1278);

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 6, 14, 0, 0).unwrap()
}

fn booking() -> BookingRequest {
    BookingRequest::builder(
        Location::new(PICKUP.lat, PICKUP.lng, "Trafalgar Square"),
        Location::new(51.4700, -0.4543, "Heathrow"),
    )
    .id("bk-1")
    .distance_miles(15.0)
    .requested_time(now())
    .build()
}

/// A point roughly `km` north of the pickup.
fn north_of_pickup(km: f64) -> Coordinates {
    Coordinates::new(PICKUP.lat + km / 111.195, PICKUP.lng)
}

fn driver(id: &str, km: f64, rating: f64) -> DriverProfile {
    DriverProfile::new(id, format!("Driver {id}"), north_of_pickup(km)).with_rating(rating)
}

fn calm() -> TrafficConditions {
    TrafficConditions::default()
}

#[test]
fn nearer_driver_wins_with_equal_records() {
    let matcher = DriverMatcher::default();
    let drivers = vec![driver("far", 8.0, 4.8), driver("near", 1.0, 4.8)];

    let decision = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());

    assert_eq!(decision.driver_id.as_deref(), Some("near"));
    assert_eq!(decision.strategy, DecisionStrategy::Scored);
    assert!(decision.confidence > 0.0 && decision.confidence <= 1.0);
    assert!((decision.route.distance_km - 1.0).abs() < 0.05);
}

#[test]
fn proximity_outweighs_rating_and_record() {
    let matcher = DriverMatcher::default();
    let near = driver("near", 1.0, 4.0);
    let star = driver("star", 15.0, 5.0).with_performance(PerformanceRecord {
        on_time_percentage: 100.0,
        customer_satisfaction: 5.0,
        completion_rate: 1.0,
        average_response_minutes: 0.0,
    });

    let decision = matcher.find_optimal_driver_at(&booking(), &[star, near], &calm(), None, now());

    assert_eq!(decision.driver_id.as_deref(), Some("near"));
    assert!((decision.score - 0.833).abs() < 1e-3);
}

#[test]
fn close_protection_specialist_beats_slightly_closer_generalist() {
    let matcher = DriverMatcher::default();
    let generalist = driver("gen", 2.0, 4.2);
    let specialist = driver("cp", 2.5, 4.9)
        .with_service(ServiceTier::CloseProtection)
        .with_certification(Certification::SiaLicence)
        .with_certification(Certification::CloseProtection);
    let booking = BookingRequest {
        service_tier: ServiceTier::CloseProtection,
        requires_sia_driver: true,
        ..booking()
    };
    let mut generalist_sia = generalist.clone();
    generalist_sia
        .certifications
        .insert(Certification::SiaLicence);

    let decision =
        matcher.find_optimal_driver_at(&booking, &[generalist_sia, specialist], &calm(), None, now());

    assert_eq!(decision.driver_id.as_deref(), Some("cp"));
    assert!(decision.reasoning.iter().any(|r| r == "SIA licensed"));
    assert!(decision
        .reasoning
        .iter()
        .any(|r| r.contains("close_protection")));
}

#[test]
fn empty_candidates_yield_none_available() {
    let matcher = DriverMatcher::default();
    let decision = matcher.find_optimal_driver_at(&booking(), &[], &calm(), None, now());

    assert_eq!(decision.driver_id, None);
    assert_eq!(decision.strategy, DecisionStrategy::NoneAvailable);
    assert_eq!(decision.confidence, 0.0);
    assert!(decision.estimated_arrival.is_none());
    assert!(!decision.reasoning.is_empty());
}

#[test]
fn unavailable_and_distant_drivers_are_filtered() {
    let matcher = DriverMatcher::default();
    let drivers = vec![
        driver("off", 0.5, 5.0).unavailable(),
        driver("remote", 30.0, 5.0).with_max_distance_km(25.0),
    ];
    let decision = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
    assert_eq!(decision.strategy, DecisionStrategy::NoneAvailable);
}

#[test]
fn sia_requirement_excludes_unlicensed_drivers() {
    let matcher = DriverMatcher::default();
    let booking = BookingRequest {
        requires_sia_driver: true,
        ..booking()
    };
    let drivers = vec![
        driver("unlicensed", 0.5, 5.0),
        driver("licensed", 6.0, 4.0).with_certification(Certification::SiaLicence),
    ];

    let decision = matcher.find_optimal_driver_at(&booking, &drivers, &calm(), None, now());
    assert_eq!(decision.driver_id.as_deref(), Some("licensed"));
}

#[test]
fn ties_keep_first_candidate() {
    let matcher = DriverMatcher::default();
    let drivers = vec![driver("first", 3.0, 4.5), driver("second", 3.0, 4.5)];
    let decision = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
    assert_eq!(decision.driver_id.as_deref(), Some("first"));
}

#[test]
fn decisions_are_deterministic() {
    let matcher = DriverMatcher::default();
    let drivers = vec![
        driver("a", 4.0, 4.1),
        driver("b", 2.0, 3.9),
        driver("c", 6.0, 4.9),
    ];
    let first = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
    let second = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
    assert_eq!(first, second);
}

#[test]
fn preferred_driver_is_reported() {
    let matcher = DriverMatcher::default();
    let mut customer = CustomerProfile::new("cust-1", "Acme");
    customer.preferred_drivers.push("fav".to_string());

    let drivers = vec![driver("fav", 2.0, 4.5), driver("other", 2.0, 4.5)];
    let decision =
        matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), Some(&customer), now());

    assert_eq!(decision.driver_id.as_deref(), Some("fav"));
    assert!(decision
        .reasoning
        .contains(&"Customer's preferred driver".to_string()));
}

#[test]
fn scoring_failure_falls_back_to_nearest() {
    let matcher = DriverMatcher::default();
    let drivers = vec![
        driver("far", 5.0, 4.9),
        driver("broken", 1.0, f64::NAN),
        driver("mid", 3.0, 4.0),
    ];

    let decision = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());

    assert_eq!(decision.strategy, DecisionStrategy::NearestFallback);
    assert_eq!(decision.driver_id.as_deref(), Some("broken"));
    assert_eq!(decision.confidence, 0.5);
    assert!(decision.reasoning[0].starts_with("Scoring unavailable"));
    assert!(decision.is_fallback());
}

#[test]
fn congestion_delays_arrival() {
    let matcher = DriverMatcher::default();
    let drivers = vec![driver("a", 5.0, 4.5)];
    let jammed = TrafficConditions {
        congestion_level: 100.0,
        ..TrafficConditions::default()
    };

    let free = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
    let slow = matcher.find_optimal_driver_at(&booking(), &drivers, &jammed, None, now());

    // 5 km at 30 km/h vs 15 km/h
    assert_eq!(free.eta_minutes(now()), Some(10));
    assert_eq!(slow.eta_minutes(now()), Some(20));
}

#[test]
fn slow_responder_eta_penalty() {
    let matcher = DriverMatcher::default();
    let slow = driver("slow", 5.0, 4.5).with_performance(PerformanceRecord {
        average_response_minutes: 8.0,
        ..PerformanceRecord::default()
    });
    let decision = matcher.find_optimal_driver_at(&booking(), &[slow], &calm(), None, now());
    assert_eq!(decision.eta_minutes(now()), Some(12));
}

#[test]
fn utilization_serves_priority_first_and_never_double_books() {
    let matcher = DriverMatcher::default();
    let standard = BookingRequest {
        id: "bk-standard".into(),
        ..booking()
    };
    let vip = BookingRequest {
        id: "bk-vip".into(),
        priority: BookingPriority::Vip,
        requested_time: now() + Duration::hours(2),
        ..booking()
    };
    let drivers = vec![driver("only", 1.0, 4.8)];

    let assignments = matcher.optimize_utilization_at(&[standard, vip], &drivers, &calm(), now());

    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].booking_id.as_str(), "bk-vip");
    assert_eq!(assignments[0].decision.driver_id.as_deref(), Some("only"));
    assert_eq!(assignments[1].booking_id.as_str(), "bk-standard");
    assert_eq!(
        assignments[1].decision.strategy,
        DecisionStrategy::NoneAvailable
    );
}

#[test]
fn utilization_orders_equal_priority_by_time_then_id() {
    let matcher = DriverMatcher::default();
    let later = BookingRequest {
        id: "bk-a".into(),
        requested_time: now() + Duration::minutes(30),
        ..booking()
    };
    let earlier_b = BookingRequest {
        id: "bk-b".into(),
        ..booking()
    };
    let earlier_c = BookingRequest {
        id: "bk-c".into(),
        ..booking()
    };
    let drivers = vec![driver("d1", 1.0, 4.5), driver("d2", 2.0, 4.5), driver("d3", 3.0, 4.5)];

    let assignments =
        matcher.optimize_utilization_at(&[later, earlier_c, earlier_b], &drivers, &calm(), now());
    let order: Vec<_> = assignments.iter().map(|a| a.booking_id.as_str()).collect();
    assert_eq!(order, vec!["bk-b", "bk-c", "bk-a"]);

    let mut assigned: Vec<_> = assignments
        .iter()
        .filter_map(|a| a.decision.driver_id.clone())
        .collect();
    assigned.sort();
    assigned.dedup();
    assert_eq!(assigned.len(), 3);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_selected_driver_is_eligible(
            specs in proptest::collection::vec((0.0f64..40.0, 0.0f64..=5.0, any::<bool>()), 0..12)
        ) {
            let matcher = DriverMatcher::default();
            let drivers: Vec<_> = specs
                .iter()
                .enumerate()
                .map(|(i, (km, rating, available))| {
                    let mut d = driver(&format!("d{i}"), *km, *rating).with_max_distance_km(30.0);
                    d.available = *available;
                    d
                })
                .collect();

            let decision = matcher.find_optimal_driver_at(&booking(), &drivers, &calm(), None, now());
            prop_assert!((0.0..=1.0).contains(&decision.confidence));

            match &decision.driver_id {
                Some(id) => {
                    let chosen = drivers.iter().find(|d| &d.id == id).unwrap();
                    prop_assert!(chosen.available);
                    prop_assert!(chosen.location.distance_km(&PICKUP) <= 30.0);
                }
                None => {
                    let any_eligible = drivers
                        .iter()
                        .any(|d| d.available && d.location.distance_km(&PICKUP) <= 30.0);
                    prop_assert!(!any_eligible);
                }
            }
        }
    }
}
