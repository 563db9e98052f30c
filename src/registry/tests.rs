use super::*;
use crate::booking::{Location, ServiceTier};

fn driver(id: &str) -> DriverProfile {
    DriverProfile::new(id, format!("Driver {id}"), Coordinates::new(51.5, -0.12))
}

fn any_booking() -> BookingRequest {
    BookingRequest::builder(
        Location::new(51.5, -0.12, "A"),
        Location::new(51.52, -0.1, "B"),
    )
    .distance_miles(2.0)
    .build()
}

#[test]
fn test_certification_serialization() {
    let json = serde_json::to_string(&Certification::SiaLicence).unwrap();
    assert_eq!(json, r#""sia_licence""#);

    let parsed: Certification = serde_json::from_str(r#""vip_protocol""#).unwrap();
    assert_eq!(parsed, Certification::VipProtocol);
}

#[test]
fn test_certification_for_service() {
    assert_eq!(
        Certification::for_service(ServiceTier::CloseProtection),
        Certification::CloseProtection
    );
    assert_eq!(
        Certification::for_service(ServiceTier::Standard),
        Certification::AdvancedDriving
    );
}

#[test]
fn test_driver_profile_deserializes_with_defaults() {
    let json = r#"{
        "id": "drv-7",
        "name": "Sam",
        "location": {"lat": 51.5, "lng": -0.1},
        "rating": 4.2,
        "certifications": ["sia_licence"]
    }"#;
    let profile: DriverProfile = serde_json::from_str(json).unwrap();
    assert!(profile.available);
    assert!(profile.is_sia_licensed());
    assert_eq!(profile.max_distance_km, 50.0);
    assert_eq!(profile.performance, PerformanceRecord::default());
}

#[test]
fn test_add_driver() {
    let registry = DriverRegistry::new();
    registry.add_driver(driver("a")).unwrap();
    assert_eq!(registry.driver_count(), 1);
    assert_eq!(registry.get("a").unwrap().name, "Driver a");
}

#[test]
fn test_add_duplicate_driver_fails() {
    let registry = DriverRegistry::new();
    registry.add_driver(driver("a")).unwrap();
    let result = registry.add_driver(driver("a"));
    assert!(matches!(result, Err(RegistryError::DuplicateDriver(id)) if id == "a"));
}

#[test]
fn test_remove_driver() {
    let registry = DriverRegistry::new();
    registry.add_driver(driver("a")).unwrap();
    let removed = registry.remove_driver("a").unwrap();
    assert_eq!(removed.id, "a");
    assert_eq!(registry.driver_count(), 0);
    assert!(matches!(
        registry.remove_driver("a"),
        Err(RegistryError::DriverNotFound(_))
    ));
}

#[test]
fn test_all_drivers_sorted_by_id() {
    let registry: DriverRegistry = ["c", "a", "b"].into_iter().map(driver).collect();
    let ids: Vec<_> = registry.all_drivers().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_update_location() {
    let registry = DriverRegistry::new();
    registry.add_driver(driver("a")).unwrap();
    registry
        .update_location("a", Coordinates::new(52.2, 0.12))
        .unwrap();
    assert_eq!(registry.get("a").unwrap().location, Coordinates::new(52.2, 0.12));

    let missing = registry.update_location("zz", Coordinates::new(0.0, 0.0));
    assert!(matches!(missing, Err(RegistryError::DriverNotFound(_))));
}

#[test]
fn test_set_availability_filters_available() {
    let registry: DriverRegistry = ["a", "b"].into_iter().map(driver).collect();
    registry.set_availability("a", false).unwrap();

    let available = registry.available();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, "b");
}

#[test]
fn test_update_rating_clamps() {
    let registry = DriverRegistry::new();
    registry.add_driver(driver("a")).unwrap();
    registry.update_rating("a", 7.0).unwrap();
    assert_eq!(registry.get("a").unwrap().rating, 5.0);
}

#[tokio::test]
async fn test_driver_directory_returns_available_only() {
    let registry: DriverRegistry = vec![driver("a"), driver("b").unavailable(), driver("c")]
        .into_iter()
        .collect();

    let drivers = registry.available_drivers(&any_booking()).await.unwrap();
    let ids: Vec<_> = drivers.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    assert!(registry.get_driver("b").await.unwrap().is_some());
    assert!(registry.get_driver("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_customer_directory_lookup() {
    let registry = CustomerRegistry::new();
    let mut customer = CustomerProfile::new("cust-1", "Acme Ltd");
    customer.preferred_drivers.push("drv-9".to_string());
    registry.add_customer(customer).unwrap();

    let found = registry.get_customer("cust-1").await.unwrap().unwrap();
    assert!(found.prefers_driver("drv-9"));
    assert!(!found.prefers_driver("drv-1"));
    assert!(registry.get_customer("cust-2").await.unwrap().is_none());
}

#[test]
fn test_add_duplicate_customer_fails() {
    let registry = CustomerRegistry::new();
    registry
        .add_customer(CustomerProfile::new("c", "One"))
        .unwrap();
    assert!(matches!(
        registry.add_customer(CustomerProfile::new("c", "Two")),
        Err(RegistryError::DuplicateCustomer(_))
    ));
    assert_eq!(registry.customer_count(), 1);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_available_is_subset_sorted(flags in proptest::collection::vec(any::<bool>(), 0..30)) {
            let registry = DriverRegistry::new();
            for (i, available) in flags.iter().enumerate() {
                let mut d = driver(&format!("drv-{i:03}"));
                d.available = *available;
                registry.add_driver(d).unwrap();
            }

            let available = registry.available();
            prop_assert_eq!(available.len(), flags.iter().filter(|f| **f).count());
            prop_assert!(available.windows(2).all(|w| w[0].id < w[1].id));
        }
    }
}
