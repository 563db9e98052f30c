//! Benchmarks for fare calculation.
//!
//! A quote should cost a few microseconds so the orchestrator's pricing
//! branch never dominates a decision.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use sentinel::booking::{BookingRequest, Location};
use sentinel::config::PricingConfig;
use sentinel::pricing::FareCalculator;

fn booking(sia: bool, airport: Option<&str>) -> BookingRequest {
    BookingRequest::builder(
        Location::new(51.5074, -0.1278, "Trafalgar Square"),
        Location::new(51.4700, -0.4543, "Heathrow"),
    )
    .id("bench")
    .distance_miles(18.4)
    .duration_minutes(15)
    .requires_sia_driver(sia)
    .airport_transfer(airport)
    .requested_time(Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap())
    .build()
}

fn bench_calculate_price(c: &mut Criterion) {
    let calculator = FareCalculator::new(PricingConfig::default());
    let plain = booking(false, None);
    let loaded = booking(true, Some("LHR"));

    c.bench_function("calculate_price_plain", |b| {
        b.iter(|| black_box(calculator.calculate_price(black_box(&plain), None).unwrap()))
    });

    c.bench_function("calculate_price_sia_airport_discount", |b| {
        b.iter(|| {
            black_box(
                calculator
                    .calculate_price(black_box(&loaded), Some(dec!(10)))
                    .unwrap(),
            )
        })
    });
}

fn bench_estimate_price(c: &mut Criterion) {
    let calculator = FareCalculator::new(PricingConfig::default());
    let booking = booking(true, Some("LGW"));

    c.bench_function("estimate_price", |b| {
        b.iter(|| black_box(calculator.estimate_price(black_box(&booking)).unwrap()))
    });
}

criterion_group!(benches, bench_calculate_price, bench_estimate_price);
criterion_main!(benches);
