//! Dispatch command implementation

use crate::booking::BookingRequest;
use crate::cli::input::{read_json, read_json_list};
use crate::cli::output::{format_assignments_table, format_outcome};
use crate::cli::DispatchArgs;
use crate::config::EngineConfig;
use crate::external::ExternalData;
use crate::orchestrator::DecisionOrchestrator;
use crate::registry::{CustomerProfile, CustomerRegistry, DriverProfile, DriverRegistry};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;

/// Build an orchestrator over the rosters named on the command line.
pub fn build_orchestrator(
    config: EngineConfig,
    drivers: Vec<DriverProfile>,
    customers: Vec<CustomerProfile>,
) -> Result<DecisionOrchestrator, Box<dyn std::error::Error>> {
    let drivers: DriverRegistry = drivers.into_iter().collect();
    let customers: CustomerRegistry = customers.into_iter().collect();

    tracing::debug!(
        drivers = drivers.driver_count(),
        customers = customers.customer_count(),
        "Loaded rosters"
    );

    Ok(DecisionOrchestrator::builder()
        .config(config)
        .driver_directory(Arc::new(drivers))
        .customer_directory(Arc::new(customers))
        .build()?)
}

/// Run the decision pipeline for every booking in the input file.
pub async fn handle_dispatch(
    args: &DispatchArgs,
    config: EngineConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let bookings: Vec<BookingRequest> = read_json_list(&args.bookings)?;
    if bookings.is_empty() {
        return Err(format!("No bookings found in {}", args.bookings.display()).into());
    }
    let drivers: Vec<DriverProfile> = read_json(&args.drivers)?;
    let customers: Vec<CustomerProfile> = match &args.customers {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let external: ExternalData = match &args.external {
        Some(path) => read_json(path)?,
        None => ExternalData::default(),
    };

    let orchestrator = build_orchestrator(config, drivers, customers)?;

    if args.batch {
        let assignments = orchestrator
            .dispatch_batch(&bookings, &external.traffic)
            .await?;
        return if args.engine.json {
            Ok(serde_json::to_string_pretty(&json!({ "assignments": assignments }))?)
        } else {
            Ok(format_assignments_table(&assignments))
        };
    }

    let outcomes = join_all(
        bookings
            .iter()
            .map(|booking| orchestrator.process_booking_request(booking, &external)),
    )
    .await;

    if args.engine.json {
        Ok(serde_json::to_string_pretty(&json!({ "decisions": outcomes }))?)
    } else {
        Ok(outcomes
            .iter()
            .map(format_outcome)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
