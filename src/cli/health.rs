//! Health command implementation

use crate::cli::dispatch::build_orchestrator;
use crate::cli::input::read_json;
use crate::cli::output::format_health_table;
use crate::cli::HealthArgs;
use crate::config::EngineConfig;
use crate::registry::DriverProfile;

/// Probe every subsystem once and report the snapshot.
///
/// Without a roster the matcher is probed against a synthetic driver.
pub async fn handle_health(
    args: &HealthArgs,
    config: EngineConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let drivers: Vec<DriverProfile> = match &args.drivers {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let orchestrator = build_orchestrator(config, drivers, Vec::new())?;
    let status = orchestrator.check_health().await;

    if args.engine.json {
        Ok(serde_json::to_string_pretty(&status)?)
    } else {
        Ok(format_health_table(&status))
    }
}
