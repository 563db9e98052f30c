//! Output formatting helpers for CLI commands

use crate::booking::BookingId;
use crate::dispatch::{Assignment, DecisionStrategy, DispatchDecision};
use crate::health::{OverallHealth, SubsystemState, SystemHealthStatus};
use crate::orchestrator::DecisionOutcome;
use crate::pricing::{PriceBreakdown, PriceEstimate};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;

/// View model for a priced booking
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub booking_id: BookingId,
    pub pricing: PriceBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<PriceEstimate>,
}

fn money(amount: Decimal) -> String {
    format!("£{}", amount)
}

/// Format quotes as one table of line items per booking
pub fn format_quotes_table(quotes: &[QuoteView]) -> String {
    let mut output = String::new();

    for quote in quotes {
        let p = &quote.pricing;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![format!("Booking {}", quote.booking_id), "Amount".to_string()]);

        let surge_label = format!("Surge ({} x{})", p.surge_window, p.surge_multiplier);
        let rows = [
            ("Base fare", p.base_fare),
            ("Security premium", p.security_premium),
            ("Airport surcharge", p.airport_surcharge),
            (surge_label.as_str(), p.surge_pricing),
            ("Waiting time", p.waiting_time),
            ("Discount (deducted)", p.discount),
            ("Subtotal", p.subtotal),
            ("VAT", p.vat),
        ];
        for (label, amount) in rows {
            table.add_row(vec![Cell::new(label), Cell::new(money(amount))]);
        }
        table.add_row(vec![
            Cell::new("Total".bold().to_string()),
            Cell::new(money(p.total).bold().to_string()),
        ]);

        writeln!(output, "{}", table).ok();
        if let Some(estimate) = &quote.estimate {
            writeln!(
                output,
                "Estimate: {} - {} (at requested time {})",
                money(estimate.min),
                money(estimate.max),
                money(estimate.estimated)
            )
            .ok();
        }
    }

    output.trim_end().to_string()
}

/// Format quotes as JSON
pub fn format_quotes_json(quotes: &[QuoteView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "quotes": quotes }))
}

/// Colored label for a dispatch strategy
fn strategy_label(strategy: DecisionStrategy) -> String {
    match strategy {
        DecisionStrategy::Scored => "scored".green().to_string(),
        DecisionStrategy::NearestFallback => "nearest (fallback)".yellow().to_string(),
        DecisionStrategy::NoneAvailable => "none available".red().to_string(),
    }
}

fn overall_label(overall: OverallHealth) -> String {
    match overall {
        OverallHealth::Healthy => "Healthy".green().to_string(),
        OverallHealth::Degraded => "Degraded".yellow().to_string(),
        OverallHealth::Critical => "Critical".red().to_string(),
    }
}

/// Get status icon for a subsystem state
pub fn state_icon(state: SubsystemState) -> &'static str {
    match state {
        SubsystemState::Online => "✓",
        SubsystemState::Offline => "✗",
        SubsystemState::Fallback => "~",
    }
}

fn write_decision(output: &mut String, decision: &DispatchDecision) {
    match &decision.driver_id {
        Some(driver_id) => {
            writeln!(
                output,
                "Driver: {} (score {:.2}, confidence {:.2}, {})",
                driver_id.bold(),
                decision.score,
                decision.confidence,
                strategy_label(decision.strategy)
            )
            .ok();
            writeln!(
                output,
                "Route: {:.1} km, {:.0} min",
                decision.route.distance_km, decision.route.duration_minutes
            )
            .ok();
        }
        None => {
            writeln!(output, "Driver: {}", strategy_label(decision.strategy)).ok();
        }
    }
    for reason in &decision.reasoning {
        writeln!(output, "  - {}", reason).ok();
    }
}

/// Format a pipeline outcome as pretty text
pub fn format_outcome(outcome: &DecisionOutcome) -> String {
    let mut output = String::new();
    let pricing = outcome.pricing();

    let header = if outcome.is_degraded() {
        "DEGRADED".yellow().bold()
    } else {
        "RECOMMENDED".green().bold()
    };
    writeln!(output, "Booking {}: {}", outcome.booking_id(), header).ok();
    writeln!(
        output,
        "Price: {} ({} surge, VAT {})",
        money(pricing.total).bold(),
        pricing.surge_window,
        money(pricing.vat)
    )
    .ok();

    match outcome {
        DecisionOutcome::Recommended(r) => {
            writeln!(
                output,
                "Estimate: {} - {}",
                money(r.estimate.min),
                money(r.estimate.max)
            )
            .ok();
        }
        DecisionOutcome::Degraded(d) => {
            writeln!(output, "Reason: {}", d.reason).ok();
        }
    }

    match outcome.dispatch() {
        Some(decision) => write_decision(&mut output, decision),
        None => {
            writeln!(output, "Driver: {}", "not evaluated".red()).ok();
        }
    }

    let recommendations = outcome.recommendations();
    writeln!(
        output,
        "Pricing advice: {} (confidence {:.2})",
        recommendations.pricing.note, recommendations.pricing.confidence
    )
    .ok();
    if let Some(insights) = &recommendations.customer {
        writeln!(
            output,
            "Customer: {:?}, retention risk {:?}",
            insights.loyalty_tier, insights.retention_risk
        )
        .ok();
        if let Some(upsell) = insights.upsell {
            writeln!(output, "  Upsell: {}", upsell).ok();
        }
    }
    for hint in &recommendations.operational {
        writeln!(output, "{} {}", "!".yellow(), hint).ok();
    }

    if let DecisionOutcome::Recommended(r) = outcome {
        for warning in &r.warnings {
            writeln!(output, "{} {}", "warning:".yellow(), warning).ok();
        }
    }

    writeln!(
        output,
        "System: {}",
        overall_label(outcome.system_health().overall)
    )
    .ok();

    output.trim_end().to_string()
}

/// Format batch assignments as a table
pub fn format_assignments_table(assignments: &[Assignment]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Booking", "Driver", "Score", "Strategy", "Distance"]);

    for a in assignments {
        let d = &a.decision;
        table.add_row(vec![
            Cell::new(&a.booking_id),
            Cell::new(d.driver_id.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.2}", d.score)),
            Cell::new(strategy_label(d.strategy)),
            Cell::new(format!("{:.1} km", d.route.distance_km)),
        ]);
    }

    table.to_string()
}

/// Format health status as a table with a summary line
pub fn format_health_table(status: &SystemHealthStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Subsystem", "State", "Response", "Accuracy", "Last error"]);

    for (subsystem, health) in &status.subsystems {
        let state = format!("{} {}", state_icon(health.state), health.state);
        let state = match health.state {
            SubsystemState::Online => state.green().to_string(),
            SubsystemState::Offline => state.red().to_string(),
            SubsystemState::Fallback => state.yellow().to_string(),
        };
        table.add_row(vec![
            Cell::new(subsystem),
            Cell::new(state),
            Cell::new(
                health
                    .last_response_ms
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{:.0}%", health.accuracy * 100.0)),
            Cell::new(health.last_error.as_deref().unwrap_or("")),
        ]);
    }

    format!(
        "Status: {} ({:.0}% online)\n{}",
        overall_label(status.overall),
        status.online_ratio() * 100.0,
        table
    )
}
