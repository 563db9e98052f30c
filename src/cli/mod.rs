//! CLI module for Sentinel
//!
//! Command-line interface definitions and handlers for the booking decision
//! engine. Bookings, drivers, customers and feed snapshots are read from JSON
//! files.
//!
//! # Commands
//!
//! - `quote` - Price one or more bookings
//! - `dispatch` - Run the full decision pipeline against a driver roster
//! - `health` - Probe every subsystem once and show the result
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Quote a booking with the default rates
//! sentinel quote booking.json
//!
//! # Dispatch against a roster, JSON output
//! sentinel dispatch booking.json --drivers drivers.json --json
//!
//! # Generate shell completions
//! sentinel completions bash > ~/.bash_completion.d/sentinel
//! ```

pub mod completions;
pub mod config;
pub mod dispatch;
pub mod health;
pub mod input;
pub mod output;
pub mod quote;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sentinel - secure transport booking decision engine
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about = "Pricing, driver matching and dispatch decisions for secure transport bookings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price bookings
    Quote(QuoteArgs),
    /// Run the decision pipeline for bookings
    Dispatch(DispatchArgs),
    /// Probe subsystem health
    Health(HealthArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that build an engine.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "sentinel.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SENTINEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// JSON file holding a booking or an array of bookings
    pub bookings: PathBuf,

    /// Include the min/max estimate range
    #[arg(short, long)]
    pub estimate: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// JSON file holding a booking or an array of bookings
    pub bookings: PathBuf,

    /// JSON file with the driver roster
    #[arg(short, long)]
    pub drivers: PathBuf,

    /// JSON file with customer profiles
    #[arg(long)]
    pub customers: Option<PathBuf>,

    /// JSON file with weather, traffic and event snapshots
    #[arg(short = 'x', long)]
    pub external: Option<PathBuf>,

    /// Assign the whole batch at once, each driver at most once
    #[arg(short, long)]
    pub batch: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// JSON file with the driver roster to probe against
    #[arg(short, long)]
    pub drivers: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "sentinel.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_quote_defaults() {
        let cli = Cli::try_parse_from(["sentinel", "quote", "booking.json"]).unwrap();
        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.bookings, PathBuf::from("booking.json"));
                assert_eq!(args.engine.config, PathBuf::from("sentinel.toml"));
                assert!(!args.estimate);
                assert!(!args.engine.json);
            }
            _ => panic!("Expected Quote command"),
        }
    }

    #[test]
    fn test_cli_parse_quote_with_flags() {
        let cli = Cli::try_parse_from([
            "sentinel", "quote", "b.json", "--estimate", "--json", "-c", "custom.toml",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote(args) => {
                assert!(args.estimate);
                assert!(args.engine.json);
                assert_eq!(args.engine.config, PathBuf::from("custom.toml"));
            }
            _ => panic!("Expected Quote command"),
        }
    }

    #[test]
    fn test_cli_parse_dispatch() {
        let cli = Cli::try_parse_from([
            "sentinel",
            "dispatch",
            "b.json",
            "--drivers",
            "d.json",
            "-x",
            "feeds.json",
            "--batch",
        ])
        .unwrap();
        match cli.command {
            Commands::Dispatch(args) => {
                assert_eq!(args.drivers, PathBuf::from("d.json"));
                assert_eq!(args.external, Some(PathBuf::from("feeds.json")));
                assert!(args.customers.is_none());
                assert!(args.batch);
            }
            _ => panic!("Expected Dispatch command"),
        }
    }

    #[test]
    fn test_cli_dispatch_requires_drivers() {
        assert!(Cli::try_parse_from(["sentinel", "dispatch", "b.json"]).is_err());
    }

    #[test]
    fn test_cli_parse_health() {
        let cli = Cli::try_parse_from(["sentinel", "health", "--json"]).unwrap();
        match cli.command {
            Commands::Health(args) => {
                assert!(args.engine.json);
                assert!(args.drivers.is_none());
            }
            _ => panic!("Expected Health command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["sentinel", "config", "init", "-o", "out.toml", "--force"])
            .unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert_eq!(args.output, PathBuf::from("out.toml"));
                assert!(args.force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_parse_completions() {
        let cli = Cli::try_parse_from(["sentinel", "completions", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions(_)));
    }
}
