use clap::Parser;
use sentinel::cli::input::load_engine_config;
use sentinel::cli::{
    dispatch, handle_completions, handle_config_init, health, quote, Cli, Commands,
    ConfigCommands, EngineArgs,
};
use sentinel::config::EngineConfig;
use sentinel::logging::init_tracing;

fn engine_config(args: &EngineArgs) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = load_engine_config(args)?;
    init_tracing(&config.logging)?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quote(args) => match engine_config(&args.engine) {
            Ok(config) => quote::handle_quote(&args, &config),
            Err(e) => Err(e),
        },
        Commands::Dispatch(args) => match engine_config(&args.engine) {
            Ok(config) => dispatch::handle_dispatch(&args, config).await,
            Err(e) => Err(e),
        },
        Commands::Health(args) => match engine_config(&args.engine) {
            Ok(config) => health::handle_health(&args, config).await,
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
