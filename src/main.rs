//! procsnap - version 0.1.0
//!
//! Process-table snapshot tool with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing::{debug, Level};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_snapshot, command_totals, command_tree};
use config::{resolve_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr so stdout stays machine-readable.
fn setup_logging(level: &LogLevel) {
    let log_level = match level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The file may set the log level, so logging starts once config is resolved
    let config = load_validated_config(&args)?;
    setup_logging(&config.log_level()?);

    match &args.command {
        Commands::Snapshot { format, strict } => command_snapshot(*format, *strict, &config),
        Commands::Tree { root } => command_tree(*root, &config),
        Commands::Totals { pid, other, format } => command_totals(*pid, other, *format, &config),
        Commands::Check => command_check(&config),
        Commands::Config { format } => command_config(format.clone(), &config),
    }
}
