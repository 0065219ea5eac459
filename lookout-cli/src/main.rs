//! Lookout CLI - Command-line interface
//!
//! Inspects forecast documents and the lookout configuration using the
//! `lookout` library.

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use commands::config::ConfigArgs;
use commands::forecast::ForecastArgs;

#[derive(Debug, Parser)]
#[command(name = "lookout", version, about = "Fire lookout forecast tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a forecast document and print the applicable sample
    Forecast(ForecastArgs),

    /// Print the resolved configuration
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Forecast(args) => commands::forecast::run(args),
        Commands::Config(args) => commands::config::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
