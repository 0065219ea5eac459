//! `lookout config` - show the resolved configuration.

use std::path::PathBuf;

use clap::Args;
use lookout::config::{default_config_path, LookoutConfig};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file to load instead of the default location
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> Result<(), CliError> {
    let (source, config) = match args.file {
        Some(path) => {
            let config = LookoutConfig::load(&path)?;
            (path.display().to_string(), config)
        }
        None => {
            let source = default_config_path()
                .filter(|path| path.exists())
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string());
            (source, LookoutConfig::load_or_default()?)
        }
    };

    println!("# {}", source);
    println!("{}", render(&config));
    Ok(())
}

/// Renders configuration in the INI layout it is loaded from.
fn render(config: &LookoutConfig) -> String {
    format!(
        "[lookout]\n\
         fuel_model = {}\n\
         moisture_scenario = {}\n\
         forecast_hours = {}\n\
         \n\
         [providers]\n\
         timeout_secs = {}\n\
         \n\
         [events]\n\
         capacity = {}",
        config.default_fuel_model_no,
        config.default_moisture_scenario,
        config.forecast_duration_hours,
        config.provider_timeout.as_secs(),
        config.event_capacity
    )
}
