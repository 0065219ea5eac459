//! `lookout forecast` - decode a point forecast document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use lookout::forecast::{ForecastDocument, ForecastSeries, WeatherSample};
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Forecast document (JSON)
    pub file: PathBuf,

    /// Application time to select the nearest sample for (RFC 3339)
    #[arg(long, conflicts_with = "all")]
    pub at: Option<String>,

    /// Print every sample in source order
    #[arg(long)]
    pub all: bool,

    /// Print samples as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ForecastArgs) -> Result<(), CliError> {
    let output = render(&args)?;
    println!("{}", output);
    Ok(())
}

fn render(args: &ForecastArgs) -> Result<String, CliError> {
    let series = load_series(&args.file)?;
    if series.is_empty() {
        return Err(CliError::EmptyForecast);
    }

    let samples = if args.all {
        series.samples().to_vec()
    } else {
        let at = args.at.as_deref().map(parse_time).transpose()?;
        vec![series.sample_at(at)]
    };

    if args.json {
        return Ok(serde_json::to_string_pretty(&samples)?);
    }
    Ok(samples
        .iter()
        .map(format_sample)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn load_series(path: &Path) -> Result<ForecastSeries, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = ForecastDocument::from_json(&text)?;
    let series = document.to_series();
    debug!(path = %path.display(), samples = series.len(), "forecast decoded");
    Ok(series)
}

fn parse_time(text: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CliError::InvalidTime(text.to_string()))
}

/// One sample per line, e.g. `2016-07-04T12:00:00Z  80°F  RH 15%  wind 10 kts @ 270°  sky 20%`.
pub fn format_sample(sample: &WeatherSample) -> String {
    format!(
        "{}  {}°F  RH {}%  wind {} kts @ {}°  sky {}%",
        sample.time.format("%Y-%m-%dT%H:%M:%SZ"),
        sample.air_temperature_f,
        sample.relative_humidity_pct,
        sample.wind_speed_kts,
        sample.wind_direction_deg,
        sample.sky_cover_pct
    )
}
