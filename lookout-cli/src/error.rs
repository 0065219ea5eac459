//! CLI error type.

use std::path::PathBuf;

use lookout::config::ConfigError;
use thiserror::Error;

/// Errors reported by CLI commands. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid forecast document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Invalid time '{0}': expected RFC 3339, e.g. 2016-07-04T12:00:00Z")]
    InvalidTime(String),

    #[error("Forecast contains no samples")]
    EmptyForecast,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
