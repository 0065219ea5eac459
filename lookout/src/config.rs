//! Lookout configuration.
//!
//! Settings can be built in code with the `with_*` methods or loaded from an
//! INI file:
//!
//! ```ini
//! [lookout]
//! fuel_model = 5
//! moisture_scenario = Very Low Dead, Fully Cured Herb
//! forecast_hours = 72
//!
//! [providers]
//! timeout_secs = 30
//!
//! [events]
//! capacity = 16
//! ```
//!
//! Keys that are absent keep their defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::events::DEFAULT_EVENT_CAPACITY;

/// Default fuel model number for new lookouts (FM5, brush).
pub const DEFAULT_FUEL_MODEL_NO: u32 = 5;

/// Default fuel moisture scenario for new lookouts.
pub const DEFAULT_MOISTURE_SCENARIO: &str = "Very Low Dead, Fully Cured Herb";

/// Default forecast duration requested by scouts (in hours).
pub const DEFAULT_FORECAST_HOURS: u32 = 72;

/// Default limit on any single provider call (in seconds).
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("Failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// A key holds a value of the wrong shape.
    #[error("Invalid value for {section}.{key}: '{value}'")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

/// Configuration shared by all scouts and lookouts.
#[derive(Clone, Debug, PartialEq)]
pub struct LookoutConfig {
    /// Fuel model number used when a lookout does not name one.
    pub default_fuel_model_no: u32,

    /// Moisture scenario used when a lookout does not name one.
    pub default_moisture_scenario: String,

    /// Forecast duration requested from the weather provider.
    pub forecast_duration_hours: u32,

    /// Limit on any single provider call.
    pub provider_timeout: Duration,

    /// Events buffered per subscriber on each scout's bus.
    pub event_capacity: usize,
}

impl Default for LookoutConfig {
    fn default() -> Self {
        Self {
            default_fuel_model_no: DEFAULT_FUEL_MODEL_NO,
            default_moisture_scenario: DEFAULT_MOISTURE_SCENARIO.to_string(),
            forecast_duration_hours: DEFAULT_FORECAST_HOURS,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl LookoutConfig {
    pub fn with_default_fuel_model(mut self, model_no: u32) -> Self {
        self.default_fuel_model_no = model_no;
        self
    }

    pub fn with_default_moisture_scenario(mut self, name: impl Into<String>) -> Self {
        self.default_moisture_scenario = name.into();
        self
    }

    pub fn with_forecast_hours(mut self, hours: u32) -> Self {
        self.forecast_duration_hours = hours;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Loads configuration from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Loads configuration from the default path, or defaults if it is missing.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Builds configuration from parsed INI contents.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(no) = parse_key(ini, "lookout", "fuel_model")? {
            config.default_fuel_model_no = no;
        }
        if let Some(name) = raw_key(ini, "lookout", "moisture_scenario") {
            config.default_moisture_scenario = name.to_string();
        }
        if let Some(hours) = parse_key(ini, "lookout", "forecast_hours")? {
            config.forecast_duration_hours = hours;
        }
        if let Some(secs) = parse_key::<u64>(ini, "providers", "timeout_secs")? {
            config.provider_timeout = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse_key(ini, "events", "capacity")? {
            config.event_capacity = capacity;
        }

        Ok(config)
    }
}

/// Default config file location: `<config dir>/lookout/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lookout").join("config.ini"))
}

fn raw_key<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|s| s.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_key<T: FromStr>(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    raw_key(ini, section, key)
        .map(|value| {
            value.parse().map_err(|_| ConfigError::InvalidValue {
                section,
                key,
                value: value.to_string(),
            })
        })
        .transpose()
}
