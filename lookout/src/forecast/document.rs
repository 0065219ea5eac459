//! Raw point-forecast document returned by the weather provider.
//!
//! # Document Shape
//!
//! ```json
//! {
//!   "spatioTemporalWeather": {
//!     "range": { ... },
//!     "spatialDomain": {
//!       "temporalDomain": {
//!         "temporalWeather": [
//!           { "@time": "2016-07-04T12:00:00Z", "values": ["85", "12", "8", "225", "40"] }
//!         ]
//!       }
//!     }
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sample::WeatherSample;
use super::series::ForecastSeries;

/// Point forecast document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDocument {
    pub spatio_temporal_weather: SpatioTemporalWeather,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatioTemporalWeather {
    /// Field descriptions supplied by the provider, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
    pub spatial_domain: SpatialDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialDomain {
    pub temporal_domain: TemporalDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalDomain {
    #[serde(default)]
    pub temporal_weather: Vec<TemporalWeather>,
}

/// One raw forecast entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalWeather {
    #[serde(rename = "@time")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl ForecastDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Raw entries in source order.
    pub fn entries(&self) -> &[TemporalWeather] {
        &self
            .spatio_temporal_weather
            .spatial_domain
            .temporal_domain
            .temporal_weather
    }

    /// Provider field descriptions, if present.
    pub fn range(&self) -> Option<&Value> {
        self.spatio_temporal_weather.range.as_ref()
    }

    /// Decodes every entry into a [`ForecastSeries`], keeping source order.
    pub fn to_series(&self) -> ForecastSeries {
        self.entries()
            .iter()
            .map(|entry| WeatherSample::from_raw(entry.time, &entry.values))
            .collect::<Vec<_>>()
            .into()
    }
}
