//! Weather forecast series and nearest-sample lookup.
//!
//! The weather provider returns a [`ForecastDocument`]; decoding it yields a
//! [`ForecastSeries`] of [`WeatherSample`]s that is queried by time.
//!
//! # Example
//!
//! ```ignore
//! use lookout::forecast::ForecastDocument;
//!
//! let doc = ForecastDocument::from_json(&text)?;
//! let series = doc.to_series();
//! let now = series.sample_at(Some(chrono::Utc::now()));
//! ```

mod document;
mod sample;
mod series;

pub use document::{
    ForecastDocument, SpatialDomain, SpatioTemporalWeather, TemporalDomain, TemporalWeather,
};
pub use sample::{truncate_value, WeatherSample};
pub use series::{all_forecasts, minutes_between, sample_at, ForecastSeries};
