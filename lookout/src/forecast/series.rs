//! Time-indexed forecast series with nearest-sample lookup.
//!
//! # Selection Rule
//!
//! ```text
//!   sample[i]            midpoint             sample[i+1]
//!   ─────●──────────────────┼──────────────────●─────
//!        ◄── selects i ────►◄── selects i+1 ──►
//!                  (elapsed < span/2)  (elapsed >= span/2)
//! ```
//!
//! Query times before the first sample select the first sample; times at or
//! after the last sample select the last sample.

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use super::sample::WeatherSample;

/// Ordered sequence of weather samples for one location.
///
/// Ordering is taken from the source and never re-sorted. A series is
/// replaced wholesale on every successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    samples: Vec<WeatherSample>,
}

impl ForecastSeries {
    /// Creates a series from samples in source order.
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self { samples }
    }

    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the samples in order.
    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    /// Returns the earliest sample, or `INVALID` for an empty series.
    pub fn first_sample(&self) -> WeatherSample {
        self.sample_at(None)
    }

    /// Returns the sample applicable at `time`.
    ///
    /// `None` selects the first sample. An empty series yields
    /// [`WeatherSample::INVALID`].
    pub fn sample_at(&self, time: Option<DateTime<Utc>>) -> WeatherSample {
        sample_at(Some(self), time)
    }
}

impl From<Vec<WeatherSample>> for ForecastSeries {
    fn from(samples: Vec<WeatherSample>) -> Self {
        Self::new(samples)
    }
}

/// Returns the sample applicable at `time` in an optional series.
///
/// Never fails: absent or empty series produce the `INVALID` sentinel.
pub fn sample_at(series: Option<&ForecastSeries>, time: Option<DateTime<Utc>>) -> WeatherSample {
    let samples = match series {
        Some(series) if !series.is_empty() => series.samples(),
        _ => {
            warn!("missing weather data, returning invalid sample");
            return WeatherSample::INVALID;
        }
    };

    let Some(time) = time else {
        return samples[0];
    };

    let last = samples.len() - 1;
    for (i, sample) in samples.iter().enumerate() {
        if time < sample.time || i == last {
            return *sample;
        }
        let span = minutes_between(sample.time, samples[i + 1].time);
        let elapsed = minutes_between(sample.time, time);
        if elapsed < span / 2.0 {
            return *sample;
        }
    }

    samples[last]
}

/// Returns every sample of an optional series, in order.
///
/// An absent series yields an empty vector and logs an error.
pub fn all_forecasts(series: Option<&ForecastSeries>) -> Vec<WeatherSample> {
    match series {
        Some(series) => series.samples().to_vec(),
        None => {
            error!("missing weather data, no forecasts available");
            Vec::new()
        }
    }
}

/// Minutes from `start` to `end`, fractional, negative when `end` is earlier.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}
