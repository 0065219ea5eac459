//! Weather samples and raw value decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One time-stamped weather observation or prediction.
///
/// Numeric fields hold truncated integers; a field that was missing or
/// unparsable in the source is `NaN`. Use [`WeatherSample::is_valid`] to
/// detect the [`WeatherSample::INVALID`] sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub time: DateTime<Utc>,
    pub air_temperature_f: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed_kts: f64,
    pub wind_direction_deg: f64,
    pub sky_cover_pct: f64,
}

impl WeatherSample {
    /// Sentinel returned when no forecast data is available.
    ///
    /// All numeric fields are `NaN` and the time is the Unix epoch.
    pub const INVALID: WeatherSample = WeatherSample {
        time: DateTime::<Utc>::UNIX_EPOCH,
        air_temperature_f: f64::NAN,
        relative_humidity_pct: f64::NAN,
        wind_speed_kts: f64::NAN,
        wind_direction_deg: f64::NAN,
        sky_cover_pct: f64::NAN,
    };

    /// Decodes a sample from raw provider values.
    ///
    /// Values are read in the order air temperature, relative humidity,
    /// wind speed, wind direction, sky cover. Missing trailing values
    /// decode as `NaN`.
    pub fn from_raw(time: DateTime<Utc>, values: &[Value]) -> Self {
        let field = |index: usize| values.get(index).map_or(f64::NAN, truncate_value);
        Self {
            time,
            air_temperature_f: field(0),
            relative_humidity_pct: field(1),
            wind_speed_kts: field(2),
            wind_direction_deg: field(3),
            sky_cover_pct: field(4),
        }
    }

    /// Returns false for the `INVALID` sentinel or any sample whose
    /// numeric fields are all missing.
    pub fn is_valid(&self) -> bool {
        [
            self.air_temperature_f,
            self.relative_humidity_pct,
            self.wind_speed_kts,
            self.wind_direction_deg,
            self.sky_cover_pct,
        ]
        .iter()
        .any(|v| !v.is_nan())
    }
}

/// Truncates a raw JSON value to an integer-valued `f64`.
///
/// Numbers are truncated toward zero. Strings are parsed for a leading
/// integer (optional sign then digits, surrounding text ignored), so
/// `"72.9"` and `"72F"` both decode to 72. Anything else is `NaN`.
pub fn truncate_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map_or(f64::NAN, f64::trunc),
        Value::String(s) => parse_leading_int(s),
        _ => f64::NAN,
    }
}

fn parse_leading_int(s: &str) -> f64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut seen_digit = false;
    let mut acc = 0.0_f64;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        acc = acc * 10.0 + f64::from(b - b'0');
    }

    match (seen_digit, negative) {
        (false, _) => f64::NAN,
        (true, true) => -acc,
        (true, false) => acc,
    }
}
