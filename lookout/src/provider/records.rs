//! Records exchanged with the environmental providers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{FuelModel, FuelMoisture};
use crate::forecast::WeatherSample;

/// Terrain sample at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    pub aspect_deg: f64,
    pub slope_deg: f64,
    pub elevation_m: f64,
}

impl Terrain {
    /// Flat terrain at sea level, used when no terrain is available.
    pub const ZERO: Terrain = Terrain {
        aspect_deg: 0.0,
        slope_deg: 0.0,
        elevation_m: 0.0,
    };

    pub fn new(aspect_deg: f64, slope_deg: f64, elevation_m: f64) -> Self {
        Self {
            aspect_deg,
            slope_deg,
            elevation_m,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Weather input shape for the fuel and fire providers.
///
/// Displays as `temp,rh,wind_speed,wind_dir,sky_cover`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherTuple {
    pub air_temperature_f: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed_kts: f64,
    pub wind_direction_deg: f64,
    pub sky_cover_pct: f64,
}

impl From<&WeatherSample> for WeatherTuple {
    fn from(wx: &WeatherSample) -> Self {
        Self {
            air_temperature_f: wx.air_temperature_f,
            relative_humidity_pct: wx.relative_humidity_pct,
            wind_speed_kts: wx.wind_speed_kts,
            wind_direction_deg: wx.wind_direction_deg,
            sky_cover_pct: wx.sky_cover_pct,
        }
    }
}

impl fmt::Display for WeatherTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.air_temperature_f,
            self.relative_humidity_pct,
            self.wind_speed_kts,
            self.wind_direction_deg,
            self.sky_cover_pct
        )
    }
}

/// Terrain input shape for the fuel and fire providers.
///
/// Displays as `aspect,slope,elevation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainTuple {
    pub aspect_deg: f64,
    pub slope_deg: f64,
    pub elevation_m: f64,
}

impl From<&Terrain> for TerrainTuple {
    fn from(terrain: &Terrain) -> Self {
        Self {
            aspect_deg: terrain.aspect_deg,
            slope_deg: terrain.slope_deg,
            elevation_m: terrain.elevation_m,
        }
    }
}

impl fmt::Display for TerrainTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.aspect_deg, self.slope_deg, self.elevation_m)
    }
}

/// Solar position and daylight at a time and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sunlight {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sunset: Option<DateTime<Utc>>,
    pub azimuth_deg: f64,
    pub zenith_deg: f64,
}

/// Input to the conditioned surface fuel provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFuelRequest {
    pub fuel_model: FuelModel,
    pub sunlight: Sunlight,
    pub weather: WeatherTuple,
    pub terrain: TerrainTuple,
    pub shaded: bool,
    pub fuel_moisture: FuelMoisture,
}

/// Surface fuel adjusted for sunlight, terrain and moisture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionedFuel {
    pub fuel_model: FuelModel,
    /// Moisture after conditioning by weather and sunlight.
    pub fuel_moisture: FuelMoisture,
    pub shaded: bool,
}

/// Input to the surface fire provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFireRequest {
    pub fuel: ConditionedFuel,
    pub weather: WeatherTuple,
    pub terrain: TerrainTuple,
}

/// Computed surface fire behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireBehavior {
    pub max_spread_rate_ft_min: f64,
    pub direction_max_spread_deg: f64,
    pub flame_length_ft: f64,
    pub fireline_intensity_btu_ft_s: f64,
    pub heat_release_btu_ft2: f64,
}

/// A place returned by the place provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub place_type: String,
}

impl Place {
    pub fn new(name: impl Into<String>, place_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            place_type: place_type.into(),
        }
    }
}
