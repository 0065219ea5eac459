//! Fuel moisture scenarios.
//!
//! Standard scenarios combine a dead fuel moisture level with a live fuel
//! curing level, e.g. "Very Low Dead, Fully Cured Herb".

use serde::{Deserialize, Serialize};

/// Fuel moisture content in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelMoisture {
    pub dead_1h_pct: f64,
    pub dead_10h_pct: f64,
    pub dead_100h_pct: f64,
    pub live_herbaceous_pct: f64,
    pub live_woody_pct: f64,
}

/// A named fuel moisture scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelMoistureScenario {
    pub name: String,
    pub fuel_moisture: FuelMoisture,
}

/// Dead fuel levels: label, 1h, 10h, 100h.
const DEAD_LEVELS: [(&str, f64, f64, f64); 4] = [
    ("Very Low", 3.0, 4.0, 5.0),
    ("Low", 6.0, 7.0, 8.0),
    ("Moderate", 9.0, 10.0, 11.0),
    ("High", 12.0, 13.0, 14.0),
];

/// Live fuel levels: label, herbaceous, woody.
const LIVE_LEVELS: [(&str, f64, f64); 4] = [
    ("Fully Cured", 30.0, 60.0),
    ("Two-Thirds Cured", 60.0, 90.0),
    ("One-Third Cured", 90.0, 120.0),
    ("Fully Green", 120.0, 150.0),
];

/// Builds the 16 standard dead/live moisture scenarios.
pub fn standard_moisture_scenarios() -> Vec<FuelMoistureScenario> {
    DEAD_LEVELS
        .iter()
        .flat_map(|&(dead, d1, d10, d100)| {
            LIVE_LEVELS.iter().map(move |&(live, herb, woody)| FuelMoistureScenario {
                name: format!("{} Dead, {} Herb", dead, live),
                fuel_moisture: FuelMoisture {
                    dead_1h_pct: d1,
                    dead_10h_pct: d10,
                    dead_100h_pct: d100,
                    live_herbaceous_pct: herb,
                    live_woody_pct: woody,
                },
            })
        })
        .collect()
}
