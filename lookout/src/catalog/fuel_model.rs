//! Fire behavior fuel models.

use serde::{Deserialize, Serialize};

/// A fire behavior fuel model record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelModel {
    /// Catalog number (1-13 for the standard set).
    pub model_no: u32,
    /// Short code, e.g. "FM5".
    pub code: String,
    /// Descriptive name.
    pub name: String,
}

impl FuelModel {
    pub fn new(model_no: u32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            model_no,
            code: code.into(),
            name: name.into(),
        }
    }
}

/// The 13 standard fire behavior fuel models.
const STANDARD_MODELS: [&str; 13] = [
    "Short grass (1 ft)",
    "Timber (grass and understory)",
    "Tall grass (2.5 ft)",
    "Chaparral (6 ft)",
    "Brush (2 ft)",
    "Dormant brush, hardwood slash",
    "Southern rough",
    "Short needle litter",
    "Long needle or hardwood litter",
    "Timber (litter and understory)",
    "Light logging slash",
    "Medium logging slash",
    "Heavy logging slash",
];

/// Builds the standard fuel model set, ordered by model number.
pub fn standard_fuel_models() -> Vec<FuelModel> {
    STANDARD_MODELS
        .iter()
        .zip(1u32..)
        .map(|(name, no)| FuelModel::new(no, format!("FM{}", no), *name))
        .collect()
}
