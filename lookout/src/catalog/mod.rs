//! Fuel model and fuel moisture catalogs.
//!
//! Catalogs are key→record lookup tables. The [`FuelCatalog`] trait is the
//! seam used by lookouts; [`StandardFuelCatalog`] carries the standard 13
//! fuel models and the 16 standard moisture scenarios.

mod fuel_model;
mod moisture;

use std::collections::HashMap;

use thiserror::Error;

pub use fuel_model::{standard_fuel_models, FuelModel};
pub use moisture::{standard_moisture_scenarios, FuelMoisture, FuelMoistureScenario};

/// Errors from catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No fuel model with this number.
    #[error("Unknown fuel model: {0}")]
    UnknownFuelModel(u32),

    /// No moisture scenario with this name.
    #[error("Unknown fuel moisture scenario: {0}")]
    UnknownMoistureScenario(String),
}

/// Lookup interface for fuel records.
pub trait FuelCatalog: Send + Sync {
    /// Resolves a fuel model by number.
    fn fuel_model(&self, model_no: u32) -> Result<FuelModel, CatalogError>;

    /// Resolves a moisture scenario by name.
    fn moisture_scenario(&self, name: &str) -> Result<FuelMoistureScenario, CatalogError>;
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StandardFuelCatalog {
    models: HashMap<u32, FuelModel>,
    scenarios: HashMap<String, FuelMoistureScenario>,
}

impl StandardFuelCatalog {
    /// Creates a catalog with the standard fuel models and scenarios.
    pub fn new() -> Self {
        Self::from_parts(standard_fuel_models(), standard_moisture_scenarios())
    }

    /// Creates a catalog from explicit records.
    pub fn from_parts(
        models: impl IntoIterator<Item = FuelModel>,
        scenarios: impl IntoIterator<Item = FuelMoistureScenario>,
    ) -> Self {
        Self {
            models: models.into_iter().map(|m| (m.model_no, m)).collect(),
            scenarios: scenarios.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }

    /// Number of fuel models in the catalog.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of moisture scenarios in the catalog.
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }
}

impl FuelCatalog for StandardFuelCatalog {
    fn fuel_model(&self, model_no: u32) -> Result<FuelModel, CatalogError> {
        self.models
            .get(&model_no)
            .cloned()
            .ok_or(CatalogError::UnknownFuelModel(model_no))
    }

    fn moisture_scenario(&self, name: &str) -> Result<FuelMoistureScenario, CatalogError> {
        self.scenarios
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownMoistureScenario(name.to_string()))
    }
}
