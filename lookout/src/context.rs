//! Shared collaborators for scouts and lookouts.
//!
//! A [`LookoutContext`] is created once and passed to every entity as an
//! `Arc`. It replaces any process-wide lookup of the clock, catalogs or
//! providers.

use std::sync::Arc;

use crate::catalog::FuelCatalog;
use crate::config::LookoutConfig;
use crate::events::ApplicationClock;
use crate::provider::{
    FuelModelLocator, PlaceProvider, SunlightProvider, SurfaceFireProvider, SurfaceFuelProvider,
    TerrainSource, WeatherProvider,
};

/// Remote and cached data sources used by the refresh pipelines.
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub place: Arc<dyn PlaceProvider>,
    pub sunlight: Arc<dyn SunlightProvider>,
    pub surface_fuel: Arc<dyn SurfaceFuelProvider>,
    pub surface_fire: Arc<dyn SurfaceFireProvider>,
    pub fuel_locator: Arc<dyn FuelModelLocator>,
    pub terrain: Arc<dyn TerrainSource>,
}

/// Everything an entity needs besides its own state.
#[derive(Clone)]
pub struct LookoutContext {
    pub config: LookoutConfig,
    pub clock: Arc<ApplicationClock>,
    pub catalog: Arc<dyn FuelCatalog>,
    pub providers: Providers,
}

impl LookoutContext {
    pub fn new(
        config: LookoutConfig,
        clock: Arc<ApplicationClock>,
        catalog: Arc<dyn FuelCatalog>,
        providers: Providers,
    ) -> Self {
        Self {
            config,
            clock,
            catalog,
            providers,
        }
    }
}

impl std::fmt::Debug for LookoutContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookoutContext")
            .field("config", &self.config)
            .field("clock", &self.clock.now())
            .finish_non_exhaustive()
    }
}
