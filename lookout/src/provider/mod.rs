//! Environmental data provider abstraction
//!
//! This module provides the traits through which lookouts reach their remote
//! data sources (weather, place names, sunlight, conditioned fuel, fire
//! behavior and location-based fuel models) plus the records they exchange.
//! Transport is the implementor's concern; every async method returns a
//! boxed future so providers can be held as `Arc<dyn ...>`.
//!
//! # Example
//!
//! ```ignore
//! use lookout::provider::{with_timeout, SunlightProvider};
//!
//! let sunlight = with_timeout("sunlight", limit, provider.sunlight_at(lat, lon, now)).await?;
//! ```

mod records;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use records::{
    ConditionedFuel, FireBehavior, Place, Sunlight, SurfaceFireRequest, SurfaceFuelRequest,
    Terrain, TerrainTuple, WeatherTuple,
};
pub use types::{
    with_timeout, BoxFuture, FlatTerrain, FuelModelLocator, PlaceProvider, ProviderError,
    SunlightProvider, SurfaceFireProvider, SurfaceFuelProvider, TerrainSource, WeatherProvider,
};
