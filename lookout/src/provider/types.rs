//! Provider traits and errors.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::records::{
    ConditionedFuel, FireBehavior, Place, Sunlight, SurfaceFireRequest, SurfaceFuelRequest,
    Terrain,
};
use crate::forecast::ForecastDocument;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur when calling a provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The service answered but has no result for this request.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The request did not reach the service or the reply was lost.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call did not complete within the configured limit.
    #[error("{service} request timed out after {after:?}")]
    Timeout {
        service: &'static str,
        after: Duration,
    },

    /// The reply could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Point forecast source.
pub trait WeatherProvider: Send + Sync {
    /// Fetches a point forecast covering `duration_hours` from now.
    fn point_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        duration_hours: u32,
    ) -> BoxFuture<'_, Result<ForecastDocument, ProviderError>>;
}

/// Reverse geocoding source.
pub trait PlaceProvider: Send + Sync {
    /// Returns the places containing a point, finest granularity first.
    fn places(&self, latitude: f64, longitude: f64) -> BoxFuture<'_, Result<Vec<Place>, ProviderError>>;
}

/// Solar position source.
pub trait SunlightProvider: Send + Sync {
    fn sunlight_at(
        &self,
        latitude: f64,
        longitude: f64,
        time: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Sunlight, ProviderError>>;
}

/// Conditioned surface fuel source.
pub trait SurfaceFuelProvider: Send + Sync {
    /// Conditions a fuel model for the given environment.
    ///
    /// `Ok(None)` is the service's explicit "no result" answer and is
    /// distinct from a transport failure.
    fn conditioned_surface_fuel(
        &self,
        request: SurfaceFuelRequest,
    ) -> BoxFuture<'_, Result<Option<ConditionedFuel>, ProviderError>>;
}

/// Surface fire behavior source.
pub trait SurfaceFireProvider: Send + Sync {
    fn surface_fire(
        &self,
        request: SurfaceFireRequest,
    ) -> BoxFuture<'_, Result<FireBehavior, ProviderError>>;
}

/// Location-based fuel model lookup (e.g. a 13-model fuel map).
pub trait FuelModelLocator: Send + Sync {
    /// Returns the fuel model number mapped at a point.
    fn fuel_model_at(&self, latitude: f64, longitude: f64) -> BoxFuture<'_, Result<u32, ProviderError>>;
}

/// Cached terrain source. Synchronous.
pub trait TerrainSource: Send + Sync {
    /// Returns the terrain at a point, if known.
    fn terrain_at(&self, latitude: f64, longitude: f64) -> Option<Terrain>;
}

/// Terrain source for maps without elevation data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain;

impl TerrainSource for FlatTerrain {
    fn terrain_at(&self, _latitude: f64, _longitude: f64) -> Option<Terrain> {
        None
    }
}

/// Awaits a provider call, failing with [`ProviderError::Timeout`] after `limit`.
pub async fn with_timeout<T, F>(service: &'static str, limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            service,
            after: limit,
        }),
    }
}
