//! Scripted providers for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::records::{
    ConditionedFuel, FireBehavior, Place, Sunlight, SurfaceFireRequest, SurfaceFuelRequest,
    Terrain,
};
use super::types::{
    BoxFuture, FuelModelLocator, PlaceProvider, ProviderError, SunlightProvider,
    SurfaceFireProvider, SurfaceFuelProvider, TerrainSource, WeatherProvider,
};
use crate::forecast::ForecastDocument;

/// Forecast document with hourly samples starting at `start`.
pub fn hourly_document(start: DateTime<Utc>, temps: &[i64]) -> ForecastDocument {
    let entries: Vec<serde_json::Value> = temps
        .iter()
        .enumerate()
        .map(|(i, temp)| {
            let time = start + chrono::Duration::hours(i as i64);
            serde_json::json!({
                "@time": time.to_rfc3339(),
                "values": [temp.to_string(), "15", "10", "270", "20"]
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "spatioTemporalWeather": {
            "spatialDomain": { "temporalDomain": { "temporalWeather": entries } }
        }
    }))
    .expect("valid forecast document")
}

pub fn sample_sunlight(time: DateTime<Utc>) -> Sunlight {
    Sunlight {
        time,
        latitude: 34.25,
        longitude: -119.2,
        sunrise: None,
        sunset: None,
        azimuth_deg: 180.0,
        zenith_deg: 30.0,
    }
}

pub fn sample_fire_behavior(flame_length_ft: f64) -> FireBehavior {
    FireBehavior {
        max_spread_rate_ft_min: 12.0,
        direction_max_spread_deg: 90.0,
        flame_length_ft,
        fireline_intensity_btu_ft_s: 150.0,
        heat_release_btu_ft2: 800.0,
    }
}

pub struct MockWeatherProvider {
    pub response: Mutex<Result<ForecastDocument, ProviderError>>,
    pub calls: AtomicUsize,
}

impl MockWeatherProvider {
    pub fn new(response: Result<ForecastDocument, ProviderError>) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }
}

impl WeatherProvider for MockWeatherProvider {
    fn point_forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _duration_hours: u32,
    ) -> BoxFuture<'_, Result<ForecastDocument, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().clone();
        Box::pin(async move { response })
    }
}

pub struct MockPlaceProvider {
    pub response: Result<Vec<Place>, ProviderError>,
    pub calls: AtomicUsize,
}

impl MockPlaceProvider {
    pub fn new(response: Result<Vec<Place>, ProviderError>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PlaceProvider for MockPlaceProvider {
    fn places(&self, _latitude: f64, _longitude: f64) -> BoxFuture<'_, Result<Vec<Place>, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

/// Sunlight provider whose calls block until permits are released.
pub struct MockSunlightProvider {
    gate: Arc<Semaphore>,
    pub calls: AtomicUsize,
    pub fail: Mutex<Option<ProviderError>>,
}

impl MockSunlightProvider {
    /// Calls complete immediately.
    pub fn open() -> Self {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    /// Calls block until [`MockSunlightProvider::release`].
    pub fn gated() -> Self {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(permits)),
            calls: AtomicUsize::new(0),
            fail: Mutex::new(None),
        }
    }

    /// Lets `n` pending or future calls complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SunlightProvider for MockSunlightProvider {
    fn sunlight_at(
        &self,
        _latitude: f64,
        _longitude: f64,
        time: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Sunlight, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&self.gate);
        let fail = self.fail.lock().clone();
        Box::pin(async move {
            gate.acquire()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?
                .forget();
            match fail {
                Some(err) => Err(err),
                None => Ok(sample_sunlight(time)),
            }
        })
    }
}

/// How [`MockSurfaceFuelProvider`] answers.
#[derive(Debug, Clone)]
pub enum FuelAnswer {
    /// Conditioned fuel built from the request.
    Echo,
    /// The explicit "no result" sentinel.
    Unavailable,
    /// A provider error.
    Fail(ProviderError),
}

pub struct MockSurfaceFuelProvider {
    pub answer: Mutex<FuelAnswer>,
    pub requests: Mutex<Vec<SurfaceFuelRequest>>,
}

impl MockSurfaceFuelProvider {
    pub fn new(answer: FuelAnswer) -> Self {
        Self {
            answer: Mutex::new(answer),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(FuelAnswer::Echo)
    }

    pub fn set_answer(&self, answer: FuelAnswer) {
        *self.answer.lock() = answer;
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl SurfaceFuelProvider for MockSurfaceFuelProvider {
    fn conditioned_surface_fuel(
        &self,
        request: SurfaceFuelRequest,
    ) -> BoxFuture<'_, Result<Option<ConditionedFuel>, ProviderError>> {
        let response = match &*self.answer.lock() {
            FuelAnswer::Echo => Ok(Some(ConditionedFuel {
                fuel_model: request.fuel_model.clone(),
                fuel_moisture: request.fuel_moisture,
                shaded: request.shaded,
            })),
            FuelAnswer::Unavailable => Ok(None),
            FuelAnswer::Fail(err) => Err(err.clone()),
        };
        self.requests.lock().push(request);
        Box::pin(async move { response })
    }
}

pub struct MockSurfaceFireProvider {
    pub requests: Mutex<Vec<SurfaceFireRequest>>,
    pub fail: Mutex<Option<ProviderError>>,
}

impl MockSurfaceFireProvider {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl SurfaceFireProvider for MockSurfaceFireProvider {
    fn surface_fire(
        &self,
        request: SurfaceFireRequest,
    ) -> BoxFuture<'_, Result<FireBehavior, ProviderError>> {
        // Flame length encodes the fuel model so tests can tell passes apart
        let response = match &*self.fail.lock() {
            Some(err) => Err(err.clone()),
            None => Ok(sample_fire_behavior(f64::from(request.fuel.fuel_model.model_no))),
        };
        self.requests.lock().push(request);
        Box::pin(async move { response })
    }
}

/// Fuel model locator answering with `response` as it was when called.
///
/// A gated locator holds each answer until [`MockFuelModelLocator::release`].
pub struct MockFuelModelLocator {
    gate: Arc<Semaphore>,
    pub response: Mutex<Result<u32, ProviderError>>,
    pub calls: AtomicUsize,
}

impl MockFuelModelLocator {
    pub fn new(response: Result<u32, ProviderError>) -> Self {
        Self::with_permits(response, Semaphore::MAX_PERMITS)
    }

    pub fn gated(response: Result<u32, ProviderError>) -> Self {
        Self::with_permits(response, 0)
    }

    fn with_permits(response: Result<u32, ProviderError>, permits: usize) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(permits)),
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// Lets `n` pending or future lookups answer, oldest first.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FuelModelLocator for MockFuelModelLocator {
    fn fuel_model_at(&self, _latitude: f64, _longitude: f64) -> BoxFuture<'_, Result<u32, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&self.gate);
        let response = self.response.lock().clone();
        Box::pin(async move {
            gate.acquire()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?
                .forget();
            response
        })
    }
}

pub struct FixedTerrain(pub Terrain);

impl TerrainSource for FixedTerrain {
    fn terrain_at(&self, _latitude: f64, _longitude: f64) -> Option<Terrain> {
        Some(self.0)
    }
}
