//! Integration tests for the fire-behavior refresh pipeline.
//!
//! These tests drive a `FireLookout` through its public API with providers
//! whose futures the test resolves by hand:
//! - Trigger coalescing while a stage is in flight
//! - Event and clock driven passes through `start_triggers`
//! - Unavailable fuel aborting a pass
//!
//! Run with: `cargo test --test refresh_pipeline_integration`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use lookout::catalog::StandardFuelCatalog;
use lookout::config::LookoutConfig;
use lookout::context::{LookoutContext, Providers};
use lookout::events::{ApplicationClock, ScoutEvent};
use lookout::forecast::ForecastDocument;
use lookout::provider::{
    BoxFuture, ConditionedFuel, FireBehavior, FlatTerrain, FuelModelLocator, Place, PlaceProvider,
    ProviderError, Sunlight, SunlightProvider, SurfaceFireProvider, SurfaceFireRequest,
    SurfaceFuelProvider, SurfaceFuelRequest, WeatherProvider,
};
use lookout::scout::ScoutParams;
use lookout::FireLookout;

// ============================================================================
// Test Providers
// ============================================================================

const FORECAST_JSON: &str = r#"{
  "spatioTemporalWeather": {
    "range": [],
    "spatialDomain": {
      "temporalDomain": {
        "temporalWeather": [
          { "@time": "2016-07-04T12:00:00Z", "values": ["80", "15", "10", "270", "20"] },
          { "@time": "2016-07-04T13:00:00Z", "values": ["82", "14", "12", "270", "10"] },
          { "@time": "2016-07-04T14:00:00Z", "values": ["85", "12", "15", "280", "0"] }
        ]
      }
    }
  }
}"#;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 7, 4, 12, 0, 0).unwrap()
}

struct StaticWeather;

impl WeatherProvider for StaticWeather {
    fn point_forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _duration_hours: u32,
    ) -> BoxFuture<'_, Result<ForecastDocument, ProviderError>> {
        let document = ForecastDocument::from_json(FORECAST_JSON)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()));
        Box::pin(async move { document })
    }
}

struct StaticPlaces;

impl PlaceProvider for StaticPlaces {
    fn places(&self, _latitude: f64, _longitude: f64) -> BoxFuture<'_, Result<Vec<Place>, ProviderError>> {
        Box::pin(async { Ok(vec![Place::new("Ojai", "Town")]) })
    }
}

/// Sunlight provider whose calls wait until the test answers them.
#[derive(Default)]
struct ManualSunlight {
    waiting: Mutex<VecDeque<(DateTime<Utc>, oneshot::Sender<Sunlight>)>>,
    calls: AtomicUsize,
}

impl ManualSunlight {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Resolves the oldest outstanding call.
    fn answer_next(&self) -> bool {
        let Some((time, tx)) = self.waiting.lock().pop_front() else {
            return false;
        };
        tx.send(Sunlight {
            time,
            latitude: 34.45,
            longitude: -119.25,
            sunrise: None,
            sunset: None,
            azimuth_deg: 200.0,
            zenith_deg: 25.0,
        })
        .is_ok()
    }
}

impl SunlightProvider for ManualSunlight {
    fn sunlight_at(
        &self,
        _latitude: f64,
        _longitude: f64,
        time: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Sunlight, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.waiting.lock().push_back((time, tx));
        Box::pin(async move { rx.await.map_err(|e| ProviderError::Transport(e.to_string())) })
    }
}

/// Fuel provider that can be switched to the "unavailable" answer.
#[derive(Default)]
struct SwitchableFuel {
    unavailable: Mutex<bool>,
    calls: AtomicUsize,
}

impl SurfaceFuelProvider for SwitchableFuel {
    fn conditioned_surface_fuel(
        &self,
        request: SurfaceFuelRequest,
    ) -> BoxFuture<'_, Result<Option<ConditionedFuel>, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fuel = (!*self.unavailable.lock()).then(|| ConditionedFuel {
            fuel_model: request.fuel_model,
            fuel_moisture: request.fuel_moisture,
            shaded: request.shaded,
        });
        Box::pin(async move { Ok(fuel) })
    }
}

/// Fire provider that reports the air temperature it was given as flame length.
#[derive(Default)]
struct EchoFire {
    calls: AtomicUsize,
}

impl SurfaceFireProvider for EchoFire {
    fn surface_fire(&self, request: SurfaceFireRequest) -> BoxFuture<'_, Result<FireBehavior, ProviderError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = FireBehavior {
            max_spread_rate_ft_min: 4.0,
            direction_max_spread_deg: request.weather.wind_direction_deg,
            flame_length_ft: request.weather.air_temperature_f,
            fireline_intensity_btu_ft_s: 60.0,
            heat_release_btu_ft2: 500.0,
        };
        Box::pin(async move { Ok(behavior) })
    }
}

struct FixedFuelMap(u32);

impl FuelModelLocator for FixedFuelMap {
    fn fuel_model_at(&self, _latitude: f64, _longitude: f64) -> BoxFuture<'_, Result<u32, ProviderError>> {
        let no = self.0;
        Box::pin(async move { Ok(no) })
    }
}

struct Fixture {
    clock: Arc<ApplicationClock>,
    sunlight: Arc<ManualSunlight>,
    fuel: Arc<SwitchableFuel>,
    fire: Arc<EchoFire>,
    lookout: Arc<FireLookout>,
}

impl Fixture {
    fn new() -> Self {
        let clock = Arc::new(ApplicationClock::new(start_time()));
        let sunlight = Arc::new(ManualSunlight::default());
        let fuel = Arc::new(SwitchableFuel::default());
        let fire = Arc::new(EchoFire::default());
        let providers = Providers {
            weather: Arc::new(StaticWeather),
            place: Arc::new(StaticPlaces),
            sunlight: sunlight.clone(),
            surface_fuel: fuel.clone(),
            surface_fire: fire.clone(),
            fuel_locator: Arc::new(FixedFuelMap(4)),
            terrain: Arc::new(FlatTerrain),
        };
        let ctx = Arc::new(LookoutContext::new(
            LookoutConfig::default().with_provider_timeout(Duration::from_secs(5)),
            Arc::clone(&clock),
            Arc::new(StandardFuelCatalog::new()),
            providers,
        ));
        let lookout = Arc::new(FireLookout::new(
            &ScoutParams::at(34.45, -119.25).with_name("Ojai Lookout"),
            ctx,
        ));

        Self {
            clock,
            sunlight,
            fuel,
            fire,
            lookout,
        }
    }

    /// Answers sunlight calls as they arrive until the lookout is idle.
    async fn drain(&self) {
        for _ in 0..1000 {
            self.sunlight.answer_next();
            if !self.lookout.refresh_in_progress() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("lookout never went idle");
    }
}

async fn wait_for(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached");
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Three triggers during one in-flight sunlight call cost exactly one more pass.
#[tokio::test]
async fn test_triggers_during_pass_coalesce() {
    let fx = Fixture::new();

    assert!(fx.lookout.refresh_fire_behavior());
    wait_for(|| fx.sunlight.calls() == 1).await;

    for _ in 0..3 {
        assert!(fx.lookout.refresh_fire_behavior());
    }
    assert!(fx.lookout.refresh_in_progress());
    assert!(fx.lookout.refresh_pending());

    assert!(fx.sunlight.answer_next());
    wait_for(|| fx.sunlight.calls() == 2).await;
    assert!(!fx.lookout.refresh_pending());

    fx.drain().await;
    assert_eq!(fx.sunlight.calls(), 2);
    assert_eq!(fx.fire.calls.load(Ordering::SeqCst), 2);
}

/// A forecast refresh flows through the trigger task to a fire behavior event.
#[tokio::test]
async fn test_weather_change_produces_fire_behavior() {
    let fx = Fixture::new();
    let cancel = CancellationToken::new();
    let triggers = fx.lookout.start_triggers(cancel.clone());
    let mut events = fx.lookout.scout().bus().subscribe();

    fx.lookout.scout().refresh_forecast().await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ScoutEvent::WeatherChanged(fx.lookout.scout().id().clone())
    );

    wait_for(|| fx.sunlight.calls() == 1).await;
    fx.drain().await;
    let behavior = fx.lookout.fire_behavior().expect("fire behavior computed");
    assert_eq!(behavior.flame_length_ft, 80.0);
    assert_eq!(
        events.recv().await.unwrap(),
        ScoutEvent::FireBehaviorChanged(fx.lookout.scout().id().clone())
    );

    cancel.cancel();
    triggers.await.unwrap();
}

/// Scrubbing application time re-runs the pass with the nearest sample.
#[tokio::test]
async fn test_clock_change_selects_nearest_sample() {
    let fx = Fixture::new();
    fx.lookout.scout().refresh_forecast().await.unwrap();
    let cancel = CancellationToken::new();
    let _triggers = fx.lookout.start_triggers(cancel.clone());

    fx.clock.set(start_time() + chrono::Duration::minutes(59));
    wait_for(|| fx.sunlight.calls() == 1).await;
    fx.drain().await;
    assert_eq!(fx.lookout.active_weather().air_temperature_f, 82.0);
    assert_eq!(fx.lookout.fire_behavior().unwrap().flame_length_ft, 82.0);

    fx.clock.set(start_time() + chrono::Duration::minutes(29));
    wait_for(|| fx.sunlight.calls() == 2).await;
    fx.drain().await;
    assert_eq!(fx.lookout.active_weather().air_temperature_f, 80.0);

    fx.clock.set(start_time() + chrono::Duration::hours(12));
    wait_for(|| fx.sunlight.calls() == 3).await;
    fx.drain().await;
    assert_eq!(fx.lookout.active_weather().air_temperature_f, 85.0);

    cancel.cancel();
}

/// An unavailable fuel answer keeps the last good result and stays quiet.
#[tokio::test]
async fn test_unavailable_fuel_keeps_last_result() {
    let fx = Fixture::new();
    fx.lookout.scout().refresh_forecast().await.unwrap();
    fx.lookout.refresh_fire_behavior();
    fx.drain().await;
    let last_good = fx.lookout.fire_behavior();
    assert!(last_good.is_some());

    *fx.fuel.unavailable.lock() = true;
    fx.clock.set(start_time() + chrono::Duration::hours(2));
    let mut events = fx.lookout.scout().bus().subscribe();
    fx.lookout.refresh_fire_behavior();
    fx.drain().await;

    assert_eq!(fx.fuel.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fx.fire.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fx.lookout.fire_behavior(), last_good);
    assert!(fx.lookout.conditioned_fuel().is_none());
    assert!(events.try_recv().is_err());
}

/// Place changes replace the fuel model and trigger a pass with it.
#[tokio::test]
async fn test_place_change_locates_fuel_model() {
    let fx = Fixture::new();
    let cancel = CancellationToken::new();
    let _triggers = fx.lookout.start_triggers(cancel.clone());
    assert_eq!(fx.lookout.fuel_model_no(), Some(5));

    let place = fx.lookout.scout().refresh_place().await.unwrap();
    assert_eq!(place.as_deref(), Some("Ojai"));

    wait_for(|| fx.lookout.fuel_model_no() == Some(4)).await;
    wait_for(|| fx.sunlight.calls() == 1).await;
    fx.drain().await;
    assert!(fx.lookout.fire_behavior().is_some());

    cancel.cancel();
}
