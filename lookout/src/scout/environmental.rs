//! Environmental scout: a movable point with a weather forecast and a place name.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::id::ScoutId;
use super::place::{location_label, select_place_name};
use crate::context::LookoutContext;
use crate::events::{EventBus, ScoutEvent};
use crate::forecast::{all_forecasts, sample_at, ForecastSeries, WeatherSample};
use crate::provider::{with_timeout, ProviderError};

/// Name given to scouts created without one.
pub const DEFAULT_SCOUT_NAME: &str = "Wx Scout";

/// Errors from scout operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoutError {
    /// The scout is pinned in place.
    #[error("Scout {0} is not movable")]
    NotMovable(ScoutId),

    /// Coordinates outside the valid latitude/longitude range.
    #[error("Invalid position: lat {latitude}, lon {longitude}")]
    InvalidPosition { latitude: f64, longitude: f64 },

    /// A forecast of zero hours was requested.
    #[error("Forecast duration must be at least one hour")]
    InvalidDuration,

    /// The place provider returned no places.
    #[error("No places found at this location")]
    NoPlaces,

    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Construction parameters, usually restored from persisted entity state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoutParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_movable: Option<bool>,
    pub duration_hours: Option<u32>,
    pub place_name: Option<String>,
    pub fuel_model_no: Option<u32>,
    pub fuel_model_manual_select: bool,
    pub moisture_scenario_name: Option<String>,
}

impl ScoutParams {
    /// Parameters for a new scout at a position.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_movable = Some(false);
        self
    }

    pub fn with_duration_hours(mut self, hours: u32) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    pub fn with_fuel_model(mut self, model_no: u32) -> Self {
        self.fuel_model_no = Some(model_no);
        self
    }

    pub fn with_manual_fuel_model(mut self, model_no: u32) -> Self {
        self.fuel_model_no = Some(model_no);
        self.fuel_model_manual_select = true;
        self
    }

    pub fn with_moisture_scenario(mut self, name: impl Into<String>) -> Self {
        self.moisture_scenario_name = Some(name.into());
        self
    }
}

#[derive(Debug)]
struct ScoutState {
    name: String,
    latitude: f64,
    longitude: f64,
    is_movable: bool,
    duration_hours: u32,
    forecast: Option<Arc<ForecastSeries>>,
    place_name: Option<String>,
}

/// A point on the map that keeps its own forecast and place name current.
///
/// Mutated only through its own methods; the forecast is replaced wholesale
/// on every successful refresh.
pub struct EnvironmentalScout {
    id: ScoutId,
    ctx: Arc<LookoutContext>,
    bus: EventBus,
    state: Mutex<ScoutState>,
}

impl EnvironmentalScout {
    /// Creates a scout named [`DEFAULT_SCOUT_NAME`] unless `params` names it.
    pub fn new(params: &ScoutParams, ctx: Arc<LookoutContext>) -> Self {
        Self::with_default_name(params, ctx, DEFAULT_SCOUT_NAME)
    }

    pub(crate) fn with_default_name(
        params: &ScoutParams,
        ctx: Arc<LookoutContext>,
        default_name: &str,
    ) -> Self {
        let id = params
            .id
            .as_deref()
            .map(ScoutId::from)
            .unwrap_or_else(ScoutId::generate);
        let state = ScoutState {
            name: params.name.clone().unwrap_or_else(|| default_name.to_string()),
            latitude: params.latitude,
            longitude: params.longitude,
            is_movable: params.is_movable.unwrap_or(true),
            duration_hours: params
                .duration_hours
                .unwrap_or(ctx.config.forecast_duration_hours),
            forecast: None,
            place_name: params.place_name.clone(),
        };
        let bus = EventBus::new(ctx.config.event_capacity);

        Self {
            id,
            ctx,
            bus,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> &ScoutId {
        &self.id
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.state.lock().name = name.into();
    }

    /// Current (latitude, longitude).
    pub fn position(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.latitude, state.longitude)
    }

    pub fn is_movable(&self) -> bool {
        self.state.lock().is_movable
    }

    pub fn set_movable(&self, movable: bool) {
        self.state.lock().is_movable = movable;
    }

    pub fn duration_hours(&self) -> u32 {
        self.state.lock().duration_hours
    }

    pub fn set_duration_hours(&self, hours: u32) {
        self.state.lock().duration_hours = hours;
    }

    pub fn place_name(&self) -> Option<String> {
        self.state.lock().place_name.clone()
    }

    pub fn location_label(&self) -> String {
        let (latitude, longitude) = self.position();
        location_label(latitude, longitude)
    }

    /// This scout's event bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn context(&self) -> &Arc<LookoutContext> {
        &self.ctx
    }

    /// The current forecast series, if one has been fetched.
    pub fn forecast(&self) -> Option<Arc<ForecastSeries>> {
        self.state.lock().forecast.clone()
    }

    /// Earliest forecast sample, or `INVALID`.
    pub fn first_forecast(&self) -> WeatherSample {
        self.forecast_at(None)
    }

    /// Forecast sample applicable at `time`, or `INVALID`.
    pub fn forecast_at(&self, time: Option<DateTime<Utc>>) -> WeatherSample {
        let forecast = self.forecast();
        sample_at(forecast.as_deref(), time)
    }

    /// Every forecast sample; empty before the first fetch.
    pub fn forecasts(&self) -> Vec<WeatherSample> {
        let forecast = self.forecast();
        all_forecasts(forecast.as_deref())
    }

    /// Moves the scout. No refresh happens until [`finish_move`](Self::finish_move).
    pub fn move_to(&self, latitude: f64, longitude: f64) -> Result<(), ScoutError> {
        validate_position(latitude, longitude)?;
        let mut state = self.state.lock();
        if !state.is_movable {
            return Err(ScoutError::NotMovable(self.id.clone()));
        }
        state.latitude = latitude;
        state.longitude = longitude;
        Ok(())
    }

    /// Announces the end of a move; subscribers refresh forecast and place.
    pub fn finish_move(&self) {
        debug!(scout = %self.id, "move finished");
        self.bus.publish(ScoutEvent::MoveFinished(self.id.clone()));
    }

    /// Refreshes the forecast, then the place name. A failure of one does not
    /// skip the other.
    pub async fn refresh(&self) {
        if let Err(e) = self.refresh_forecast().await {
            warn!(scout = %self.id, error = %e, "forecast refresh failed");
        }
        if let Err(e) = self.refresh_place().await {
            warn!(scout = %self.id, error = %e, "place refresh failed");
        }
    }

    /// Fetches a new forecast, replaces the series and publishes `WeatherChanged`.
    ///
    /// Returns the number of samples stored.
    pub async fn refresh_forecast(&self) -> Result<usize, ScoutError> {
        let (latitude, longitude, hours) = {
            let state = self.state.lock();
            (state.latitude, state.longitude, state.duration_hours)
        };
        validate_position(latitude, longitude)?;
        if hours == 0 {
            return Err(ScoutError::InvalidDuration);
        }

        let document = with_timeout(
            "weather",
            self.ctx.config.provider_timeout,
            self.ctx.providers.weather.point_forecast(latitude, longitude, hours),
        )
        .await?;
        let series = Arc::new(document.to_series());
        let count = series.len();

        let name = {
            let mut state = self.state.lock();
            state.forecast = Some(series);
            state.name.clone()
        };

        info!(scout = %self.id, name = %name, samples = count, "weather changed");
        self.bus.publish(ScoutEvent::WeatherChanged(self.id.clone()));
        Ok(count)
    }

    /// Fetches places, stores the display name and publishes `PlaceChanged`.
    pub async fn refresh_place(&self) -> Result<Option<String>, ScoutError> {
        let (latitude, longitude) = self.position();
        validate_position(latitude, longitude)?;

        let places = with_timeout(
            "place",
            self.ctx.config.provider_timeout,
            self.ctx.providers.place.places(latitude, longitude),
        )
        .await?;
        if places.is_empty() {
            error!(scout = %self.id, "place lookup returned no results");
            return Err(ScoutError::NoPlaces);
        }

        let place_name = select_place_name(&places).map(str::to_string);
        let name = {
            let mut state = self.state.lock();
            state.place_name = place_name.clone();
            state.name.clone()
        };

        info!(scout = %self.id, name = %name, place = ?place_name, "place changed");
        self.bus.publish(ScoutEvent::PlaceChanged(self.id.clone()));
        Ok(place_name)
    }
}

impl std::fmt::Debug for EnvironmentalScout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentalScout")
            .field("id", &self.id)
            .field("state", &*self.state.lock())
            .finish()
    }
}

fn validate_position(latitude: f64, longitude: f64) -> Result<(), ScoutError> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(ScoutError::InvalidPosition {
            latitude,
            longitude,
        })
    }
}
