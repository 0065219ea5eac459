//! Fire lookout: an environmental scout that keeps a fire-behavior estimate.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::pipeline::{CompletionOutcome, RefreshState, TriggerOutcome};
use crate::catalog::{CatalogError, FuelModel, FuelMoisture, FuelMoistureScenario};
use crate::context::LookoutContext;
use crate::events::ScoutEvent;
use crate::forecast::WeatherSample;
use crate::provider::{
    with_timeout, ConditionedFuel, FireBehavior, ProviderError, Sunlight, SurfaceFireRequest,
    SurfaceFuelRequest, Terrain, TerrainTuple, WeatherTuple,
};
use crate::scout::{EnvironmentalScout, ScoutParams};

/// Name given to lookouts created without one.
pub const DEFAULT_LOOKOUT_NAME: &str = "Fire Lookout";

/// Why a pass ended without a fire-behavior result.
#[derive(Debug, Error)]
enum PassError {
    #[error("conditioned fuel unavailable")]
    FuelUnavailable,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug)]
struct LookoutState {
    fuel_model: Option<FuelModel>,
    moisture_scenario: Option<FuelMoistureScenario>,
    manual_select: bool,
    /// Bumped by every fuel model selection; a lookup stores its answer only
    /// if no selection happened while it was in flight.
    fuel_selection: u64,
    terrain: Terrain,
    active_weather: WeatherSample,
    sunlight: Option<Sunlight>,
    conditioned_fuel: Option<ConditionedFuel>,
    fire_behavior: Option<FireBehavior>,
    refresh: RefreshState,
}

impl LookoutState {
    fn fuel_inputs(&self) -> Option<(FuelModel, FuelMoisture)> {
        let model = self.fuel_model.clone()?;
        let scenario = self.moisture_scenario.as_ref()?;
        Some((model, scenario.fuel_moisture))
    }
}

/// What woke the trigger task.
enum Trigger {
    Event(ScoutEvent),
    Clock,
    Lagged,
}

/// An environmental scout that computes surface fire behavior for its
/// position at the current application time.
///
/// Passes are serialized per lookout by [`RefreshState`]; triggers arriving
/// during a pass coalesce into one follow-up pass that re-reads live state.
///
/// # Example
///
/// ```ignore
/// let lookout = Arc::new(FireLookout::new(&ScoutParams::at(34.25, -119.2), ctx));
/// let triggers = lookout.start_triggers(cancel.child_token());
/// lookout.scout().refresh().await;
/// ```
pub struct FireLookout {
    scout: EnvironmentalScout,
    state: Mutex<LookoutState>,
}

impl FireLookout {
    /// Creates a lookout, resolving its fuel model and moisture scenario.
    ///
    /// Values missing from `params` come from the configuration defaults. A
    /// value the catalog cannot resolve is logged and left unset; passes are
    /// refused until it is set.
    pub fn new(params: &ScoutParams, ctx: Arc<LookoutContext>) -> Self {
        let model_no = params
            .fuel_model_no
            .unwrap_or(ctx.config.default_fuel_model_no);
        let scenario_name = params
            .moisture_scenario_name
            .clone()
            .unwrap_or_else(|| ctx.config.default_moisture_scenario.clone());

        let fuel_model = ctx
            .catalog
            .fuel_model(model_no)
            .inspect_err(|e| warn!(error = %e, "fuel model not resolved"))
            .ok();
        let moisture_scenario = ctx
            .catalog
            .moisture_scenario(&scenario_name)
            .inspect_err(|e| warn!(error = %e, "moisture scenario not resolved"))
            .ok();

        let scout = EnvironmentalScout::with_default_name(params, ctx, DEFAULT_LOOKOUT_NAME);
        let state = LookoutState {
            fuel_model,
            moisture_scenario,
            manual_select: params.fuel_model_manual_select,
            fuel_selection: 0,
            terrain: Terrain::ZERO,
            active_weather: WeatherSample::INVALID,
            sunlight: None,
            conditioned_fuel: None,
            fire_behavior: None,
            refresh: RefreshState::Idle,
        };

        Self {
            scout,
            state: Mutex::new(state),
        }
    }

    /// The underlying scout (position, forecast, place, bus).
    pub fn scout(&self) -> &EnvironmentalScout {
        &self.scout
    }

    // =========================================================================
    // Fuel selection
    // =========================================================================

    pub fn fuel_model(&self) -> Option<FuelModel> {
        self.state.lock().fuel_model.clone()
    }

    pub fn fuel_model_no(&self) -> Option<u32> {
        self.state.lock().fuel_model.as_ref().map(|m| m.model_no)
    }

    /// Selects a fuel model by number. On failure the current model is kept.
    pub fn set_fuel_model_no(&self, model_no: u32) -> Result<(), CatalogError> {
        let model = self.scout.context().catalog.fuel_model(model_no)?;
        let mut state = self.state.lock();
        state.fuel_model = Some(model);
        state.fuel_selection += 1;
        Ok(())
    }

    pub fn moisture_scenario(&self) -> Option<FuelMoistureScenario> {
        self.state.lock().moisture_scenario.clone()
    }

    pub fn moisture_scenario_name(&self) -> Option<String> {
        self.state
            .lock()
            .moisture_scenario
            .as_ref()
            .map(|s| s.name.clone())
    }

    /// Moisture values of the selected scenario.
    pub fn fuel_moisture(&self) -> Option<FuelMoisture> {
        self.state
            .lock()
            .moisture_scenario
            .as_ref()
            .map(|s| s.fuel_moisture)
    }

    /// Selects a moisture scenario by name. On failure the current one is kept.
    pub fn set_moisture_scenario_name(&self, name: &str) -> Result<(), CatalogError> {
        let scenario = self.scout.context().catalog.moisture_scenario(name)?;
        self.state.lock().moisture_scenario = Some(scenario);
        Ok(())
    }

    pub fn fuel_model_manual_select(&self) -> bool {
        self.state.lock().manual_select
    }

    /// When set, place changes no longer look up the fuel model, and a
    /// lookup already in flight is discarded.
    pub fn set_fuel_model_manual_select(&self, manual: bool) {
        self.state.lock().manual_select = manual;
    }

    // =========================================================================
    // Derived results
    // =========================================================================

    /// Terrain used by the latest pass.
    pub fn terrain(&self) -> Terrain {
        self.state.lock().terrain
    }

    /// Weather sample used by the latest pass.
    pub fn active_weather(&self) -> WeatherSample {
        self.state.lock().active_weather
    }

    pub fn sunlight(&self) -> Option<Sunlight> {
        self.state.lock().sunlight.clone()
    }

    /// Conditioned fuel from the latest pass; `None` after an unavailable answer.
    pub fn conditioned_fuel(&self) -> Option<ConditionedFuel> {
        self.state.lock().conditioned_fuel.clone()
    }

    /// Last good fire behavior. Aborted passes leave it unchanged.
    pub fn fire_behavior(&self) -> Option<FireBehavior> {
        self.state.lock().fire_behavior.clone()
    }

    pub fn refresh_in_progress(&self) -> bool {
        self.state.lock().refresh.in_progress()
    }

    pub fn refresh_pending(&self) -> bool {
        self.state.lock().refresh.pending()
    }

    // =========================================================================
    // Refresh pipeline
    // =========================================================================

    /// Requests a fire-behavior pass.
    ///
    /// Returns `false` when the trigger was dropped because the fuel model or
    /// moisture scenario is unset. Otherwise a pass is started, or folded into
    /// the running one, and `true` is returned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh_fire_behavior(self: &Arc<Self>) -> bool {
        let (outcome, fuel) = {
            let mut state = self.state.lock();
            let Some(fuel) = state.fuel_inputs() else {
                error!(
                    scout = %self.scout.id(),
                    "fuel model and/or fuel moisture not set; refresh dropped"
                );
                return false;
            };
            (state.refresh.trigger(), fuel)
        };

        match outcome {
            TriggerOutcome::Start => {
                let lookout = Arc::clone(self);
                tokio::spawn(async move { lookout.run_passes(fuel).await });
            }
            TriggerOutcome::Coalesced => {
                debug!(scout = %self.scout.id(), "refresh coalesced into running pass");
            }
        }
        true
    }

    /// Runs passes until no trigger is pending. A restart takes the fuel
    /// selection current at completion.
    async fn run_passes(&self, mut fuel: (FuelModel, FuelMoisture)) {
        loop {
            match self.run_pass(fuel.clone()).await {
                Ok(()) => {}
                Err(PassError::FuelUnavailable) => {
                    warn!(scout = %self.scout.id(), "conditioned fuel unavailable; pass aborted");
                }
                Err(e) => {
                    warn!(scout = %self.scout.id(), error = %e, "fire behavior pass aborted");
                }
            }

            {
                let mut state = self.state.lock();
                if state.refresh.complete() == CompletionOutcome::Finished {
                    break;
                }
                // Selections are never cleared once set
                if let Some(latest) = state.fuel_inputs() {
                    fuel = latest;
                }
            }
            debug!(scout = %self.scout.id(), "running pending refresh");
        }
    }

    async fn run_pass(
        &self,
        (fuel_model, fuel_moisture): (FuelModel, FuelMoisture),
    ) -> Result<(), PassError> {
        let ctx = Arc::clone(self.scout.context());
        let now = ctx.clock.now();
        let (latitude, longitude) = self.scout.position();
        let weather = self.scout.forecast_at(Some(now));
        let terrain = ctx
            .providers
            .terrain
            .terrain_at(latitude, longitude)
            .unwrap_or(Terrain::ZERO);

        {
            let mut state = self.state.lock();
            state.active_weather = weather;
            state.terrain = terrain;
        }
        let weather = WeatherTuple::from(&weather);
        let terrain = TerrainTuple::from(&terrain);
        let limit = ctx.config.provider_timeout;

        let sunlight = with_timeout(
            "sunlight",
            limit,
            ctx.providers.sunlight.sunlight_at(latitude, longitude, now),
        )
        .await?;
        self.state.lock().sunlight = Some(sunlight.clone());

        let request = SurfaceFuelRequest {
            fuel_model,
            sunlight,
            weather,
            terrain,
            shaded: false,
            fuel_moisture,
        };
        let conditioned = with_timeout(
            "surface fuel",
            limit,
            ctx.providers.surface_fuel.conditioned_surface_fuel(request),
        )
        .await?;
        self.state.lock().conditioned_fuel = conditioned.clone();
        let fuel = conditioned.ok_or(PassError::FuelUnavailable)?;

        let behavior = with_timeout(
            "surface fire",
            limit,
            ctx.providers.surface_fire.surface_fire(SurfaceFireRequest {
                fuel,
                weather,
                terrain,
            }),
        )
        .await?;
        self.state.lock().fire_behavior = Some(behavior);

        info!(
            scout = %self.scout.id(),
            name = %self.scout.name(),
            weather = %weather,
            terrain = %terrain,
            "fire behavior changed"
        );
        self.scout
            .bus()
            .publish(ScoutEvent::FireBehaviorChanged(self.scout.id().clone()));
        Ok(())
    }

    // =========================================================================
    // Fuel model lookup
    // =========================================================================

    /// Starts a location-based fuel model lookup in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh_fuel_model(self: &Arc<Self>) {
        let lookout = Arc::clone(self);
        tokio::spawn(async move {
            lookout.update_fuel_model_from_location().await;
        });
    }

    /// Looks up the fuel model mapped at the scout's position and, when it
    /// resolves, stores it and requests a fire-behavior pass.
    ///
    /// Returns whether the fuel model was replaced. Skipped when the fuel
    /// model was selected manually. The answer is discarded if manual
    /// selection was switched on, or another selection or lookup happened,
    /// while the locator was being queried.
    pub async fn update_fuel_model_from_location(self: &Arc<Self>) -> bool {
        let selection = {
            let mut state = self.state.lock();
            if state.manual_select {
                debug!(scout = %self.scout.id(), "fuel model selected manually; lookup skipped");
                return false;
            }
            state.fuel_selection += 1;
            state.fuel_selection
        };

        let ctx = Arc::clone(self.scout.context());
        let (latitude, longitude) = self.scout.position();
        let model_no = match with_timeout(
            "fuel model",
            ctx.config.provider_timeout,
            ctx.providers.fuel_locator.fuel_model_at(latitude, longitude),
        )
        .await
        {
            Ok(no) => no,
            Err(e) => {
                warn!(scout = %self.scout.id(), error = %e, "fuel model lookup failed");
                return false;
            }
        };

        let model = match ctx.catalog.fuel_model(model_no) {
            Ok(model) => model,
            Err(e) => {
                warn!(scout = %self.scout.id(), error = %e, "located fuel model not in catalog");
                return false;
            }
        };

        {
            let mut state = self.state.lock();
            if state.manual_select || state.fuel_selection != selection {
                debug!(scout = %self.scout.id(), "fuel model selection changed; lookup discarded");
                return false;
            }
            info!(scout = %self.scout.id(), fuel_model = %model.code, "fuel model located");
            state.fuel_model = Some(model);
        }
        self.refresh_fire_behavior();
        true
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Spawns the task that turns scout events and clock changes into
    /// refreshes.
    ///
    /// | Source | Action |
    /// |--------|--------|
    /// | `WeatherChanged` | fire-behavior pass |
    /// | `PlaceChanged` | fuel model lookup |
    /// | `MoveFinished` | scout forecast and place refresh |
    /// | clock change | fire-behavior pass |
    /// | lagged receiver | all of the above |
    ///
    /// The task holds only a weak reference. It exits when `cancel` fires,
    /// when the lookout is dropped, or when the clock goes away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_triggers(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let id = self.scout.id().clone();
        let mut events = self.scout.bus().subscribe();
        let mut clock = self.scout.context().clock.subscribe();

        tokio::spawn(async move {
            debug!(scout = %id, "triggers started");
            loop {
                let trigger = tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,

                    received = events.recv() => match received {
                        Ok(event) => Trigger::Event(event),
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(scout = %id, skipped, "event receiver lagged");
                            Trigger::Lagged
                        }
                        Err(RecvError::Closed) => break,
                    },

                    changed = clock.changed() => match changed {
                        Ok(()) => Trigger::Clock,
                        Err(_) => break,
                    },
                };

                let Some(lookout) = weak.upgrade() else { break };
                match trigger {
                    Trigger::Clock | Trigger::Event(ScoutEvent::WeatherChanged(_)) => {
                        lookout.refresh_fire_behavior();
                    }
                    Trigger::Event(ScoutEvent::PlaceChanged(_)) => lookout.refresh_fuel_model(),
                    Trigger::Event(ScoutEvent::MoveFinished(_)) => {
                        tokio::spawn(async move { lookout.scout().refresh().await });
                    }
                    Trigger::Event(ScoutEvent::FireBehaviorChanged(_)) => {}
                    // Any event kind may have been skipped
                    Trigger::Lagged => {
                        lookout.refresh_fire_behavior();
                        lookout.refresh_fuel_model();
                        tokio::spawn(async move { lookout.scout().refresh().await });
                    }
                }
            }
            debug!(scout = %id, "triggers stopped");
        })
    }
}

impl std::fmt::Debug for FireLookout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireLookout")
            .field("scout", &self.scout)
            .field("state", &*self.state.lock())
            .finish()
    }
}
