//! Lookout - Environmental scouts and fire lookouts
//!
//! This library tracks point-like lookout entities on a map and keeps a
//! derived fire-behavior estimate current as time, location, weather and
//! fuel state change.
//!
//! # Architecture
//!
//! ```text
//! ApplicationClock ──┐
//!                    │
//! EventBus ──────────┼──► FireLookout::refresh_fire_behavior
//!   WeatherChanged   │        │
//!   PlaceChanged     │        ▼
//!   MoveFinished     │    RefreshState (Idle / Running / RunningWithPending)
//!                    │        │
//!                    │        ▼
//!                    │    sunlight ──► conditioned fuel ──► fire behavior
//!                    │                                          │
//!                    └──────────── FireBehaviorChanged ◄────────┘
//! ```
//!
//! Remote services (weather, place, sunlight, fuel, fire behavior, fuel model
//! locator) are traits in [`provider`]; they are injected through a
//! [`context::LookoutContext`] rather than resolved globally.

pub mod catalog;
pub mod config;
pub mod context;
pub mod events;
pub mod fire;
pub mod forecast;
pub mod manager;
pub mod provider;
pub mod scout;

pub use context::LookoutContext;
pub use fire::FireLookout;
pub use manager::LookoutManager;
pub use scout::{EnvironmentalScout, ScoutId};
