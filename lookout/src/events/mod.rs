//! Event bus and application clock.
//!
//! Each scout owns an [`EventBus`] on which it announces its own changes;
//! the process-wide [`ApplicationClock`] announces application time changes.
//!
//! # Architecture
//!
//! ```text
//! EnvironmentalScout ──publish──► EventBus (broadcast) ──► trigger task
//!                                                              ▲
//! ApplicationClock ─────set─────► watch channel ───────────────┘
//! ```
//!
//! Subscribers that fall behind on a bus see `RecvError::Lagged`; trigger
//! consumers treat that as one more refresh request, which the coalescing
//! state machine absorbs.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{broadcast, watch};
use tracing::trace;

use crate::scout::ScoutId;

/// Default bus capacity per scout.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Events published by a scout about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoutEvent {
    /// A new forecast series was stored.
    WeatherChanged(ScoutId),
    /// A new place name was stored.
    PlaceChanged(ScoutId),
    /// A new fire behavior result was stored.
    FireBehaviorChanged(ScoutId),
    /// An interactive move ended.
    MoveFinished(ScoutId),
}

impl ScoutEvent {
    /// The scout the event is about.
    pub fn scout_id(&self) -> &ScoutId {
        match self {
            ScoutEvent::WeatherChanged(id)
            | ScoutEvent::PlaceChanged(id)
            | ScoutEvent::FireBehaviorChanged(id)
            | ScoutEvent::MoveFinished(id) => id,
        }
    }

    /// Event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ScoutEvent::WeatherChanged(_) => "weather-changed",
            ScoutEvent::PlaceChanged(_) => "place-changed",
            ScoutEvent::FireBehaviorChanged(_) => "fire-behavior-changed",
            ScoutEvent::MoveFinished(_) => "move-finished",
        }
    }
}

impl fmt::Display for ScoutEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.scout_id())
    }
}

/// Per-scout publish/subscribe channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScoutEvent>,
}

impl EventBus {
    /// Creates a bus that buffers up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event, returning how many subscribers received it.
    pub fn publish(&self, event: ScoutEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                trace!(event = %event, "no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScoutEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Process-wide application time.
///
/// The application time is what lookouts compute fire behavior for; it is
/// not wall-clock time (users can scrub it forward and back).
#[derive(Debug)]
pub struct ApplicationClock {
    tx: watch::Sender<DateTime<Utc>>,
}

impl ApplicationClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        let (tx, _) = watch::channel(start);
        Self { tx }
    }

    /// Creates a clock starting at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Current application time.
    pub fn now(&self) -> DateTime<Utc> {
        *self.tx.borrow()
    }

    /// Sets the application time and notifies subscribers.
    pub fn set(&self, time: DateTime<Utc>) {
        self.tx.send_replace(time);
    }

    /// Moves the application time by `delta` and notifies subscribers.
    pub fn advance(&self, delta: Duration) {
        let next = self.now() + delta;
        self.set(next);
    }

    /// Receiver that wakes on every time change.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.tx.subscribe()
    }
}
