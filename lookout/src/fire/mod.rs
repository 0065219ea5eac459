//! Fire lookouts and their refresh pipeline.
//!
//! A [`FireLookout`] derives surface fire behavior for its position in three
//! sequential provider stages:
//!
//! ```text
//! forecast_at(now) + terrain ──► sunlight ──► conditioned fuel ──► fire behavior
//!                                                   │
//!                                        unavailable: abort, no event
//! ```
//!
//! [`RefreshState`] keeps at most one pass running per lookout.

mod lookout;
mod pipeline;

pub use lookout::{FireLookout, DEFAULT_LOOKOUT_NAME};
pub use pipeline::{CompletionOutcome, RefreshState, TriggerOutcome};
