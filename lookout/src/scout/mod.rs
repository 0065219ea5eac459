//! Environmental scouts.
//!
//! A scout is a point entity that keeps a weather forecast and a place name
//! for its position. Fire lookouts wrap a scout and add fire behavior.

mod environmental;
mod id;
mod place;

pub use environmental::{EnvironmentalScout, ScoutError, ScoutParams, DEFAULT_SCOUT_NAME};
pub use id::ScoutId;
pub use place::{location_label, select_place_name, ZIP_CODE_PLACE_TYPE};
