//! Place name selection and location labels.

use crate::provider::Place;

/// Place type skipped when choosing a display name.
pub const ZIP_CODE_PLACE_TYPE: &str = "Zip Code";

/// Picks the finest-grained place that is not a zip code.
///
/// `places` is ordered by granularity, finest first.
pub fn select_place_name(places: &[Place]) -> Option<&str> {
    places
        .iter()
        .find(|place| place.place_type != ZIP_CODE_PLACE_TYPE)
        .map(|place| place.name.as_str())
}

/// Two-line "Lat/Lon" label, latitude to 4 and longitude to 5 significant digits.
pub fn location_label(latitude: f64, longitude: f64) -> String {
    format!(
        "Lat {}\nLon {}",
        to_precision(latitude, 4),
        to_precision(longitude, 5)
    )
}

/// Formats `value` with `digits` significant digits.
fn to_precision(value: f64, digits: usize) -> String {
    let magnitude = if value == 0.0 {
        1
    } else {
        value.abs().log10().floor() as i64 + 1
    };
    let decimals = (digits as i64 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}
