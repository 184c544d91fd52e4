//! Normalization of raw places-provider records into [`VetPublic`].
//!
//! Every required field is checked explicitly for presence and type. A record
//! missing any of them is dropped whole; partial records are never emitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public contract for a nearby veterinarian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetPublic {
    pub place_id: String,
    pub name: String,
    /// Provider `vicinity`, a short human-readable address.
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    /// Not supplied by nearby search; kept for clients that already read it.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Converts one raw provider record into a [`VetPublic`].
///
/// Returns `None` unless `place_id`, `name` and `vicinity` are non-empty
/// strings and `geometry.location.{lat,lng}` are finite numbers. A `0.0`
/// coordinate is a valid location and is kept.
#[must_use]
pub fn normalize_place(place: &Value) -> Option<VetPublic> {
    let place_id = non_empty_str(place, "place_id")?;
    let name = non_empty_str(place, "name")?;
    let address = non_empty_str(place, "vicinity")?;

    let location = place.get("geometry").and_then(|g| g.get("location"))?;
    let lat = finite_number(location, "lat")?;
    let lng = finite_number(location, "lng")?;

    Some(VetPublic {
        place_id: place_id.to_owned(),
        name: name.to_owned(),
        address: address.to_owned(),
        lat,
        lng,
        rating: finite_number(place, "rating").unwrap_or(0.0),
        total_ratings: rating_count(place.get("user_ratings_total")),
        phone: None,
    })
}

/// Normalizes a provider result list, skipping malformed records and keeping
/// provider order. No deduplication is applied.
#[must_use]
pub fn normalize_results(results: &[Value]) -> Vec<VetPublic> {
    results
        .iter()
        .filter_map(|place| {
            let vet = normalize_place(place);
            if vet.is_none() {
                tracing::debug!(
                    place_id = place.get("place_id").and_then(serde_json::Value::as_str),
                    "skipping places record with missing required fields"
                );
            }
            vet
        })
        .collect()
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn finite_number(value: &Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
}

/// Reads a non-negative count, accepting integral floats (`12.0`).
/// Anything else counts as absent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating_count(value: Option<&Value>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).unwrap_or(u32::MAX);
    }
    match value.as_f64() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => n as u32,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
