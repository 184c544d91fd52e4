//! Geographic coordinate value type.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude must be a finite value within [-90, 90], got {0}")]
    Latitude(f64),

    #[error("longitude must be a finite value within [-180, 180], got {0}")]
    Longitude(f64),
}

/// A validated latitude/longitude pair in decimal degrees.
///
/// Constructed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range components.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::Latitude`] or [`CoordinateError::Longitude`]
    /// naming the first offending component.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Renders the `"{lat},{lng}"` form used by places search endpoints.
    #[must_use]
    pub fn as_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}
