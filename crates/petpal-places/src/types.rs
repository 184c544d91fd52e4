//! Places provider response envelope.
//!
//! Individual records are kept as raw [`serde_json::Value`]s: they are
//! untrusted and validated one by one in [`crate::normalize`], so a single
//! malformed record never fails the whole response.

use serde::Deserialize;

/// Provider statuses that indicate a usable answer.
pub const USABLE_PROVIDER_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// Top-level nearby-search response body.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    /// Application-level status (`OK`, `ZERO_RESULTS`, `REQUEST_DENIED`, ...).
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl NearbySearchResponse {
    /// Returns the provider status when it signals a problem despite a 2xx.
    #[must_use]
    pub fn degraded_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .filter(|s| !USABLE_PROVIDER_STATUSES.contains(s))
    }
}
