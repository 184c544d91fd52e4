//! The nearby-vet lookup pipeline.

use std::sync::Arc;

use petpal_core::{AppConfig, CallerIdentity, Coordinate};

use crate::client::HttpPlacesTransport;
use crate::error::{LookupError, TransportError};
use crate::normalize::{normalize_results, VetPublic};
use crate::transport::PlacesTransport;
use crate::types::NearbySearchResponse;

/// Search radius around the caller's coordinate, in meters.
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 5000;

/// Category keyword sent to the provider.
pub const DEFAULT_SEARCH_KEYWORD: &str = "veterinarian";

/// Fixed search scope. Operators may tune it through configuration; callers
/// never can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    pub radius_meters: u32,
    pub keyword: String,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            keyword: DEFAULT_SEARCH_KEYWORD.to_owned(),
        }
    }
}

/// Looks up veterinarians near a coordinate.
///
/// Stateless between calls: each invocation makes exactly one provider call,
/// with no retry and no caching. Cheap to clone.
#[derive(Clone)]
pub struct VetLookupService {
    transport: Arc<dyn PlacesTransport>,
    api_key: Arc<str>,
    policy: SearchPolicy,
}

impl VetLookupService {
    pub fn new(
        transport: Arc<dyn PlacesTransport>,
        api_key: impl Into<String>,
        policy: SearchPolicy,
    ) -> Self {
        let api_key: String = api_key.into();
        Self {
            transport,
            api_key: Arc::from(api_key),
            policy,
        }
    }

    /// Builds the service with an [`HttpPlacesTransport`] from application
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP transport cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        let transport =
            HttpPlacesTransport::with_base_url(config.places_timeout_secs, &config.places_base_url)?;
        let policy = SearchPolicy {
            radius_meters: config.vet_search_radius_meters,
            keyword: config.vet_search_keyword.clone(),
        };
        Ok(Self::new(
            Arc::new(transport),
            config.google_places_api_key.clone(),
            policy,
        ))
    }

    /// Query parameters for one nearby search, in wire order.
    #[must_use]
    pub fn query_params(&self, coordinate: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("location", coordinate.as_query_value()),
            ("radius", self.policy.radius_meters.to_string()),
            ("keyword", self.policy.keyword.clone()),
            ("key", self.api_key.to_string()),
        ]
    }

    /// Fetches veterinarians near `coordinate` on behalf of `caller`.
    ///
    /// Results keep the provider's order. Records missing a required field
    /// are skipped silently.
    ///
    /// # Errors
    ///
    /// - [`LookupError::ProviderUnavailable`] when the provider answers with a
    ///   non-2xx status.
    /// - [`LookupError::Internal`] on transport failure or an undecodable body.
    pub async fn fetch_nearby(
        &self,
        coordinate: Coordinate,
        caller: &CallerIdentity,
    ) -> Result<Vec<VetPublic>, LookupError> {
        let params = self.query_params(coordinate);

        let response = self.transport.get(&params).await.map_err(|error| {
            tracing::error!(
                caller = %caller.subject,
                %error,
                "places provider request failed"
            );
            LookupError::Internal(error.to_string())
        })?;

        if !response.status.is_success() {
            tracing::error!(
                caller = %caller.subject,
                status = response.status.as_u16(),
                "places provider returned an error status"
            );
            return Err(LookupError::ProviderUnavailable {
                status: response.status.as_u16(),
            });
        }

        let envelope: NearbySearchResponse =
            serde_json::from_slice(&response.body).map_err(|error| {
                tracing::error!(
                    caller = %caller.subject,
                    %error,
                    "places provider returned an undecodable body"
                );
                LookupError::Internal(format!("invalid places response: {error}"))
            })?;

        if let Some(status) = envelope.degraded_status() {
            tracing::warn!(
                provider_status = status,
                provider_message = envelope.error_message.as_deref().unwrap_or(""),
                "places provider reported a non-OK status"
            );
        }

        let vets = normalize_results(&envelope.results);
        tracing::debug!(
            caller = %caller.subject,
            received = envelope.results.len(),
            kept = vets.len(),
            "nearby vets normalized"
        );
        Ok(vets)
    }
}

impl std::fmt::Debug for VetLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VetLookupService")
            .field("api_key", &"[redacted]")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
