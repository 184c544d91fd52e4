use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use petpal_core::{CallerIdentity, Coordinate};
use petpal_places::{LookupError, VetPublic};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: f64,
    lng: f64,
}

pub(super) async fn nearby_vets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(caller): Extension<CallerIdentity>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<Vec<VetPublic>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;

    let coordinate = Coordinate::new(query.lat, query.lng)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let vets = state
        .vets
        .fetch_nearby(coordinate, &caller)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(vets))
}

/// Maps a classified lookup failure onto a generic, caller-safe API error.
pub(super) fn map_lookup_error(request_id: String, error: &LookupError) -> ApiError {
    tracing::warn!(request_id = %request_id, error = %error, "nearby vet lookup failed");
    let message = match error {
        LookupError::ProviderUnavailable { .. } => "Error fetching data from places provider",
        LookupError::Internal(_) => "An internal error occurred",
    };
    ApiError::new(request_id, error.code(), message)
}
