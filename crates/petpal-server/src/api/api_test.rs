use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use petpal_places::{
    LookupError, PlacesTransport, ProviderResponse, SearchPolicy, TransportError,
};
use tower::ServiceExt;

use super::*;
use crate::auth::StaticTokenResolver;

enum Canned {
    Json(serde_json::Value),
    Status(StatusCode),
    ConnectionReset,
}

struct CannedTransport(Canned);

#[async_trait]
impl PlacesTransport for CannedTransport {
    async fn get(
        &self,
        _params: &[(&'static str, String)],
    ) -> Result<ProviderResponse, TransportError> {
        match &self.0 {
            Canned::Json(body) => Ok(ProviderResponse::new(
                StatusCode::OK,
                serde_json::to_vec(body).expect("serialize body"),
            )),
            Canned::Status(status) => Ok(ProviderResponse::new(*status, b"oops".to_vec())),
            Canned::ConnectionReset => Err(TransportError::Connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer at 10.0.0.7",
            ))),
        }
    }
}

fn two_vets() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "B",
                "name": "Bandra Vet Hospital",
                "vicinity": "Hill Road",
                "geometry": { "location": { "lat": 19.05, "lng": 72.83 } },
                "rating": 4.5,
                "user_ratings_total": 120
            },
            {
                "place_id": "A",
                "name": "Andheri Animal Care",
                "vicinity": "SV Road",
                "geometry": { "location": { "lat": 19.12, "lng": 72.85 } }
            }
        ]
    })
}

fn state_with(canned: Canned) -> AppState {
    AppState {
        vets: VetLookupService::new(
            Arc::new(CannedTransport(canned)),
            "test-key",
            SearchPolicy::default(),
        ),
    }
}

fn token_auth() -> AuthState {
    let resolver = StaticTokenResolver::from_pairs(&["owner@example.com:tok-owner".to_string()])
        .expect("resolver");
    AuthState::new(Arc::new(resolver))
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:8100".to_string()]
}

fn app(canned: Canned) -> Router {
    build_app(
        state_with(canned),
        token_auth(),
        RateLimitState::per_minute(120),
        &default_origins(),
    )
}

fn nearby_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/vets/nearby?{query}"))
        .header("authorization", "Bearer tok-owner")
        .body(Body::empty())
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_provider_unavailable_maps_to_503() {
    let response = ApiError::new("req-1", "provider_unavailable", "down").into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_500() {
    let response = ApiError::new("req-1", "not_found", "missing").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn map_lookup_error_hides_internal_detail() {
    let error = LookupError::Internal("connection reset at 10.0.0.7".to_string());
    let api_error = vets::map_lookup_error("req-9".to_string(), &error);
    assert_eq!(api_error.error.code, "internal_error");
    assert_eq!(api_error.error.message, "An internal error occurred");
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap_or_default().contains("PetPal"));
}

#[tokio::test]
async fn health_is_public_and_echoes_request_id() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-health")
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[tokio::test]
async fn nearby_requires_bearer_token() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(
            Request::builder()
                .uri("/api/vets/nearby?lat=19.07&lng=72.87")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn nearby_rejects_unknown_token() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(
            Request::builder()
                .uri("/api/vets/nearby?lat=19.07&lng=72.87")
                .header("authorization", "Bearer tok-stranger")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn nearby_returns_bare_array_in_provider_order() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(nearby_request("lat=19.076&lng=72.8777"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let json = json_body(response).await;
    let items = json.as_array().expect("bare JSON array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["place_id"], "B");
    assert_eq!(items[0]["address"], "Hill Road");
    assert_eq!(items[0]["total_ratings"], 120);
    assert_eq!(items[1]["place_id"], "A");
    assert_eq!(items[1]["rating"], 0.0);
    assert_eq!(items[1]["total_ratings"], 0);
    assert!(items[1]["phone"].is_null());
}

#[tokio::test]
async fn nearby_with_auth_disabled_runs_as_anonymous() {
    let app = build_app(
        state_with(Canned::Json(two_vets())),
        AuthState::disabled(),
        RateLimitState::per_minute(120),
        &default_origins(),
    );
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/vets/nearby?lat=19.07&lng=72.87")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn provider_error_status_maps_to_503() {
    let response = app(Canned::Status(StatusCode::INTERNAL_SERVER_ERROR))
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "provider_unavailable");
    assert_eq!(
        json["error"]["message"],
        "Error fetching data from places provider"
    );
}

#[tokio::test]
async fn transport_failure_maps_to_generic_500() {
    let response = app(Canned::ConnectionReset)
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["message"], "An internal error occurred");
    assert!(!json.to_string().contains("10.0.0.7"));
}

#[tokio::test]
async fn out_of_range_latitude_is_validation_error() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(nearby_request("lat=91&lng=72.87"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn missing_lng_is_bad_request() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(nearby_request("lat=19.07"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn non_numeric_lat_is_bad_request() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(nearby_request("lat=north&lng=72.87"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rate_limit_rejects_after_window_is_spent() {
    let app = build_app(
        state_with(Canned::Json(two_vets())),
        token_auth(),
        RateLimitState::new(1, Duration::from_secs(60)),
        &default_origins(),
    );

    let first = app
        .clone()
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_with_credentials() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/vets/nearby")
                .header("origin", "http://localhost:8100")
                .header("access-control-request-method", "GET")
                .header("access-control-request-headers", "authorization")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:8100")
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn cors_does_not_echo_unlisted_origin() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "https://evil.example")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

fn anonymous_nearby_request(request_id: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/vets/nearby?lat=19.07&lng=72.87")
        .header("x-request-id", request_id)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn unauthenticated_requests_do_not_spend_rate_limit_window() {
    let app = build_app(
        state_with(Canned::Json(two_vets())),
        token_auth(),
        RateLimitState::new(2, Duration::from_secs(60)),
        &default_origins(),
    );

    for attempt in 0..2 {
        let response = app
            .clone()
            .oneshot(anonymous_nearby_request(&format!("anon-{attempt}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthorized_body_carries_request_meta() {
    let response = app(Canned::Json(two_vets()))
        .oneshot(anonymous_nearby_request("rid-401"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "unauthorized");
    assert_eq!(json["meta"]["request_id"], "rid-401");
    assert!(json["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn rate_limited_body_carries_request_meta() {
    let app = build_app(
        state_with(Canned::Json(two_vets())),
        token_auth(),
        RateLimitState::new(1, Duration::from_secs(60)),
        &default_origins(),
    );

    let first = app
        .clone()
        .oneshot(nearby_request("lat=19.07&lng=72.87"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(
            Request::builder()
                .uri("/api/vets/nearby?lat=19.07&lng=72.87")
                .header("authorization", "Bearer tok-owner")
                .header("x-request-id", "rid-429")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = json_body(second).await;
    assert_eq!(json["error"]["code"], "rate_limited");
    assert_eq!(json["meta"]["request_id"], "rid-429");
}
