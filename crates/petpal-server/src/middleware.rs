use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use petpal_core::{AppConfig, CallerIdentity};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;
use crate::auth::{AuthError, IdentityResolver, StaticTokenResolver};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer identity settings used by middleware.
#[derive(Clone)]
pub struct AuthState {
    resolver: Arc<dyn IdentityResolver>,
    pub enabled: bool,
}

impl AuthState {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            resolver,
            enabled: true,
        }
    }

    /// Every request runs as [`CallerIdentity::anonymous`].
    pub fn disabled() -> Self {
        Self {
            resolver: Arc::new(StaticTokenResolver::default()),
            enabled: false,
        }
    }

    /// Builds auth from `PETPAL_API_TOKENS` (comma-separated `subject:token`).
    ///
    /// In development, empty/missing tokens disable auth for local iteration.
    /// In non-development envs, empty/missing tokens fail startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let resolver = StaticTokenResolver::from_pairs(&config.api_tokens)?;

        if resolver.is_empty() {
            if config.is_development() {
                tracing::warn!(
                    "PETPAL_API_TOKENS not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "PETPAL_API_TOKENS is required outside development; provide comma-separated subject:token pairs"
            );
        }

        Ok(Self::new(Arc::new(resolver)))
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter guarding the paid places quota.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

/// Builds the standard error envelope for a request rejected before any handler.
fn middleware_error(req: &Request, code: &'static str, message: &'static str) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    ApiError::new(request_id, code, message).into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware resolving the bearer token into a [`CallerIdentity`] extension.
///
/// When auth is disabled the anonymous identity is attached instead.
pub async fn require_caller(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut().insert(CallerIdentity::anonymous());
        return next.run(req).await;
    }

    // Owned so no borrow of the request is held across the await.
    let token = extract_bearer_token(req.headers().get(AUTHORIZATION)).map(ToOwned::to_owned);
    let resolved = match token {
        Some(token) => auth.resolver.resolve(&token).await,
        None => Err(AuthError::MissingToken),
    };

    match resolved {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(error) => {
            tracing::debug!(%error, "rejecting request without a valid caller identity");
            middleware_error(&req, "unauthorized", "missing or invalid bearer token")
        }
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        drop(window);
        return middleware_error(&req, "rate_limited", "rate limit exceeded");
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
