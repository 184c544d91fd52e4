use thiserror::Error;

/// Failures raised by a [`crate::PlacesTransport`] before any HTTP status is
/// available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network, TLS, timeout or body-read failure from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket-level failure reported by transports that do not go through
    /// `reqwest`; [`crate::HttpPlacesTransport`] reports these as `Http`.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Classified outcome of a failed nearby-vet lookup.
///
/// The HTTP boundary maps `ProviderUnavailable` to 503 and `Internal` to 500.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The provider answered with a non-2xx status.
    #[error("places provider returned HTTP {status}")]
    ProviderUnavailable { status: u16 },

    /// Any other failure: transport error, timeout, undecodable payload.
    #[error("nearby vet lookup failed: {0}")]
    Internal(String),
}

impl LookupError {
    /// Stable machine-readable code used in API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}
