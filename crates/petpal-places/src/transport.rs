use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::TransportError;

/// Raw provider answer: HTTP status plus the undecoded body.
///
/// The body stays as bytes so callers can classify the status before
/// attempting to decode JSON.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ProviderResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Outbound capability: one HTTPS GET against the places endpoint.
///
/// Implementations must not retry and must release the underlying connection
/// on every exit path, including when the returned future is dropped.
#[async_trait]
pub trait PlacesTransport: Send + Sync {
    /// Issues a GET with the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response could be obtained.
    async fn get(&self, params: &[(&'static str, String)])
        -> Result<ProviderResponse, TransportError>;
}
