//! Reqwest-backed [`PlacesTransport`].
//!
//! Owns transport details only: timeouts, URL building and body reads.
//! Status classification and decoding live in [`crate::service`].

use std::time::Duration;

use async_trait::async_trait;
use petpal_core::config::DEFAULT_PLACES_BASE_URL;
use reqwest::{Client, Url};

use crate::error::TransportError;
use crate::transport::{PlacesTransport, ProviderResponse};

const USER_AGENT: &str = "petpal/0.1 (nearby-vets)";

/// Upper bound on a buffered provider body. A nearby-search page is a few
/// tens of kilobytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP transport for the places nearby-search endpoint.
///
/// Use [`HttpPlacesTransport::new`] for production or
/// [`HttpPlacesTransport::with_base_url`] to point at a mock server in tests.
pub struct HttpPlacesTransport {
    client: Client,
    endpoint: Url,
    max_body_bytes: usize,
}

impl HttpPlacesTransport {
    /// Creates a transport pointed at the production nearby-search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        Self::with_base_url(timeout_secs, DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a transport with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`TransportError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        let endpoint = Url::parse(base_url).map_err(|e| TransportError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Overrides the body size cap (default [`DEFAULT_MAX_BODY_BYTES`]).
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Builds the request URL with percent-encoded query parameters appended
    /// in the given order.
    fn build_url(&self, params: &[(&'static str, String)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }
}

impl std::fmt::Debug for HttpPlacesTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlacesTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlacesTransport for HttpPlacesTransport {
    async fn get(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<ProviderResponse, TransportError> {
        let url = self.build_url(params);
        // The URL carries the API key; strip it from any error before it can
        // reach a log line.
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        let limit = self.max_body_bytes;
        if response
            .content_length()
            .is_some_and(|len| usize::try_from(len).map_or(true, |len| len > limit))
        {
            return Err(TransportError::BodyTooLarge { limit });
        }

        // Content-Length may be absent (chunked), so enforce the cap while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(reqwest::Error::without_url)?
        {
            if body.len() + chunk.len() > limit {
                return Err(TransportError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(ProviderResponse::new(status, body))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
