//! Caller identity resolution.
//!
//! Token issuance lives elsewhere; this module only turns a presented bearer
//! token into a [`CallerIdentity`].

use async_trait::async_trait;
use petpal_core::CallerIdentity;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token")]
    InvalidToken,
}

/// Resolves a bearer token into the caller it belongs to.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError`] when the token is empty or unknown.
    async fn resolve(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}

/// Resolver backed by a fixed `subject:token` table from configuration.
#[derive(Clone, Default)]
pub struct StaticTokenResolver {
    entries: Vec<(String, String)>,
}

impl StaticTokenResolver {
    /// Parses `subject:token` pairs.
    ///
    /// # Errors
    ///
    /// Fails when an entry has no `:` separator or an empty side.
    pub fn from_pairs(raw: &[String]) -> anyhow::Result<Self> {
        let entries = raw
            .iter()
            .map(|pair| -> anyhow::Result<(String, String)> {
                let (subject, token) = pair
                    .split_once(':')
                    .map(|(s, t)| (s.trim(), t.trim()))
                    .filter(|(s, t)| !s.is_empty() && !t.is_empty())
                    .ok_or_else(|| {
                        anyhow::anyhow!("PETPAL_API_TOKENS entries must be `subject:token`")
                    })?;
                Ok((subject.to_owned(), token.to_owned()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        // Compare against every entry so timing does not reveal which matched.
        let mut matched = None;
        for (subject, expected) in &self.entries {
            if bool::from(expected.as_bytes().ct_eq(token.as_bytes())) {
                matched = Some(subject);
            }
        }

        matched
            .map(|subject| CallerIdentity::new(subject.as_str()))
            .ok_or(AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for StaticTokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenResolver")
            .field("entries", &self.entries.len())
            .finish()
    }
}
