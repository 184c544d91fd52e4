use serde::Serialize;

/// The authenticated caller of a protected operation.
///
/// Resolved by the server's identity layer before any handler runs; services
/// use it for access control and log correlation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    pub subject: String,
}

impl CallerIdentity {
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Identity attached to requests when token auth is disabled in development.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }
}
