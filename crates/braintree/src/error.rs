use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by gateway operations.
///
/// API-level validation failures reported by the gateway in a 2xx/422 body
/// are not errors; they come back as [`crate::GatewayResult::Error`].
#[derive(Debug, Error)]
pub enum BraintreeError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("authentication failed")]
    Authentication,

    #[error("not authorized to perform this request")]
    Authorization,

    #[error("client library upgrade required")]
    UpgradeRequired,

    #[error("too many requests")]
    TooManyRequests,

    #[error("gateway server error")]
    ServerError,

    #[error("gateway temporarily unavailable")]
    ServiceUnavailable,

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("http error: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl BraintreeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BraintreeError::NotFound(_))
    }

    /// Replace the transport's generic not-found message with one naming
    /// the resource. Other errors pass through untouched.
    pub(crate) fn describe_not_found(self, message: impl FnOnce() -> String) -> Self {
        match self {
            BraintreeError::NotFound(_) => BraintreeError::NotFound(message()),
            other => other,
        }
    }
}
