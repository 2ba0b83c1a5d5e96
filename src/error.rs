//! Crate-level error types.
//!
//! [`P2pRateError`] unifies every failure the service can hit (startup
//! configuration, the upstream round trip, local JSON handling) behind a
//! single enum so callers can match on the variant they care about while
//! still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, P2pRateError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum P2pRateError {
    /// A required environment variable is missing or holds an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream could not be reached, timed out, or reported failure.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream answered but the payload did not have the expected shape.
    #[error("invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    /// The request signature could not be computed.
    #[error("signing error: {0}")]
    Signing(String),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binding or serving the HTTP listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for P2pRateError {
    /// Every transport-level failure, including timeouts and non-2xx
    /// statuses surfaced by `error_for_status`, counts as the upstream
    /// being unavailable.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::UpstreamUnavailable(format!("request timed out: {err}"));
        }
        Self::UpstreamUnavailable(err.to_string())
    }
}
