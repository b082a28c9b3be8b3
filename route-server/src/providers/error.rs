//! Route provider error types.

/// A failed candidate fetch.
///
/// Covers every way a directions or find-way call can fail: transport
/// errors, timeouts, error statuses and undecodable bodies. Callers decide
/// whether to surface it; an empty route list is not an error.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Invalid or missing access token
    #[error("unauthorized (check the access token)")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("rate limited by provider")]
    RateLimited,

    /// Provider returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider not usable with the current configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }
}

impl FetchError {
    /// Build a JSON error keeping a short prefix of the offending body.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        FetchError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
