//! Air-quality service error types.

/// Errors that can occur when fetching monitoring stations.
///
/// Never escapes the resolver: a failed lookup degrades to a neutral
/// sample instead.
#[derive(Debug, thiserror::Error)]
pub enum AirQualityError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Local station data could not be read
    #[error("station data error: {message}")]
    Data { message: String },
}
