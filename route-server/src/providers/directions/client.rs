//! Directions HTTP client.
//!
//! Queries the Mapbox-compatible Directions v5 API for route alternatives
//! between two points and converts them into candidates.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::RouteCandidate;
use crate::providers::{DirectionsProvider, FetchError, RouteQuery, read_json};

use super::convert::convert_directions;
use super::types::DirectionsResponse;

/// Default base URL for the directions API.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Access token appended to every request
    pub access_token: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
///
/// Uses a semaphore to limit concurrent requests across sessions.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new directions client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, FetchError> {
        if config.access_token.is_empty() {
            return Err(FetchError::NotConfigured(
                "directions access token is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Request URL for a query (without query string).
    fn url(&self, query: &RouteQuery) -> String {
        format!(
            "{}/directions/v5/mapbox/{}/{};{}",
            self.base_url,
            query.mode.directions_profile(),
            query.origin,
            query.destination
        )
    }
}

impl DirectionsProvider for DirectionsClient {
    async fn directions(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::NotConfigured("semaphore closed".to_string()))?;

        let alternatives = if query.max_routes > 1 { "true" } else { "false" };

        let response = self
            .http
            .get(self.url(query))
            .query(&[
                ("alternatives", alternatives),
                ("geometries", "geojson"),
                ("overview", "full"),
                ("annotations", "congestion"),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;

        let body: DirectionsResponse = read_json(response).await?;

        if let Some(code) = body.code.as_deref().filter(|c| *c != "Ok") {
            debug!(
                code,
                message = body.message.as_deref().unwrap_or(""),
                "directions returned no usable route"
            );
        }

        let candidates = convert_directions(body, &query.mode, query.max_routes);
        debug!(
            profile = query.mode.directions_profile(),
            count = candidates.len(),
            "fetched directions"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Criterion, GeoPoint, TransportMode};

    #[test]
    fn config_builder() {
        let config = DirectionsConfig::new("token")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(5);

        assert_eq!(config.access_token, "token");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = DirectionsConfig::new("token");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn empty_token_is_rejected() {
        let result = DirectionsClient::new(DirectionsConfig::new(""));
        assert!(matches!(result, Err(FetchError::NotConfigured(_))));
    }

    #[test]
    fn url_uses_mode_profile_and_lon_lat() {
        let client =
            DirectionsClient::new(DirectionsConfig::new("t").with_base_url("http://x/")).unwrap();
        let query = RouteQuery {
            origin: GeoPoint::new(105.8, 21.0),
            destination: GeoPoint::new(105.9, 21.1),
            mode: TransportMode::Motorcycle,
            criterion: Criterion::Fastest,
            max_routes: 3,
        };

        assert_eq!(
            client.url(&query),
            "http://x/directions/v5/mapbox/driving/105.8,21;105.9,21.1"
        );
    }
}
