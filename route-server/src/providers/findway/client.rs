//! Multimodal find-way HTTP client.

use std::time::Duration;

use tracing::debug;

use crate::domain::RouteCandidate;
use crate::providers::{FetchError, MultimodalProvider, RouteQuery, read_json};

use super::convert::convert_find_way;
use super::types::{FindWayRequest, FindWayResponse};

/// Default base URL for the find-way backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Configuration for the find-way client.
#[derive(Debug, Clone)]
pub struct FindWayConfig {
    /// Base URL; the client posts to `{base_url}/find-way`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FindWayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 15,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FindWayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the multimodal find-way backend.
#[derive(Debug, Clone)]
pub struct FindWayClient {
    http: reqwest::Client,
    url: String,
}

impl FindWayClient {
    pub fn new(config: FindWayConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: format!("{}/find-way", config.base_url.trim_end_matches('/')),
        })
    }
}

/// Build the backend request body for a query.
pub fn find_way_request(query: &RouteQuery) -> FindWayRequest {
    FindWayRequest {
        start_lon: query.origin.lon,
        start_lat: query.origin.lat,
        end_lon: query.destination.lon,
        end_lat: query.destination.lat,
        mode: query.mode.as_str().to_string(),
        criteria: query.criterion.as_str().to_string(),
        max_routes: query.max_routes,
    }
}

impl MultimodalProvider for FindWayClient {
    async fn find_way(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
        let response = self
            .http
            .post(&self.url)
            .json(&find_way_request(query))
            .send()
            .await?;

        let body: FindWayResponse = read_json(response).await?;
        let candidates = convert_find_way(body, &query.mode, query.max_routes);
        debug!(count = candidates.len(), "fetched multimodal routes");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Criterion, GeoPoint, TransportMode};

    #[test]
    fn config_defaults() {
        let config = FindWayConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.with_timeout(3).timeout_secs, 3);
    }

    #[test]
    fn client_joins_endpoint() {
        let client = FindWayClient::new(FindWayConfig::new("http://backend/api/")).unwrap();
        assert_eq!(client.url, "http://backend/api/find-way");
    }

    #[test]
    fn request_from_query() {
        let query = RouteQuery {
            origin: GeoPoint::new(105.8, 21.0),
            destination: GeoPoint::new(105.9, 21.1),
            mode: TransportMode::Walking,
            criterion: Criterion::Healthiest,
            max_routes: 1,
        };
        let req = find_way_request(&query);

        assert_eq!(req.start_lon, 105.8);
        assert_eq!(req.end_lat, 21.1);
        assert_eq!(req.mode, "walking");
        assert_eq!(req.criteria, "healthiest");
        assert_eq!(req.max_routes, 1);
    }
}
