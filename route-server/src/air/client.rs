//! Air-quality service client.

use serde_json::json;

use super::error::AirQualityError;
use super::resolver::StationSource;
use super::types::{Station, StationDto, convert_stations};

/// Default URL of the station listing endpoint.
const DEFAULT_URL: &str = "http://localhost:8080/api/air-quality/stations";

/// Configuration for the air-quality client.
#[derive(Debug, Clone)]
pub struct AirQualityConfig {
    /// Station listing endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AirQualityConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 10,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Client for the air-quality station service.
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    http: reqwest::Client,
    url: String,
}

impl AirQualityClient {
    pub fn new(config: AirQualityConfig) -> Result<Self, AirQualityError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch every station (an empty name filter lists all of them).
    pub async fn fetch_all(&self) -> Result<Vec<Station>, AirQualityError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "stationName": "" }))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AirQualityError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let dtos: Vec<StationDto> =
            serde_json::from_str(&body).map_err(|e| AirQualityError::Json {
                message: e.to_string(),
            })?;

        Ok(convert_stations(dtos))
    }
}

impl StationSource for AirQualityClient {
    async fn stations(&self) -> Result<Vec<Station>, AirQualityError> {
        self.fetch_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AirQualityConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_with_timeout() {
        let config = AirQualityConfig::new("http://localhost:9000/stations").with_timeout(2);
        assert_eq!(config.url, "http://localhost:9000/stations");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn client_creation() {
        assert!(AirQualityClient::new(AirQualityConfig::default()).is_ok());
    }
}
