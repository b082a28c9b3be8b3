//! Search history logging.
//!
//! Each completed endpoint pair is posted to a history service. Logging is
//! fire-and-forget: it never delays or fails a route request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::{Criterion, GeoPoint, TransportMode};

/// Errors from the search log service.
#[derive(Debug, thiserror::Error)]
pub enum SearchLogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search log rejected entry with status {0}")]
    Status(u16),
}

/// Configuration for the search log client.
#[derive(Debug, Clone)]
pub struct SearchLogConfig {
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SearchLogConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 5,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// One search history record, in the service's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub description: String,
    /// RFC 3339 timestamp
    pub time: String,
    /// Day bucket, `YYYY-MM-DD`
    #[serde(rename = "dateKey")]
    pub date_key: String,
}

impl SearchEntry {
    pub fn new(
        user_id: impl Into<String>,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: &TransportMode,
        criterion: Criterion,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            description: format!("{origin} -> {destination} ({mode}, {criterion})"),
            time: at.to_rfc3339(),
            date_key: at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Client posting search entries to the history service.
#[derive(Debug, Clone)]
pub struct SearchLogClient {
    http: reqwest::Client,
    url: String,
}

impl SearchLogClient {
    pub fn new(config: SearchLogConfig) -> Result<Self, SearchLogError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Post an entry and wait for the outcome.
    pub async fn send(&self, entry: &SearchEntry) -> Result<(), SearchLogError> {
        let response = self.http.post(&self.url).json(entry).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchLogError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Post an entry in the background, discarding failures.
    pub fn record(&self, entry: SearchEntry) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.send(&entry).await {
                debug!(error = %e, user = %entry.user_id, "search log entry dropped");
            }
        });
    }
}
