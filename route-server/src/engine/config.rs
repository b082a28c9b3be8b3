//! Engine configuration.

use std::time::Duration;

use crate::air::DEFAULT_STATION_TTL;
use crate::domain::Criterion;

/// Tunable constants used when deriving metrics.
///
/// Both factors are empirical and kept overridable rather than derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    /// Multiplier turning `pm25 * distance_km` into the exposure figure.
    pub pollution_exposure_factor: f64,

    /// Scale applied to motorcycle durations (lane-splitting heuristic).
    pub motorcycle_duration_factor: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            pollution_exposure_factor: 1.8,
            motorcycle_duration_factor: 0.9,
        }
    }
}

/// How per-segment health scores combine into a route score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthAggregation {
    /// Mean over segments.
    #[default]
    Mean,
    /// Worst segment, i.e. the highest score since lower is healthier.
    WorstCase,
}

/// Configuration parameters for route evaluation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub metrics: MetricsConfig,

    pub health_aggregation: HealthAggregation,

    /// Alternatives requested for directions-based criteria.
    pub max_alternatives: usize,

    /// Routes requested from the multimodal backend.
    pub max_multimodal_routes: usize,

    /// Upper bound on a single candidate fetch.
    pub request_timeout: Duration,

    /// Delay coalescing rapid input changes before a fetch; zero disables.
    pub debounce: Duration,

    /// How long the air-quality station list is reused.
    pub station_ttl: Duration,
}

impl EngineConfig {
    /// Candidate count to request for a criterion.
    pub fn max_routes(&self, criterion: Criterion) -> usize {
        match criterion {
            Criterion::Healthiest => self.max_multimodal_routes,
            _ => self.max_alternatives,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_health_aggregation(mut self, aggregation: HealthAggregation) -> Self {
        self.health_aggregation = aggregation;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsConfig::default(),
            health_aggregation: HealthAggregation::Mean,
            max_alternatives: 3,
            max_multimodal_routes: 1,
            request_timeout: Duration::from_secs(15),
            debounce: Duration::from_millis(400),
            station_ttl: DEFAULT_STATION_TTL,
        }
    }
}
