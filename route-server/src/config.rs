//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::air::AirQualityConfig;
use crate::engine::EngineConfig;
use crate::providers::{DirectionsConfig, FindWayConfig};
use crate::searchlog::SearchLogConfig;
use crate::web::DEFAULT_SESSION_IDLE;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
    3000,
);

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Directions provider settings; `None` without an access token.
    pub directions: Option<DirectionsConfig>,

    pub air_quality: AirQualityConfig,

    pub find_way: FindWayConfig,

    /// Search history endpoint; logging is off when unset.
    pub search_log: Option<SearchLogConfig>,

    pub engine: EngineConfig,

    /// Sessions untouched for this long are dropped.
    pub session_idle: Duration,

    /// Serve recorded fixtures from this directory instead of live APIs.
    pub fixture_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            directions: None,
            air_quality: AirQualityConfig::default(),
            find_way: FindWayConfig::default(),
            search_log: None,
            engine: EngineConfig::default(),
            session_idle: DEFAULT_SESSION_IDLE,
            fixture_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset or empty values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 15u64);
        let debounce_ms = parse_or("DEBOUNCE_MS", var("DEBOUNCE_MS"), 400u64);

        config.engine = config
            .engine
            .with_request_timeout(Duration::from_secs(timeout_secs))
            .with_debounce(Duration::from_millis(debounce_ms));
        config.engine.metrics.pollution_exposure_factor = parse_or(
            "POLLUTION_EXPOSURE_FACTOR",
            var("POLLUTION_EXPOSURE_FACTOR"),
            config.engine.metrics.pollution_exposure_factor,
        );
        config.engine.metrics.motorcycle_duration_factor = parse_or(
            "MOTORCYCLE_DURATION_FACTOR",
            var("MOTORCYCLE_DURATION_FACTOR"),
            config.engine.metrics.motorcycle_duration_factor,
        );

        config.directions = var("DIRECTIONS_ACCESS_TOKEN").map(|token| {
            let directions = DirectionsConfig::new(token).with_timeout(timeout_secs);
            match var("DIRECTIONS_BASE_URL") {
                Some(url) => directions.with_base_url(url),
                None => directions,
            }
        });

        if let Some(url) = var("AIR_QUALITY_URL") {
            config.air_quality = AirQualityConfig::new(url);
        }
        config.air_quality = config.air_quality.with_timeout(timeout_secs);

        if let Some(url) = var("FINDWAY_URL") {
            config.find_way = FindWayConfig::new(url);
        }
        config.find_way = config.find_way.with_timeout(timeout_secs);

        config.search_log = var("SEARCH_LOG_URL").map(SearchLogConfig::new);
        config.session_idle = Duration::from_secs(parse_or(
            "SESSION_IDLE_SECS",
            var("SESSION_IDLE_SECS"),
            DEFAULT_SESSION_IDLE.as_secs(),
        ));
        config.bind_addr = parse_or("BIND_ADDR", var("BIND_ADDR"), DEFAULT_BIND_ADDR);
        config.fixture_dir = var("FIXTURE_DIR").map(PathBuf::from);

        config
    }
}

/// Parse `value`, falling back to `default` with a warning when it is
/// malformed.
fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(key, value = %value, "unparsable setting, using default");
            default
        }
    }
}
