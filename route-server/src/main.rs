use std::net::SocketAddr;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use route_server::air::AirQualityClient;
use route_server::config::ServerConfig;
use route_server::engine::{Evaluate, RouteEngine};
use route_server::providers::{DirectionsClient, FindWayClient, FixtureBackend};
use route_server::searchlog::SearchLogClient;
use route_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "route_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env();

    let search_log = config
        .search_log
        .clone()
        .map(SearchLogClient::new)
        .transpose()
        .expect("Failed to create search log client");
    if search_log.is_none() {
        info!("SEARCH_LOG_URL not set, search logging disabled");
    }

    match &config.fixture_dir {
        Some(dir) => {
            let backend = FixtureBackend::load(dir).expect("Failed to load fixtures");
            info!(profiles = ?backend.profiles(), "serving recorded fixtures");

            let engine = RouteEngine::new(
                backend.clone(),
                backend.clone(),
                backend,
                config.engine.clone(),
            );
            serve(engine, search_log, config.session_idle, config.bind_addr).await;
        }
        None => {
            let directions_config = config
                .directions
                .clone()
                .expect("DIRECTIONS_ACCESS_TOKEN not set (set FIXTURE_DIR to run on fixtures)");
            let directions =
                DirectionsClient::new(directions_config).expect("Failed to create directions client");
            let find_way = FindWayClient::new(config.find_way.clone())
                .expect("Failed to create find-way client");
            let stations = AirQualityClient::new(config.air_quality.clone())
                .expect("Failed to create air-quality client");

            let engine = RouteEngine::new(directions, find_way, stations, config.engine.clone());
            serve(engine, search_log, config.session_idle, config.bind_addr).await;
        }
    }
}

async fn serve<E: Evaluate>(
    engine: E,
    search_log: Option<SearchLogClient>,
    session_idle: Duration,
    addr: SocketAddr,
) {
    let app = create_router(AppState::new(engine, search_log, session_idle));

    info!("Route server listening on http://{addr}");
    info!("  GET    /health");
    info!("  POST   /api/routes/plan");
    info!("  POST   /api/sessions");
    info!("  GET    /api/sessions/:id");
    info!("  PUT    /api/sessions/:id/{{endpoints,mode,criterion,selection}}");
    info!("  DELETE /api/sessions/:id");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
