//! Route candidate providers.
//!
//! Two external backends produce route geometries:
//! - the directions provider (Mapbox Directions v5 wire format), used for
//!   the fastest/shortest/least-pollution/emission criteria, which share
//!   one alternatives query
//! - the multimodal find-way backend, used for the healthiest criterion,
//!   which splits a route into segments with a recommended mode and a
//!   health score each
//!
//! Both are reached through traits so the engine can run against fixtures.

mod directions;
mod error;
mod findway;
mod fixture;

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::domain::{Criterion, GeoPoint, RouteCandidate, TransportMode};

pub use directions::{DirectionsClient, DirectionsConfig};
pub use error::FetchError;
pub use findway::{FindWayClient, FindWayConfig};
pub use fixture::FixtureBackend;

/// What to fetch candidates for.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TransportMode,
    pub criterion: Criterion,

    /// Upper bound on returned candidates.
    pub max_routes: usize,
}

/// Source of alternative routes for a single mode.
pub trait DirectionsProvider: Send + Sync {
    /// Fetch route alternatives, at most `query.max_routes` of them.
    fn directions(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, FetchError>> + Send;
}

/// Source of segmented multimodal routes.
pub trait MultimodalProvider: Send + Sync {
    /// Fetch segmented routes, at most `query.max_routes` of them.
    fn find_way(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, FetchError>> + Send;
}

/// Check the status of a provider response and decode its JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(FetchError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::json(e, &body))
}
