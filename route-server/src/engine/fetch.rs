//! Candidate fetching.

use std::time::Duration;

use tracing::debug;

use crate::domain::{QueryShape, RouteCandidate};
use crate::providers::{DirectionsProvider, FetchError, MultimodalProvider, RouteQuery};

/// Dispatches a query to the backend its criterion needs.
pub struct RouteCandidateFetcher<D, M> {
    directions: D,
    multimodal: M,
    timeout: Duration,
}

impl<D: DirectionsProvider, M: MultimodalProvider> RouteCandidateFetcher<D, M> {
    pub fn new(directions: D, multimodal: M, timeout: Duration) -> Self {
        Self {
            directions,
            multimodal,
            timeout,
        }
    }

    /// Fetch at most `query.max_routes` candidates.
    ///
    /// An empty list is a valid outcome. The whole call is bounded by the
    /// configured timeout on top of any client-level timeout.
    pub async fn fetch(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
        let shape = query.criterion.query_shape();
        debug!(?shape, mode = %query.mode, criterion = %query.criterion, "fetching candidates");

        let request = async {
            match shape {
                QueryShape::Directions => self.directions.directions(query).await,
                QueryShape::Multimodal => self.multimodal.find_way(query).await,
            }
        };

        let mut candidates = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout)??;

        candidates.truncate(query.max_routes);
        debug!(count = candidates.len(), "fetched candidates");
        Ok(candidates)
    }
}
