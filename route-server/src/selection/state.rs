//! Pure selection state transitions.
//!
//! `SelectionState` is owned by a single session task and only changes
//! through the methods below. Each input change returns an [`Effect`]
//! telling the owner whether to start (or abandon) a fetch; fetch results
//! come back through [`SelectionState::apply`] tagged with the generation
//! they were started for.

use std::sync::Arc;

use crate::domain::{Criterion, EvaluatedRoute, GeoPoint, TransportMode};
use crate::engine::rank_routes;
use crate::providers::FetchError;

use super::error::SelectionError;

/// Message shown when a fetch succeeds with no candidates.
pub const NO_ROUTE_MESSAGE: &str = "no route found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No candidates.
    Idle,
    /// Candidates present and one of them selected.
    Ready,
}

/// Inputs of a fetch, tagged with the generation that requested it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TransportMode,
    pub criterion: Criterion,
}

/// What the owner has to do after an input change.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing to fetch.
    None,
    /// Start a fetch, replacing any in flight.
    Fetch(FetchRequest),
    /// Abandon the in-flight fetch, if any.
    Cancel,
}

/// How a fetch result was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Superseded by a newer request and dropped.
    Stale,
    /// Candidates replaced.
    Updated,
    /// Empty result; any previous candidates are kept.
    NoRoute,
    /// Fetch failed; any previous candidates are kept.
    Failed,
}

/// Immutable view of a session published to readers.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub status: Status,
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub mode: TransportMode,
    pub criterion: Criterion,
    /// Ranked best-first.
    pub candidates: Arc<Vec<EvaluatedRoute>>,
    pub selected_id: Option<String>,
    pub error: Option<String>,
    pub generation: u64,
    pub pending: bool,
}

impl Snapshot {
    pub fn selected(&self) -> Option<&EvaluatedRoute> {
        let id = self.selected_id.as_deref()?;
        self.candidates.iter().find(|r| r.id() == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    mode: TransportMode,
    criterion: Criterion,

    /// Last successful result in fetch order, kept for re-ranking.
    fetched: Vec<EvaluatedRoute>,
    candidates: Arc<Vec<EvaluatedRoute>>,
    selected_id: Option<String>,
    error: Option<String>,
    generation: u64,
    pending: bool,
}

impl SelectionState {
    pub fn new(mode: TransportMode, criterion: Criterion) -> Self {
        Self {
            mode,
            criterion,
            ..Self::default()
        }
    }

    pub fn status(&self) -> Status {
        if self.candidates.is_empty() {
            Status::Idle
        } else {
            Status::Ready
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            origin: self.origin,
            destination: self.destination,
            mode: self.mode.clone(),
            criterion: self.criterion,
            candidates: Arc::clone(&self.candidates),
            selected_id: self.selected_id.clone(),
            error: self.error.clone(),
            generation: self.generation,
            pending: self.pending,
        }
    }

    /// Set or clear the endpoints.
    ///
    /// Clearing either endpoint drops the candidates and abandons any
    /// fetch. Setting both drops the previous pair's candidates and starts
    /// a new one.
    pub fn set_endpoints(
        &mut self,
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> Effect {
        if origin == self.origin && destination == self.destination {
            return Effect::None;
        }
        self.origin = origin;
        self.destination = destination;

        if origin.is_none() || destination.is_none() {
            self.generation += 1;
            self.clear();
            self.error = None;
            self.pending = false;
            return Effect::Cancel;
        }

        // Routes for another pair never stand in for this one
        self.clear();
        self.start_fetch()
    }

    /// Change the transport mode. The current candidates stay visible
    /// until the new fetch completes.
    pub fn set_mode(&mut self, mode: TransportMode) -> Effect {
        if mode == self.mode {
            return Effect::None;
        }
        self.mode = mode;
        self.start_fetch()
    }

    /// Change the criterion.
    ///
    /// Within one query shape the existing set is re-ranked and the
    /// selection moves to the new top. Crossing shapes clears the set and
    /// fetches again.
    pub fn set_criterion(&mut self, criterion: Criterion) -> Effect {
        if criterion == self.criterion {
            return Effect::None;
        }
        let same_shape = criterion.query_shape() == self.criterion.query_shape();
        self.criterion = criterion;

        if !same_shape {
            self.clear();
            return self.start_fetch();
        }

        if !self.fetched.is_empty() {
            self.rerank();
            Effect::None
        } else if self.pending {
            // The in-flight result is ranked with the criterion current at apply time
            Effect::None
        } else {
            self.start_fetch()
        }
    }

    /// Select a candidate by id. Only `selected_id` changes.
    pub fn select(&mut self, id: &str) -> Result<(), SelectionError> {
        if !self.candidates.iter().any(|r| r.id() == id) {
            return Err(SelectionError::UnknownRoute(id.to_string()));
        }
        self.selected_id = Some(id.to_string());
        Ok(())
    }

    /// Apply the outcome of the fetch started for `generation`.
    ///
    /// Anything but the single outstanding fetch is stale.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<Vec<EvaluatedRoute>, FetchError>,
    ) -> Applied {
        if generation != self.generation || !self.pending {
            return Applied::Stale;
        }
        self.pending = false;

        match result {
            Ok(routes) if routes.is_empty() => {
                self.error = Some(NO_ROUTE_MESSAGE.to_string());
                Applied::NoRoute
            }
            Ok(routes) => {
                self.fetched = routes;
                self.error = None;
                self.rerank();
                Applied::Updated
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    fn start_fetch(&mut self) -> Effect {
        let (Some(origin), Some(destination)) = (self.origin, self.destination) else {
            return Effect::None;
        };

        self.generation += 1;
        self.pending = true;
        Effect::Fetch(FetchRequest {
            generation: self.generation,
            origin,
            destination,
            mode: self.mode.clone(),
            criterion: self.criterion,
        })
    }

    fn rerank(&mut self) {
        let ranked = rank_routes(&self.fetched, self.criterion);
        self.selected_id = ranked.first().map(|r| r.id().to_string());
        self.candidates = Arc::new(ranked);
    }

    fn clear(&mut self) {
        self.fetched.clear();
        self.candidates = Arc::new(Vec::new());
        self.selected_id = None;
    }
}
