//! Domain types for route evaluation.
//!
//! Plain data shared by every layer: points, modes, criteria, candidates
//! and their metrics. Validation happens at construction time so that code
//! receiving these types can trust them.

mod criterion;
mod error;
mod geo;
mod mode;
mod route;

pub use criterion::{Criterion, QueryShape};
pub use error::DomainError;
pub use geo::GeoPoint;
pub use mode::{DEFAULT_EMISSION_G_PER_KM, TransportMode};
pub use route::{AirQualitySample, EvaluatedRoute, Metrics, RouteCandidate, Segment};
