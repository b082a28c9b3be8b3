//! Route evaluation.
//!
//! An evaluation cycle fetches candidates for a query, samples air quality
//! per candidate, summarizes segment health for multimodal routes and
//! derives comparable metrics. Ranking is a separate pure step so the same
//! evaluated set can be re-ordered when only the criterion changes.

mod config;
mod evaluate;
mod fetch;
mod health;
mod metrics;
mod rank;

pub use config::{EngineConfig, HealthAggregation, MetricsConfig};
pub use evaluate::{Evaluate, RouteEngine};
pub use fetch::RouteCandidateFetcher;
pub use health::{HealthSummary, SegmentAdvice, SegmentHealthAdvisor};
pub use metrics::MetricsComputer;
pub use rank::rank_routes;
