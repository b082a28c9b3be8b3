//! Ranking criteria.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::route::Metrics;

/// Which backend query a criterion needs.
///
/// Criteria sharing a shape can be re-ranked over the same candidate set;
/// moving between shapes requires a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Directions provider with alternatives.
    Directions,
    /// Multimodal find-way backend.
    Multimodal,
}

/// The optimization objective selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    #[default]
    Fastest,
    Shortest,
    LeastPollution,
    Emission,
    Healthiest,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Fastest,
        Criterion::Shortest,
        Criterion::LeastPollution,
        Criterion::Emission,
        Criterion::Healthiest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Fastest => "fastest",
            Criterion::Shortest => "shortest",
            Criterion::LeastPollution => "least_pollution",
            Criterion::Emission => "emission",
            Criterion::Healthiest => "healthiest",
        }
    }

    /// Sort key for this criterion; candidates are ranked ascending.
    ///
    /// A healthiest-ranked route without a health score sorts last.
    pub fn sort_key(self) -> fn(&Metrics) -> f64 {
        match self {
            Criterion::Fastest => |m: &Metrics| m.duration_min,
            Criterion::Shortest => |m: &Metrics| m.distance_km,
            Criterion::LeastPollution => |m: &Metrics| m.pollution_exposure,
            Criterion::Emission => |m: &Metrics| m.emission_grams,
            Criterion::Healthiest => |m: &Metrics| m.health_score.unwrap_or(f64::INFINITY),
        }
    }

    pub fn query_shape(self) -> QueryShape {
        match self {
            Criterion::Healthiest => QueryShape::Multimodal,
            _ => QueryShape::Directions,
        }
    }
}

impl FromStr for Criterion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Criterion::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownCriterion(s.to_string()))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
