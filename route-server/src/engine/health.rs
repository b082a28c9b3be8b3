//! Health summaries for segmented routes.

use crate::domain::{Segment, TransportMode};

use super::config::HealthAggregation;

/// Advice for one stretch of a multimodal route.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAdvice {
    pub recommended_mode: Option<TransportMode>,
    pub health_score: f64,
    pub pm25: Option<f64>,
    pub length_m: f64,
}

/// Aggregated health information for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSummary {
    /// Route-level score (lower is healthier).
    pub route_score: f64,

    /// Distinct recommended modes in first-appearance order.
    pub modes: Vec<TransportMode>,

    /// Per-segment advice in path order.
    pub segments: Vec<SegmentAdvice>,
}

/// Aggregates segment health scores into a route score.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentHealthAdvisor {
    aggregation: HealthAggregation,
}

impl SegmentHealthAdvisor {
    pub fn new(aggregation: HealthAggregation) -> Self {
        Self { aggregation }
    }

    /// Summarize a route's segments. A segment without a score counts as 0.
    pub fn summarize(&self, segments: &[Segment]) -> HealthSummary {
        let advice: Vec<SegmentAdvice> = segments
            .iter()
            .map(|s| SegmentAdvice {
                recommended_mode: s.recommended_mode.clone(),
                health_score: s.health_score.filter(|h| h.is_finite()).unwrap_or(0.0),
                pm25: s.pollution.as_ref().map(|p| p.pm25),
                length_m: s.length_m,
            })
            .collect();

        let mut modes: Vec<TransportMode> = Vec::new();
        for mode in segments.iter().filter_map(|s| s.recommended_mode.as_ref()) {
            if !modes.contains(mode) {
                modes.push(mode.clone());
            }
        }

        HealthSummary {
            route_score: self.aggregate(advice.iter().map(|a| a.health_score)),
            modes,
            segments: advice,
        }
    }

    fn aggregate(&self, scores: impl ExactSizeIterator<Item = f64>) -> f64 {
        let count = scores.len();
        if count == 0 {
            return 0.0;
        }

        match self.aggregation {
            HealthAggregation::Mean => scores.sum::<f64>() / count as f64,
            HealthAggregation::WorstCase => scores.fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
