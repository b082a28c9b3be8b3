//! Route candidates, segments and their derived metrics.

use std::sync::Arc;

use serde::Serialize;

use super::geo::GeoPoint;
use super::mode::TransportMode;

/// A pollution reading attributed to a query point.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualitySample {
    /// Station the reading came from, if any station was found.
    pub station_id: Option<String>,

    /// PM2.5 concentration (µg/m³). Zero when unknown.
    pub pm25: f64,

    /// Station position.
    pub coordinates: Option<GeoPoint>,
}

impl AirQualitySample {
    /// The neutral sample used when no telemetry is available.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// A sub-path of a multimodal route.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub geometry: Vec<GeoPoint>,
    pub length_m: f64,
    pub travel_time_s: f64,

    /// Mode recommended by the multimodal backend for this stretch.
    pub recommended_mode: Option<TransportMode>,

    /// Air quality along the segment, as reported by the backend.
    pub pollution: Option<AirQualitySample>,

    /// Backend health score (lower is healthier).
    pub health_score: Option<f64>,
}

/// One complete route returned by a provider.
///
/// Built once by the fetcher and then shared immutably.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    /// Unique within one candidate set.
    pub id: String,
    pub geometry: Vec<GeoPoint>,
    pub raw_distance_m: f64,
    pub raw_duration_s: f64,
    pub mode: TransportMode,

    /// Path-ordered segments; empty unless the route came from the
    /// multimodal backend.
    pub segments: Vec<Segment>,

    /// Per-edge congestion labels from the directions provider.
    pub congestion: Vec<String>,
}

impl RouteCandidate {
    /// A single-stretch candidate without segments.
    pub fn new(
        id: impl Into<String>,
        geometry: Vec<GeoPoint>,
        raw_distance_m: f64,
        raw_duration_s: f64,
        mode: TransportMode,
    ) -> Self {
        Self {
            id: id.into(),
            geometry,
            raw_distance_m,
            raw_duration_s,
            mode,
            segments: Vec::new(),
            congestion: Vec::new(),
        }
    }

    /// Point at which route-level air quality is sampled.
    pub fn sample_point(&self) -> Option<GeoPoint> {
        GeoPoint::centroid(&self.geometry)
    }

    /// The pollution sample carried by a single-segment route.
    pub fn single_segment_pollution(&self) -> Option<&AirQualitySample> {
        match self.segments.as_slice() {
            [only] => only.pollution.as_ref(),
            _ => None,
        }
    }
}

/// Comparable scalar figures for one route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub distance_km: f64,
    pub duration_min: f64,
    pub emission_grams: f64,
    pub pollution_exposure: f64,
    pub health_score: Option<f64>,
}

/// A candidate together with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedRoute {
    pub candidate: Arc<RouteCandidate>,
    pub metrics: Metrics,
    pub air_quality: AirQualitySample,

    /// Distinct recommended modes in path order (multimodal only).
    pub recommended_modes: Vec<TransportMode>,
}

impl EvaluatedRoute {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(pm25: Option<f64>) -> Segment {
        Segment {
            geometry: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)],
            length_m: 100.0,
            travel_time_s: 60.0,
            recommended_mode: Some(TransportMode::Walking),
            pollution: pm25.map(|pm25| AirQualitySample {
                pm25,
                ..AirQualitySample::default()
            }),
            health_score: None,
        }
    }

    #[test]
    fn sample_point_is_geometry_mean() {
        let route = RouteCandidate::new(
            "r",
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(2.0, 2.0)],
            10.0,
            10.0,
            TransportMode::Driving,
        );
        assert_eq!(route.sample_point(), Some(GeoPoint::new(1.0, 1.0)));

        let empty = RouteCandidate::new("e", vec![], 0.0, 0.0, TransportMode::Driving);
        assert_eq!(empty.sample_point(), None);
    }

    #[test]
    fn single_segment_pollution_only_for_one_segment() {
        let mut route = RouteCandidate::new("r", vec![], 0.0, 0.0, TransportMode::Walking);
        assert!(route.single_segment_pollution().is_none());

        route.segments = vec![segment(Some(12.0))];
        assert_eq!(route.single_segment_pollution().map(|s| s.pm25), Some(12.0));

        route.segments = vec![segment(Some(12.0)), segment(Some(30.0))];
        assert!(route.single_segment_pollution().is_none());
    }

    #[test]
    fn metrics_serialize_camel_case() {
        let m = Metrics {
            distance_km: 1.0,
            duration_min: 2.0,
            emission_grams: 3.0,
            pollution_exposure: 4.0,
            health_score: None,
        };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["distanceKm"], 1.0);
        assert_eq!(json["pollutionExposure"], 4.0);
        assert!(json["healthScore"].is_null());
    }
}
