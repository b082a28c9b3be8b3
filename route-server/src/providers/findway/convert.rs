//! Conversion from find-way wire types to route candidates.

use std::collections::HashSet;

use crate::domain::{AirQualitySample, GeoPoint, RouteCandidate, Segment, TransportMode};

use super::types::{FindWayResponse, FindWayRoute, FindWaySegment};

/// Convert a find-way response into candidates, in backend order.
///
/// Route distance and duration are the sums over segments; route geometry
/// is the segment geometries joined end to end. Ids are unique within the
/// result even when the backend omits or repeats them.
pub fn convert_find_way(
    response: FindWayResponse,
    mode: &TransportMode,
    max_routes: usize,
) -> Vec<RouteCandidate> {
    let mut seen = HashSet::new();
    response
        .routes
        .into_iter()
        .take(max_routes)
        .enumerate()
        .map(|(i, route)| {
            let id = match &route.id {
                Some(id) if seen.insert(format!("multimodal-{id}")) => format!("multimodal-{id}"),
                _ => format!("multimodal-idx-{i}"),
            };
            convert_route(id, route, mode)
        })
        .collect()
}

fn convert_route(id: String, route: FindWayRoute, mode: &TransportMode) -> RouteCandidate {
    let segments: Vec<Segment> = route.segments.into_iter().map(convert_segment).collect();

    let raw_distance_m: f64 = segments.iter().map(|s| s.length_m).sum();
    let raw_duration_s: f64 = segments.iter().map(|s| s.travel_time_s).sum();
    let geometry = join_geometry(&segments);

    RouteCandidate {
        segments,
        ..RouteCandidate::new(id, geometry, raw_distance_m, raw_duration_s, mode.clone())
    }
}

fn convert_segment(segment: FindWaySegment) -> Segment {
    Segment {
        geometry: segment
            .geometry
            .into_coordinates()
            .into_iter()
            .map(GeoPoint::from)
            .collect(),
        length_m: segment.length,
        travel_time_s: segment.travel_time,
        recommended_mode: segment.recommended_mode.as_deref().map(TransportMode::parse),
        pollution: segment
            .aqi_impact
            .and_then(|a| a.pm25)
            .map(|pm25| AirQualitySample {
                pm25,
                ..AirQualitySample::default()
            }),
        health_score: segment.health_score,
    }
}

/// Concatenate segment geometries, dropping the repeated joint points.
fn join_geometry(segments: &[Segment]) -> Vec<GeoPoint> {
    let mut joined: Vec<GeoPoint> = Vec::new();
    for point in segments.iter().flat_map(|s| s.geometry.iter()) {
        if joined.last() != Some(point) {
            joined.push(*point);
        }
    }
    joined
}
