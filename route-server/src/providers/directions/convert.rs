//! Conversion from directions wire types to route candidates.

use crate::domain::{GeoPoint, RouteCandidate, TransportMode};

use super::types::{DirectionsResponse, DirectionsRoute};

/// Convert a directions response into candidates, in provider order.
///
/// Candidate ids are `{mode}-{index}` so they stay unique within the set.
pub fn convert_directions(
    response: DirectionsResponse,
    mode: &TransportMode,
    max_routes: usize,
) -> Vec<RouteCandidate> {
    response
        .routes
        .into_iter()
        .take(max_routes)
        .enumerate()
        .map(|(i, route)| convert_route(i, route, mode))
        .collect()
}

fn convert_route(index: usize, route: DirectionsRoute, mode: &TransportMode) -> RouteCandidate {
    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(GeoPoint::from)
        .collect();

    let congestion = route
        .legs
        .into_iter()
        .filter_map(|leg| leg.annotation)
        .flat_map(|a| a.congestion)
        .collect();

    RouteCandidate {
        congestion,
        ..RouteCandidate::new(
            format!("{}-{index}", mode.as_str()),
            geometry,
            route.distance,
            route.duration,
            mode.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(n: usize) -> DirectionsResponse {
        let routes: Vec<_> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "geometry": {"coordinates": [[0.0, 0.0], [1.0, i as f64]]},
                    "distance": 1000.0 * (i + 1) as f64,
                    "duration": 60.0 * (i + 1) as f64,
                    "legs": [
                        {"annotation": {"congestion": ["low"]}},
                        {"annotation": {"congestion": ["moderate"]}}
                    ]
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({"code": "Ok", "routes": routes})).unwrap()
    }

    #[test]
    fn converts_in_order_with_ids() {
        let candidates = convert_directions(response(3), &TransportMode::Motorcycle, 3);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].id, "motorcycle-0");
        assert_eq!(candidates[2].id, "motorcycle-2");
        assert_eq!(candidates[1].raw_distance_m, 2000.0);
        assert_eq!(candidates[1].raw_duration_s, 120.0);
        assert_eq!(candidates[1].geometry[1], GeoPoint::new(1.0, 1.0));
        assert_eq!(candidates[0].mode, TransportMode::Motorcycle);
        assert!(candidates[0].segments.is_empty());
    }

    #[test]
    fn joins_leg_congestion() {
        let candidates = convert_directions(response(1), &TransportMode::Driving, 3);
        assert_eq!(candidates[0].congestion, vec!["low", "moderate"]);
    }

    #[test]
    fn truncates_to_max_routes() {
        let candidates = convert_directions(response(3), &TransportMode::Driving, 1);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "driving-0");
    }

    #[test]
    fn empty_response_gives_no_candidates() {
        let candidates = convert_directions(response(0), &TransportMode::Driving, 3);
        assert!(candidates.is_empty());
    }
}
