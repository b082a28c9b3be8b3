//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AirQualitySample, Criterion, EvaluatedRoute, GeoPoint, Metrics, TransportMode,
};
use crate::selection::{NO_ROUTE_MESSAGE, Snapshot, Status};

/// Request to evaluate and rank routes once.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRouteRequest {
    /// `[lon, lat]`
    pub origin: GeoPoint,

    /// `[lon, lat]`
    pub destination: GeoPoint,

    /// Transport mode (defaults to driving)
    #[serde(default)]
    pub mode: TransportMode,

    /// Criterion id such as `fastest` (defaults to fastest)
    pub criterion: Option<String>,
}

/// Request to set or clear a session's endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsRequest {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,

    /// User to attribute the search to in the search log
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: TransportMode,
}

#[derive(Debug, Deserialize)]
pub struct CriterionRequest {
    pub criterion: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

/// One ranked route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub id: String,
    pub mode: TransportMode,
    pub metrics: Metrics,
    pub geometry_for_display: Vec<GeoPoint>,

    /// Distinct modes along a multimodal route, in path order
    pub recommended_modes: Vec<TransportMode>,

    /// Per-edge congestion labels, when the provider reports them
    pub congestion: Vec<String>,

    pub air_quality: AirQualitySample,
}

impl From<&EvaluatedRoute> for RouteResult {
    fn from(route: &EvaluatedRoute) -> Self {
        Self {
            id: route.id().to_string(),
            mode: route.candidate.mode.clone(),
            metrics: route.metrics,
            geometry_for_display: route.candidate.geometry.clone(),
            recommended_modes: route.recommended_modes.clone(),
            congestion: route.candidate.congestion.clone(),
            air_quality: route.air_quality.clone(),
        }
    }
}

/// Ranked candidates with the current selection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    /// `idle` or `ready`
    pub status: &'static str,

    /// Best first
    pub candidates: Vec<RouteResult>,

    pub selected_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub criterion: Criterion,
    pub mode: TransportMode,
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub generation: u64,

    /// Whether a fetch is in progress
    pub pending: bool,
}

impl SelectionResponse {
    /// Response for a one-off plan: the top route is selected.
    pub fn planned(
        routes: &[EvaluatedRoute],
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TransportMode,
        criterion: Criterion,
    ) -> Self {
        let (status, error) = if routes.is_empty() {
            ("idle", Some(NO_ROUTE_MESSAGE.to_string()))
        } else {
            ("ready", None)
        };

        Self {
            status,
            candidates: routes.iter().map(RouteResult::from).collect(),
            selected_id: routes.first().map(|r| r.id().to_string()),
            error,
            criterion,
            mode,
            origin: Some(origin),
            destination: Some(destination),
            generation: 0,
            pending: false,
        }
    }
}

impl From<&Snapshot> for SelectionResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            status: match snapshot.status {
                Status::Idle => "idle",
                Status::Ready => "ready",
            },
            candidates: snapshot.candidates.iter().map(RouteResult::from).collect(),
            selected_id: snapshot.selected_id.clone(),
            error: snapshot.error.clone(),
            criterion: snapshot.criterion,
            mode: snapshot.mode.clone(),
            origin: snapshot.origin,
            destination: snapshot.destination,
            generation: snapshot.generation,
            pending: snapshot.pending,
        }
    }
}

/// A session and its current state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: u64,

    #[serde(flatten)]
    pub selection: SelectionResponse,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteCandidate;
    use std::sync::Arc;

    fn route() -> EvaluatedRoute {
        let mut candidate = RouteCandidate::new(
            "driving-0",
            vec![GeoPoint::new(105.8, 21.0), GeoPoint::new(105.9, 21.1)],
            4200.0,
            600.0,
            TransportMode::Driving,
        );
        candidate.congestion = vec!["low".into(), "heavy".into()];

        EvaluatedRoute {
            candidate: Arc::new(candidate),
            metrics: Metrics {
                distance_km: 4.2,
                duration_min: 10.0,
                emission_grams: 714.0,
                pollution_exposure: 12.0,
                health_score: None,
            },
            air_quality: AirQualitySample {
                station_id: Some("s1".into()),
                pm25: 20.0,
                coordinates: Some(GeoPoint::new(105.85, 21.05)),
            },
            recommended_modes: vec![],
        }
    }

    #[test]
    fn plan_request_defaults() {
        let req: PlanRouteRequest =
            serde_json::from_str(r#"{"origin": [105.8, 21.0], "destination": [105.9, 21.1]}"#)
                .unwrap();
        assert_eq!(req.mode, TransportMode::Driving);
        assert!(req.criterion.is_none());
        assert_eq!(req.origin, GeoPoint::new(105.8, 21.0));
    }

    #[test]
    fn endpoints_request_allows_clearing() {
        let req: EndpointsRequest =
            serde_json::from_str(r#"{"origin": null, "destination": [1, 2], "userId": "u"}"#)
                .unwrap();
        assert!(req.origin.is_none());
        assert_eq!(req.destination, Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(req.user_id.as_deref(), Some("u"));
    }

    #[test]
    fn route_result_shape() {
        let json = serde_json::to_value(RouteResult::from(&route())).unwrap();

        assert_eq!(json["id"], "driving-0");
        assert_eq!(json["mode"], "driving");
        assert_eq!(json["metrics"]["durationMin"], 10.0);
        assert_eq!(json["geometryForDisplay"][1][0], 105.9);
        assert_eq!(json["congestion"][1], "heavy");
        assert_eq!(json["airQuality"]["stationId"], "s1");
        assert!(json["recommendedModes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn planned_response_selects_top() {
        let routes = vec![route()];
        let response = SelectionResponse::planned(
            &routes,
            GeoPoint::new(105.8, 21.0),
            GeoPoint::new(105.9, 21.1),
            TransportMode::Driving,
            Criterion::Fastest,
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["selectedId"], "driving-0");
        assert_eq!(json["criterion"], "fastest");
        assert_eq!(json["pending"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn empty_plan_reports_no_route() {
        let response = SelectionResponse::planned(
            &[],
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Walking,
            Criterion::Healthiest,
        );
        assert_eq!(response.status, "idle");
        assert!(response.selected_id.is_none());
        assert_eq!(response.error.as_deref(), Some(NO_ROUTE_MESSAGE));
    }
}
