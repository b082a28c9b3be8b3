//! Find-way backend wire types.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body for the multimodal find-way endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindWayRequest {
    pub start_lon: f64,
    pub start_lat: f64,
    pub end_lon: f64,
    pub end_lat: f64,
    pub mode: String,
    pub criteria: String,
    pub max_routes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindWayResponse {
    #[serde(default)]
    pub routes: Vec<FindWayRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindWayRoute {
    /// Backend route id; some deployments send a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,

    #[serde(default)]
    pub segments: Vec<FindWaySegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindWaySegment {
    #[serde(default)]
    pub geometry: SegmentGeometry,

    #[serde(rename = "recommendedMode", default)]
    pub recommended_mode: Option<String>,

    /// Metres.
    #[serde(rename = "LENGTH", default)]
    pub length: f64,

    /// Seconds.
    #[serde(rename = "TRAVELTIME", default)]
    pub travel_time: f64,

    #[serde(rename = "aqiImpact", default)]
    pub aqi_impact: Option<AqiImpact>,

    #[serde(rename = "healthScore", default)]
    pub health_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AqiImpact {
    #[serde(default)]
    pub pm25: Option<f64>,
}

/// Segment geometry: either a GeoJSON LineString or a bare coordinate list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SegmentGeometry {
    LineString { coordinates: Vec<[f64; 2]> },
    Coordinates(Vec<[f64; 2]>),
}

impl Default for SegmentGeometry {
    fn default() -> Self {
        SegmentGeometry::Coordinates(Vec::new())
    }
}

impl SegmentGeometry {
    pub fn into_coordinates(self) -> Vec<[f64; 2]> {
        match self {
            SegmentGeometry::LineString { coordinates } => coordinates,
            SegmentGeometry::Coordinates(coordinates) => coordinates,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
