//! Directions API wire types.
//!
//! Only the fields the engine consumes are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

/// Top-level directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// Status code, `"Ok"` on success (`"NoRoute"`, `"NoSegment"`, ...).
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable message accompanying a non-Ok code.
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: LineString,

    /// Metres.
    #[serde(default)]
    pub distance: f64,

    /// Seconds.
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// GeoJSON LineString (`geometries=geojson`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineString {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

/// Per-edge annotations requested via `annotations=congestion`.
#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub congestion: Vec<String>,
}
