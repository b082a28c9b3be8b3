//! Transport modes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Emission factor used for modes missing from the table (g CO2 per km).
pub const DEFAULT_EMISSION_G_PER_KM: f64 = 150.0;

/// A means of travel.
///
/// Parsing never fails: identifiers outside the known set are kept as
/// [`TransportMode::Other`] so that downstream metrics can fall back to
/// defaults instead of rejecting the route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    #[default]
    Driving,
    DrivingTraffic,
    Motorcycle,
    Walking,
    Cycling,
    Transit,
    Other(String),
}

impl TransportMode {
    /// Parse a mode identifier (case-insensitive, `_` and `-` equivalent).
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "driving" | "car" => TransportMode::Driving,
            "driving-traffic" => TransportMode::DrivingTraffic,
            "motorcycle" | "motorbike" => TransportMode::Motorcycle,
            "walking" | "walk" => TransportMode::Walking,
            "cycling" | "bike" | "bicycle" => TransportMode::Cycling,
            "transit" | "bus" => TransportMode::Transit,
            _ => TransportMode::Other(s.trim().to_string()),
        }
    }

    /// Canonical identifier.
    pub fn as_str(&self) -> &str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::DrivingTraffic => "driving-traffic",
            TransportMode::Motorcycle => "motorcycle",
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Transit => "transit",
            TransportMode::Other(s) => s,
        }
    }

    /// Directions profile used to fetch geometry for this mode.
    ///
    /// The directions provider has no motorcycle or transit profile, so
    /// those (and unknown modes) are routed as driving.
    pub fn directions_profile(&self) -> &'static str {
        match self {
            TransportMode::DrivingTraffic => "driving-traffic",
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Driving
            | TransportMode::Motorcycle
            | TransportMode::Transit
            | TransportMode::Other(_) => "driving",
        }
    }

    /// CO2 emission factor in grams per kilometre.
    pub fn emission_factor(&self) -> f64 {
        match self {
            TransportMode::Driving => 170.0,
            TransportMode::DrivingTraffic => 200.0,
            TransportMode::Motorcycle => 100.0,
            TransportMode::Walking | TransportMode::Cycling => 0.0,
            TransportMode::Transit => 90.0,
            TransportMode::Other(_) => DEFAULT_EMISSION_G_PER_KM,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransportMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransportMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TransportMode::parse(&s))
    }
}
