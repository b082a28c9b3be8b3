//! Geographic point type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A WGS84 position.
///
/// Stored and serialized in `[lon, lat]` order, matching GeoJSON and every
/// backend this crate talks to.
///
/// # Examples
///
/// ```
/// use route_server::domain::GeoPoint;
///
/// let p = GeoPoint::new(105.85, 21.03);
/// assert_eq!(serde_json::to_string(&p).unwrap(), "[105.85,21.03]");
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build a point, rejecting coordinates outside the WGS84 range.
    pub fn parse(lon: f64, lat: f64) -> Result<Self, DomainError> {
        let point = Self::new(lon, lat);
        point.validate()?;
        Ok(point)
    }

    /// Check the point is finite and inside the WGS84 range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {} out of range",
                self.lon
            )));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {} out of range",
                self.lat
            )));
        }
        Ok(())
    }

    /// Euclidean distance in raw degree space.
    ///
    /// This is a planar approximation, good enough to compare stations
    /// within a single metro area. It is not a geodesic distance.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }

    /// Arithmetic mean of a sequence of points.
    ///
    /// Returns `None` for an empty sequence.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<GeoPoint> {
        let (count, lon, lat) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lon, lat), p| {
                (n + 1, lon + p.lon, lat + p.lat)
            });

        if count == 0 {
            return None;
        }

        Some(GeoPoint::new(lon / count as f64, lat / count as f64))
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon, p.lat]
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.lon, self.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lon_lat_order() {
        let p = GeoPoint::new(1.5, -2.25);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.25]");

        let back: GeoPoint = serde_json::from_str("[1.5,-2.25]").unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert!(GeoPoint::parse(181.0, 0.0).is_err());
        assert!(GeoPoint::parse(0.0, -90.5).is_err());
        assert!(GeoPoint::parse(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::parse(105.8, 21.0).is_ok());
    }

    #[test]
    fn planar_distance_is_euclidean() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert_eq!(a.planar_distance(&b), 5.0);
    }

    #[test]
    fn centroid_of_points() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(2.0, 0.0),
            GeoPoint::new(2.0, 4.0),
            GeoPoint::new(0.0, 4.0),
        ];
        assert_eq!(GeoPoint::centroid(&points), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(GeoPoint::centroid(std::iter::empty()), None);
    }

    #[test]
    fn display_is_directions_waypoint() {
        assert_eq!(GeoPoint::new(105.8, 21.0).to_string(), "105.8,21");
    }
}
