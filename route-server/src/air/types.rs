//! Monitoring station types.

use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;

/// Station record as returned by the air-quality service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub station_name: Option<String>,

    #[serde(default)]
    pub location: Option<StationLocation>,

    #[serde(default)]
    pub pm25: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationLocation {
    /// `[lon, lat]`
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
}

/// A monitoring station with a usable position.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub position: GeoPoint,

    /// PM2.5 reading; zero when the service reported none.
    pub pm25: f64,
}

/// Convert station DTOs, dropping records without coordinates.
///
/// Stations without an id or name are identified by their list index.
pub fn convert_stations(dtos: Vec<StationDto>) -> Vec<Station> {
    dtos.into_iter()
        .enumerate()
        .filter_map(|(i, dto)| {
            let coordinates = dto.location.and_then(|l| l.coordinates)?;
            Some(Station {
                id: dto
                    .id
                    .or(dto.station_name)
                    .unwrap_or_else(|| format!("station-{i}")),
                position: GeoPoint::from(coordinates),
                pm25: dto.pm25.unwrap_or(0.0),
            })
        })
        .collect()
}
