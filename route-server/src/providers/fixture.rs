//! Fixture backend for running without provider credentials.
//!
//! Loads recorded responses from a directory and serves them as if they
//! were live API responses:
//!
//! ```text
//! <dir>/directions/<profile>.json   directions responses, e.g. driving.json
//! <dir>/findway.json                multimodal find-way response
//! <dir>/stations.json               air-quality station list
//! ```
//!
//! Every file is optional. Query coordinates are ignored; fixture data is
//! static.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::air::{AirQualityError, Station, StationDto, StationSource, convert_stations};
use crate::domain::RouteCandidate;

use super::directions::{DirectionsResponse, convert_directions};
use super::error::FetchError;
use super::findway::{FindWayResponse, convert_find_way};
use super::{DirectionsProvider, MultimodalProvider, RouteQuery};

/// Serves recorded directions, find-way and station responses.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    /// Directions responses keyed by profile name.
    directions: HashMap<String, DirectionsResponse>,
    find_way: Option<FindWayResponse>,
    stations: Vec<Station>,
}

impl FixtureBackend {
    /// Load fixtures from a directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(FetchError::NotConfigured(format!(
                "fixture directory {} does not exist",
                dir.display()
            )));
        }

        let mut directions = HashMap::new();
        let directions_dir = dir.join("directions");
        if directions_dir.is_dir() {
            let entries = std::fs::read_dir(&directions_dir).map_err(|e| {
                FetchError::NotConfigured(format!("failed to read {}: {e}", directions_dir.display()))
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|e| FetchError::NotConfigured(format!("bad directory entry: {e}")))?
                    .path();
                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }
                let Some(profile) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                directions.insert(profile.to_string(), read_fixture(&path)?);
            }
        }

        let find_way_path = dir.join("findway.json");
        let find_way = if find_way_path.is_file() {
            Some(read_fixture(&find_way_path)?)
        } else {
            None
        };

        let stations_path = dir.join("stations.json");
        let stations = if stations_path.is_file() {
            convert_stations(read_fixture::<Vec<StationDto>>(&stations_path)?)
        } else {
            Vec::new()
        };

        info!(
            profiles = directions.len(),
            find_way = find_way.is_some(),
            stations = stations.len(),
            "loaded fixtures from {}",
            dir.display()
        );

        Ok(Self {
            directions,
            find_way,
            stations,
        })
    }

    /// Profiles with recorded directions.
    pub fn profiles(&self) -> Vec<&str> {
        let mut profiles: Vec<&str> = self.directions.keys().map(String::as_str).collect();
        profiles.sort_unstable();
        profiles
    }
}

fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| FetchError::NotConfigured(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| FetchError::json(e, &json))
}

impl DirectionsProvider for FixtureBackend {
    async fn directions(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
        let profile = query.mode.directions_profile();
        let response = self
            .directions
            .get(profile)
            .cloned()
            .ok_or_else(|| FetchError::Api {
                status: 404,
                message: format!("no fixture for profile {profile}"),
            })?;

        Ok(convert_directions(response, &query.mode, query.max_routes))
    }
}

impl MultimodalProvider for FixtureBackend {
    async fn find_way(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
        let response = self
            .find_way
            .clone()
            .ok_or_else(|| FetchError::NotConfigured("no find-way fixture".to_string()))?;

        Ok(convert_find_way(response, &query.mode, query.max_routes))
    }
}

impl StationSource for FixtureBackend {
    async fn stations(&self) -> Result<Vec<Station>, AirQualityError> {
        Ok(self.stations.clone())
    }
}
