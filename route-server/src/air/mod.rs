//! Air-quality telemetry.
//!
//! Fetches monitoring stations from the air-quality service and resolves
//! the reading nearest to a point. Station data is consumed as-is; it is
//! neither calibrated nor validated here.

mod client;
mod error;
mod resolver;
mod types;

pub use client::{AirQualityClient, AirQualityConfig};
pub use error::AirQualityError;
pub use resolver::{AirQualityResolver, DEFAULT_STATION_TTL, StationSource, nearest_station};
pub use types::{Station, StationDto, StationLocation, convert_stations};
