//! Nearest-station air-quality resolution.
//!
//! The station list is small and changes slowly, so it is cached for a
//! short TTL: one evaluation cycle resolving several candidates fetches it
//! at most once, and concurrent resolutions wait on the same load.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::{AirQualitySample, GeoPoint};

use super::error::AirQualityError;
use super::types::Station;

/// Default TTL for the cached station list.
pub const DEFAULT_STATION_TTL: Duration = Duration::from_secs(60);

/// Source of monitoring stations.
pub trait StationSource: Send + Sync {
    /// List every station with its latest reading.
    fn stations(&self) -> impl Future<Output = Result<Vec<Station>, AirQualityError>> + Send;
}

/// Resolves the pollution reading at a point.
///
/// Fails open: any failure to obtain stations yields
/// [`AirQualitySample::unavailable`] so routing never fails because of
/// missing telemetry.
pub struct AirQualityResolver<S> {
    source: S,
    stations: MokaCache<(), Arc<Vec<Station>>>,
}

impl<S: StationSource> AirQualityResolver<S> {
    /// Create a resolver caching the station list for `ttl`.
    pub fn new(source: S, ttl: Duration) -> Self {
        let stations = MokaCache::builder().time_to_live(ttl).build();

        Self { source, stations }
    }

    /// The station list, from cache or freshly fetched.
    pub async fn stations(&self) -> Result<Arc<Vec<Station>>, Arc<AirQualityError>> {
        self.stations
            .try_get_with((), async {
                let stations = self.source.stations().await?;
                debug!(count = stations.len(), "loaded monitoring stations");
                Ok::<_, AirQualityError>(Arc::new(stations))
            })
            .await
    }

    /// Reading of the station nearest to `point`.
    pub async fn resolve(&self, point: GeoPoint) -> AirQualitySample {
        let stations = match self.stations().await {
            Ok(stations) => stations,
            Err(e) => {
                warn!(error = %e, "air quality unavailable, using neutral sample");
                return AirQualitySample::unavailable();
            }
        };

        match nearest_station(&stations, point) {
            Some(station) => AirQualitySample {
                station_id: Some(station.id.clone()),
                pm25: station.pm25,
                coordinates: Some(station.position),
            },
            None => {
                debug!("no monitoring stations, using neutral sample");
                AirQualitySample::unavailable()
            }
        }
    }

    /// Drop the cached station list.
    pub fn invalidate(&self) {
        self.stations.invalidate_all();
    }
}

/// Station minimizing the planar (lon, lat) distance to `point`.
///
/// On ties the first station in list order wins.
pub fn nearest_station(stations: &[Station], point: GeoPoint) -> Option<&Station> {
    stations.iter().min_by(|a, b| {
        a.position
            .planar_distance(&point)
            .total_cmp(&b.position.planar_distance(&point))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn station(id: &str, lon: f64, lat: f64, pm25: f64) -> Station {
        Station {
            id: id.to_string(),
            position: GeoPoint::new(lon, lat),
            pm25,
        }
    }

    /// Station source returning a fixed list (or failing) and counting calls.
    struct FixedSource {
        stations: Option<Vec<Station>>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(stations: Vec<Station>) -> Self {
            Self {
                stations: Some(stations),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                stations: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl StationSource for FixedSource {
        async fn stations(&self) -> Result<Vec<Station>, AirQualityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.stations.clone().ok_or(AirQualityError::Api {
                status: 503,
                message: "unavailable".into(),
            })
        }
    }

    #[test]
    fn nearest_is_planar_minimum() {
        let stations = vec![station("a", 0.0, 0.0, 10.0), station("b", 1.0, 1.0, 50.0)];

        let near = nearest_station(&stations, GeoPoint::new(0.1, 0.1)).unwrap();
        assert_eq!(near.id, "a");

        let near = nearest_station(&stations, GeoPoint::new(0.9, 0.8)).unwrap();
        assert_eq!(near.id, "b");

        assert!(nearest_station(&[], GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_tie_keeps_first() {
        let stations = vec![station("a", 0.0, 1.0, 1.0), station("b", 0.0, -1.0, 2.0)];
        let near = nearest_station(&stations, GeoPoint::new(0.0, 0.0)).unwrap();
        assert_eq!(near.id, "a");
    }

    #[tokio::test]
    async fn resolves_nearest_reading() {
        let source = FixedSource::new(vec![
            station("a", 0.0, 0.0, 10.0),
            station("b", 1.0, 1.0, 50.0),
        ]);
        let resolver = AirQualityResolver::new(source, DEFAULT_STATION_TTL);

        let sample = resolver.resolve(GeoPoint::new(0.1, 0.1)).await;
        assert_eq!(sample.pm25, 10.0);
        assert_eq!(sample.station_id.as_deref(), Some("a"));
        assert_eq!(sample.coordinates, Some(GeoPoint::new(0.0, 0.0)));
    }

    #[tokio::test]
    async fn no_stations_gives_zero() {
        let resolver = AirQualityResolver::new(FixedSource::new(vec![]), DEFAULT_STATION_TTL);
        let sample = resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        assert_eq!(sample, AirQualitySample::unavailable());
    }

    #[tokio::test]
    async fn failure_fails_open() {
        let resolver = AirQualityResolver::new(FixedSource::failing(), DEFAULT_STATION_TTL);
        let sample = resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        assert_eq!(sample.pm25, 0.0);
        assert!(sample.station_id.is_none());
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let resolver = AirQualityResolver::new(FixedSource::failing(), DEFAULT_STATION_TTL);
        resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        assert_eq!(resolver.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn station_list_is_cached() {
        let source = FixedSource::new(vec![station("a", 0.0, 0.0, 10.0)]);
        let resolver = AirQualityResolver::new(source, DEFAULT_STATION_TTL);

        for _ in 0..3 {
            resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        }
        assert_eq!(resolver.source.calls.load(Ordering::SeqCst), 1);

        resolver.invalidate();
        resolver.resolve(GeoPoint::new(0.0, 0.0)).await;
        assert_eq!(resolver.source.calls.load(Ordering::SeqCst), 2);
    }
}
