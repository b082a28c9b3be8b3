//! One evaluation cycle: fetch, resolve air quality, derive metrics.

use std::future::Future;

use futures::future::join_all;
use tracing::debug;

use crate::air::{AirQualityResolver, StationSource};
use crate::domain::{
    AirQualitySample, Criterion, EvaluatedRoute, GeoPoint, RouteCandidate, TransportMode,
};
use crate::providers::{DirectionsProvider, FetchError, MultimodalProvider, RouteQuery};

use super::config::EngineConfig;
use super::fetch::RouteCandidateFetcher;
use super::health::SegmentHealthAdvisor;
use super::metrics::MetricsComputer;
use super::rank::rank_routes;

/// Something that can turn a query into evaluated candidates.
///
/// The result is in fetch order; ranking is applied by the caller so a
/// criterion change that arrives mid-fetch is honoured.
pub trait Evaluate: Send + Sync + 'static {
    fn config(&self) -> &EngineConfig;

    fn evaluate(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Vec<EvaluatedRoute>, FetchError>> + Send;

    /// Build a query with the configured candidate bound for `criterion`.
    fn query(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TransportMode,
        criterion: Criterion,
    ) -> RouteQuery {
        RouteQuery {
            origin,
            destination,
            mode,
            criterion,
            max_routes: self.config().max_routes(criterion),
        }
    }

    /// Evaluate and rank in one step.
    fn plan(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Vec<EvaluatedRoute>, FetchError>> + Send {
        async move {
            let routes = self.evaluate(query).await?;
            Ok(rank_routes(&routes, query.criterion))
        }
    }
}

/// The route evaluation engine.
pub struct RouteEngine<D, M, S> {
    fetcher: RouteCandidateFetcher<D, M>,
    air: AirQualityResolver<S>,
    advisor: SegmentHealthAdvisor,
    computer: MetricsComputer,
    config: EngineConfig,
}

impl<D, M, S> RouteEngine<D, M, S>
where
    D: DirectionsProvider,
    M: MultimodalProvider,
    S: StationSource,
{
    pub fn new(directions: D, multimodal: M, stations: S, config: EngineConfig) -> Self {
        Self {
            fetcher: RouteCandidateFetcher::new(directions, multimodal, config.request_timeout),
            air: AirQualityResolver::new(stations, config.station_ttl),
            advisor: SegmentHealthAdvisor::new(config.health_aggregation),
            computer: MetricsComputer::new(config.metrics),
            config,
        }
    }

    async fn evaluate_candidate(&self, candidate: RouteCandidate) -> EvaluatedRoute {
        let summary = (!candidate.segments.is_empty())
            .then(|| self.advisor.summarize(&candidate.segments));

        let air_quality = self.sample_for(&candidate).await;
        let metrics = self.computer.compute(
            &candidate,
            &candidate.mode,
            &air_quality,
            summary.as_ref().map(|s| s.route_score),
        );

        EvaluatedRoute {
            candidate: candidate.into(),
            metrics,
            air_quality,
            recommended_modes: summary.map(|s| s.modes).unwrap_or_default(),
        }
    }

    /// A single-segment route carries its own reading; anything else is
    /// sampled at the geometry centroid.
    async fn sample_for(&self, candidate: &RouteCandidate) -> AirQualitySample {
        if let Some(sample) = candidate.single_segment_pollution() {
            return sample.clone();
        }

        match candidate.sample_point() {
            Some(point) => self.air.resolve(point).await,
            None => AirQualitySample::unavailable(),
        }
    }
}

impl<D, M, S> Evaluate for RouteEngine<D, M, S>
where
    D: DirectionsProvider + 'static,
    M: MultimodalProvider + 'static,
    S: StationSource + 'static,
{
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn evaluate(&self, query: &RouteQuery) -> Result<Vec<EvaluatedRoute>, FetchError> {
        let candidates = self.fetcher.fetch(query).await?;
        let routes = join_all(
            candidates
                .into_iter()
                .map(|candidate| self.evaluate_candidate(candidate)),
        )
        .await;

        debug!(count = routes.len(), criterion = %query.criterion, "evaluated candidates");
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::{AirQualityError, Station};
    use crate::domain::Segment;

    struct StaticRoutes(Vec<RouteCandidate>);

    impl DirectionsProvider for StaticRoutes {
        async fn directions(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
            Ok(self.0.iter().take(query.max_routes).cloned().collect())
        }
    }

    impl MultimodalProvider for StaticRoutes {
        async fn find_way(&self, query: &RouteQuery) -> Result<Vec<RouteCandidate>, FetchError> {
            Ok(self.0.iter().take(query.max_routes).cloned().collect())
        }
    }

    struct StaticStations(Option<Vec<Station>>);

    impl StationSource for StaticStations {
        async fn stations(&self) -> Result<Vec<Station>, AirQualityError> {
            self.0.clone().ok_or(AirQualityError::Data {
                message: "offline".into(),
            })
        }
    }

    fn station(id: &str, lon: f64, lat: f64, pm25: f64) -> Station {
        Station {
            id: id.into(),
            position: GeoPoint::new(lon, lat),
            pm25,
        }
    }

    fn driving(id: &str, at: f64, distance_m: f64, duration_s: f64) -> RouteCandidate {
        RouteCandidate::new(
            id,
            vec![GeoPoint::new(at, at), GeoPoint::new(at, at)],
            distance_m,
            duration_s,
            TransportMode::Driving,
        )
    }

    fn segment(mode: TransportMode, health: f64, pm25: Option<f64>) -> Segment {
        Segment {
            geometry: vec![GeoPoint::new(5.0, 5.0)],
            length_m: 1000.0,
            travel_time_s: 300.0,
            recommended_mode: Some(mode),
            pollution: pm25.map(|pm25| AirQualitySample {
                pm25,
                ..AirQualitySample::default()
            }),
            health_score: Some(health),
        }
    }

    fn engine(
        routes: Vec<RouteCandidate>,
        stations: Option<Vec<Station>>,
    ) -> RouteEngine<StaticRoutes, StaticRoutes, StaticStations> {
        RouteEngine::new(
            StaticRoutes(routes.clone()),
            StaticRoutes(routes),
            StaticStations(stations),
            EngineConfig::default(),
        )
    }

    fn stations() -> Option<Vec<Station>> {
        Some(vec![station("low", 0.0, 0.0, 10.0), station("high", 1.0, 1.0, 50.0)])
    }

    #[tokio::test]
    async fn evaluates_in_fetch_order() {
        let engine = engine(
            vec![
                driving("slow", 0.1, 10_000.0, 1_200.0),
                driving("quick", 0.9, 12_000.0, 600.0),
            ],
            stations(),
        );
        let query = engine.query(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Driving,
            Criterion::Fastest,
        );
        assert_eq!(query.max_routes, 3);

        let routes = engine.evaluate(&query).await.unwrap();
        assert_eq!(routes[0].id(), "slow");
        assert_eq!(routes[0].air_quality.station_id.as_deref(), Some("low"));
        assert_eq!(routes[1].air_quality.pm25, 50.0);
        assert!((routes[0].metrics.emission_grams - 1700.0).abs() < 1e-9);

        let ranked = engine.plan(&query).await.unwrap();
        assert_eq!(ranked[0].id(), "quick");
    }

    #[tokio::test]
    async fn station_outage_fails_open() {
        let engine = engine(vec![driving("r", 0.5, 5_000.0, 300.0)], None);
        let query = engine.query(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Driving,
            Criterion::LeastPollution,
        );

        let routes = engine.evaluate(&query).await.unwrap();
        assert_eq!(routes[0].metrics.pollution_exposure, 0.0);
        assert_eq!(routes[0].air_quality, AirQualitySample::unavailable());
    }

    #[tokio::test]
    async fn single_segment_uses_own_sample() {
        let mut candidate = driving("m", 0.0, 2_000.0, 600.0);
        candidate.segments = vec![segment(TransportMode::Walking, 0.2, Some(30.0))];
        let engine = engine(vec![candidate], stations());
        let query = engine.query(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Walking,
            Criterion::LeastPollution,
        );

        let routes = engine.evaluate(&query).await.unwrap();
        // 30 * 1.8 * 2 km, not the nearby 10 µg/m³ station
        assert!((routes[0].metrics.pollution_exposure - 108.0).abs() < 1e-9);
        assert_eq!(routes[0].metrics.health_score, Some(0.2));
    }

    #[tokio::test]
    async fn multimodal_routes_carry_health_and_modes() {
        let mut candidate = driving("multimodal-1", 0.0, 3_000.0, 900.0);
        candidate.mode = TransportMode::Walking;
        candidate.segments = vec![
            segment(TransportMode::Walking, 0.2, None),
            segment(TransportMode::Transit, 0.6, None),
            segment(TransportMode::Walking, 0.4, None),
        ];
        let engine = engine(vec![candidate], stations());
        let query = engine.query(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Walking,
            Criterion::Healthiest,
        );
        assert_eq!(query.max_routes, 1);

        let routes = engine.plan(&query).await.unwrap();
        let health = routes[0].metrics.health_score.unwrap();
        assert!((health - 0.4).abs() < 1e-9);
        assert_eq!(
            routes[0].recommended_modes,
            vec![TransportMode::Walking, TransportMode::Transit]
        );
        assert_eq!(routes[0].air_quality.station_id.as_deref(), Some("low"));
    }

    #[tokio::test]
    async fn directions_routes_have_no_health_score() {
        let engine = engine(vec![driving("r", 0.0, 1_000.0, 60.0)], stations());
        let query = engine.query(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            TransportMode::Driving,
            Criterion::Fastest,
        );

        let routes = engine.evaluate(&query).await.unwrap();
        assert_eq!(routes[0].metrics.health_score, None);
        assert!(routes[0].recommended_modes.is_empty());
    }
}
