//! Per-route metric derivation.
//!
//! Every figure is a pure function of the candidate, its mode, the air
//! sample and (for multimodal routes) the aggregated health score.

use crate::domain::{AirQualitySample, Metrics, RouteCandidate, TransportMode};

use super::config::MetricsConfig;

/// Derives comparable metrics from raw candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsComputer {
    config: MetricsConfig,
}

impl MetricsComputer {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute the metrics of one candidate.
    pub fn compute(
        &self,
        candidate: &RouteCandidate,
        mode: &TransportMode,
        sample: &AirQualitySample,
        health_score: Option<f64>,
    ) -> Metrics {
        let distance_km = candidate.raw_distance_m / 1000.0;

        Metrics {
            distance_km,
            duration_min: self.duration_min(candidate.raw_duration_s, mode),
            emission_grams: distance_km * mode.emission_factor(),
            pollution_exposure: self.pollution_exposure(sample.pm25, distance_km),
            health_score,
        }
    }

    /// Travel time in minutes, with the motorcycle adjustment applied.
    pub fn duration_min(&self, raw_duration_s: f64, mode: &TransportMode) -> f64 {
        let minutes = raw_duration_s / 60.0;
        match mode {
            TransportMode::Motorcycle => minutes * self.config.motorcycle_duration_factor,
            _ => minutes,
        }
    }

    /// Distance-weighted exposure; a non-finite or negative pm25 counts as 0.
    pub fn pollution_exposure(&self, pm25: f64, distance_km: f64) -> f64 {
        let pm25 = if pm25.is_finite() && pm25 > 0.0 { pm25 } else { 0.0 };
        pm25 * self.config.pollution_exposure_factor * distance_km
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_strategy() -> impl Strategy<Value = TransportMode> {
        prop_oneof![
            Just(TransportMode::Driving),
            Just(TransportMode::DrivingTraffic),
            Just(TransportMode::Motorcycle),
            Just(TransportMode::Walking),
            Just(TransportMode::Cycling),
            Just(TransportMode::Transit),
            "[a-z]{3,8}".prop_map(|s| TransportMode::parse(&s)),
        ]
    }

    proptest! {
        #[test]
        fn emission_depends_only_on_distance_and_mode(
            distance_m in 0.0f64..200_000.0,
            duration_a in 0.0f64..20_000.0,
            duration_b in 0.0f64..20_000.0,
            pm25_a in 0.0f64..300.0,
            pm25_b in 0.0f64..300.0,
            mode in mode_strategy(),
        ) {
            let computer = MetricsComputer::default();
            let a = RouteCandidate::new("a", vec![], distance_m, duration_a, mode.clone());
            let b = RouteCandidate::new("b", vec![], distance_m, duration_b, mode.clone());

            let ma = computer.compute(&a, &mode, &AirQualitySample { pm25: pm25_a, ..Default::default() }, None);
            let mb = computer.compute(&b, &mode, &AirQualitySample { pm25: pm25_b, ..Default::default() }, Some(1.0));

            prop_assert_eq!(ma.emission_grams, mb.emission_grams);
            prop_assert_eq!(ma.emission_grams, distance_m / 1000.0 * mode.emission_factor());
        }

        #[test]
        fn metrics_are_non_negative(
            distance_m in 0.0f64..200_000.0,
            duration_s in 0.0f64..20_000.0,
            pm25 in -50.0f64..300.0,
            mode in mode_strategy(),
        ) {
            let computer = MetricsComputer::default();
            let route = RouteCandidate::new("r", vec![], distance_m, duration_s, mode.clone());
            let m = computer.compute(&route, &mode, &AirQualitySample { pm25, ..Default::default() }, None);

            prop_assert!(m.distance_km >= 0.0);
            prop_assert!(m.duration_min >= 0.0);
            prop_assert!(m.emission_grams >= 0.0);
            prop_assert!(m.pollution_exposure >= 0.0);
        }
    }
}
