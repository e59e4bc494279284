//! Drive-time estimation with a run-scoped memo.
//!
//! The primary path asks a [`DriveTimeSource`] (normally the routing
//! service). Any failure, timeout or implausible answer drops to the
//! closed-form estimate `haversine_km / speed * 60`; errors never leave
//! this module.

use crate::constants::*;
use crate::location::*;
use crate::routing::RoutingConfig;
use fnv::FnvHashMap;
use log::*;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("routing request timed out after {0:?}")]
    Timeout(Duration),
    #[error("routing service unreachable: {0}")]
    Network(String),
    #[error("routing service returned status {0}")]
    Status(u16),
    #[error("routing response could not be used: {0}")]
    Response(String),
}

/// Narrow interface over an external routing collaborator: two points in,
/// minutes out, fallible.
///
/// The estimator only measures a call after it returns, so a slow answer
/// is discarded but a call that never returns blocks the run. Implementors
/// must bound their own I/O; `OrsRouter` does it through its agent timeout.
pub trait DriveTimeSource {
    fn name(&self) -> &str;

    fn drive_minutes(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
    ) -> Result<f64, RoutingError>;
}

/// Closed-form estimate at a constant average speed.
pub fn fallback_minutes(origin: GeoLocation, destination: GeoLocation, speed_kmh: f64) -> f64 {
    origin.distance_to(destination) / speed_kmh * 60.0
}

type PairKey = ((u64, u64), (u64, u64));

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriveTimeStats {
    pub lookups: u64,
    pub cache_hits: u64,
    pub routed: u64,
    pub fallbacks: u64,
}

/// Drive-time estimator scoped to one optimization run.
///
/// The memo is owned by the estimator, so two runs never share state.
pub struct DriveTimeEstimator {
    router: Option<Box<dyn DriveTimeSource>>,
    average_speed_kmh: f64,
    timeout: Duration,
    /// Cleared after the first routing failure; the rest of the run uses the fallback.
    router_healthy: bool,
    cache: FnvHashMap<PairKey, f64>,
    stats: DriveTimeStats,
}

impl DriveTimeEstimator {
    /// Estimator that only uses the closed-form estimate.
    pub fn closed_form(average_speed_kmh: f64) -> Self {
        DriveTimeEstimator {
            router: None,
            average_speed_kmh: if average_speed_kmh > 0.0 {
                average_speed_kmh
            } else {
                DEFAULT_AVERAGE_SPEED_KMH
            },
            timeout: Duration::from_secs(2),
            router_healthy: false,
            cache: FnvHashMap::default(),
            stats: DriveTimeStats::default(),
        }
    }

    /// Estimator that asks `router` first and falls back on failure or when
    /// a call takes longer than `timeout`.
    pub fn with_router(
        router: Box<dyn DriveTimeSource>,
        average_speed_kmh: f64,
        timeout: Duration,
    ) -> Self {
        let mut estimator = Self::closed_form(average_speed_kmh);
        estimator.router = Some(router);
        estimator.router_healthy = true;
        estimator.timeout = timeout;
        estimator
    }

    /// Build from routing configuration. Without a credential (or without the
    /// `routing` feature) this silently selects the closed-form estimate.
    pub fn from_config(config: &RoutingConfig, average_speed_kmh: f64) -> Self {
        match crate::routing::router_from_config(config) {
            Some(router) => Self::with_router(router, average_speed_kmh, config.timeout()),
            None => Self::closed_form(average_speed_kmh),
        }
    }

    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    pub fn is_routing(&self) -> bool {
        self.router.is_some() && self.router_healthy
    }

    pub fn stats(&self) -> &DriveTimeStats {
        &self.stats
    }

    /// Drive time in minutes from `origin` to `destination`. Never fails.
    pub fn estimate(&mut self, origin: GeoLocation, destination: GeoLocation) -> f64 {
        self.stats.lookups += 1;

        let key = (origin.packed_repr(), destination.packed_repr());
        if let Some(minutes) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return *minutes;
        }

        let minutes = self
            .route(origin, destination)
            .unwrap_or_else(|| {
                self.stats.fallbacks += 1;
                fallback_minutes(origin, destination, self.average_speed_kmh)
            });

        self.cache.insert(key, minutes);
        minutes
    }

    fn route(&mut self, origin: GeoLocation, destination: GeoLocation) -> Option<f64> {
        if !self.router_healthy {
            return None;
        }
        let router = self.router.as_ref()?;

        let started = Instant::now();
        let result = router
            .drive_minutes(origin, destination)
            .and_then(|minutes| {
                if started.elapsed() > self.timeout {
                    Err(RoutingError::Timeout(self.timeout))
                } else if !minutes.is_finite() || minutes < 0.0 {
                    Err(RoutingError::Response(format!("implausible duration {}", minutes)))
                } else {
                    Ok(minutes)
                }
            });

        match result {
            Ok(minutes) => {
                self.stats.routed += 1;
                Some(minutes)
            }
            Err(e) => {
                warn!(
                    "Drive time via '{}' failed ({}), using distance estimate for the rest of this run",
                    router.name(),
                    e
                );
                self.router_healthy = false;
                None
            }
        }
    }
}

/// A single point-to-point drive time, rounded for display.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveTimeQuote {
    pub origin: GeoLocation,
    pub destination: GeoLocation,
    pub drive_time: f64,
}

impl DriveTimeQuote {
    pub fn new(
        estimator: &mut DriveTimeEstimator,
        origin: GeoLocation,
        destination: GeoLocation,
    ) -> Self {
        DriveTimeQuote {
            origin,
            destination,
            drive_time: round_to(estimator.estimate(origin, destination), 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedRouter {
        minutes: Result<f64, ()>,
        calls: Rc<Cell<u32>>,
    }

    impl DriveTimeSource for FixedRouter {
        fn name(&self) -> &str {
            "fixed"
        }

        fn drive_minutes(&self, _: GeoLocation, _: GeoLocation) -> Result<f64, RoutingError> {
            self.calls.set(self.calls.get() + 1);
            self.minutes
                .map_err(|_| RoutingError::Network("connection refused".to_string()))
        }
    }

    fn points() -> (GeoLocation, GeoLocation) {
        (GeoLocation::new(44.9778, -93.2650), GeoLocation::new(46.7867, -92.1005))
    }

    #[test]
    fn closed_form_matches_haversine_at_60_kmh() {
        let (a, b) = points();
        let mut estimator = DriveTimeEstimator::closed_form(60.0);
        assert!((estimator.estimate(a, b) - a.distance_to(b)).abs() < 1e-9);
    }

    #[test]
    fn routed_answers_are_memoized() {
        let (a, b) = points();
        let calls = Rc::new(Cell::new(0));
        let router = FixedRouter {
            minutes: Ok(150.0),
            calls: calls.clone(),
        };
        let mut estimator =
            DriveTimeEstimator::with_router(Box::new(router), 60.0, Duration::from_secs(5));

        assert_eq!(estimator.estimate(a, b), 150.0);
        assert_eq!(estimator.estimate(a, b), 150.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(estimator.stats().cache_hits, 1);
        assert_eq!(estimator.stats().routed, 1);
    }

    #[test]
    fn failure_falls_back_and_disables_router() {
        let (a, b) = points();
        let calls = Rc::new(Cell::new(0));
        let router = FixedRouter {
            minutes: Err(()),
            calls: calls.clone(),
        };
        let mut estimator =
            DriveTimeEstimator::with_router(Box::new(router), 60.0, Duration::from_secs(5));

        let minutes = estimator.estimate(a, b);
        assert!((minutes - a.distance_to(b)).abs() < 1e-9);
        assert!(!estimator.is_routing());

        estimator.estimate(b, a);
        assert_eq!(calls.get(), 1);
        assert_eq!(estimator.stats().fallbacks, 2);
    }

    #[test]
    fn implausible_durations_are_discarded() {
        let (a, b) = points();
        let router = FixedRouter {
            minutes: Ok(f64::NAN),
            calls: Rc::new(Cell::new(0)),
        };
        let mut estimator =
            DriveTimeEstimator::with_router(Box::new(router), 60.0, Duration::from_secs(5));
        assert!(estimator.estimate(a, b).is_finite());
    }

    #[test]
    fn quote_is_rounded() {
        let (a, b) = points();
        let mut estimator = DriveTimeEstimator::closed_form(60.0);
        let quote = DriveTimeQuote::new(&mut estimator, a, b);
        assert_eq!(quote.drive_time, round_to(a.distance_to(b), 2));
    }
}
