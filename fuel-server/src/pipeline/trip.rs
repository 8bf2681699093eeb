//! End-to-end trip cost estimation.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::Coordinate;

use super::cost::{
    CostError, MILES_PER_METER, PriceEstimator, TripCostResult, TripCoster, check_efficiency,
};
use super::resolver::Geocoder;
use super::route::{Directions, RouteError, RouteFetcher};
use super::segment::{RegionSegmenter, SegmentError};

/// Configuration for trip estimation.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Upper bound on one estimate, including every network call, backoff
    /// and rate-limit pause.
    pub request_timeout: Duration,

    /// Factor converting route meters to the estimator's distance unit.
    pub meters_to_distance_unit: f64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            meters_to_distance_unit: MILES_PER_METER,
        }
    }
}

/// Error estimating a trip.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Cost(#[from] CostError),

    /// The estimate did not finish within the request timeout
    #[error("trip estimate timed out after {0:?}")]
    Timeout(Duration),
}

/// Estimates trip fuel cost: route, segment by region, price.
pub struct TripEstimator<D, G, P> {
    route: RouteFetcher<D>,
    segmenter: RegionSegmenter<G>,
    coster: TripCoster<P>,
    config: TripConfig,
}

impl<D, G, P> TripEstimator<D, G, P>
where
    D: Directions,
    G: Geocoder,
    P: PriceEstimator,
{
    pub fn new(
        route: RouteFetcher<D>,
        segmenter: RegionSegmenter<G>,
        coster: TripCoster<P>,
        config: TripConfig,
    ) -> Self {
        Self {
            route,
            segmenter,
            coster,
            config,
        }
    }

    /// Estimate the fuel cost of driving through `waypoints` on `date`.
    ///
    /// `efficiency` is distance per unit of fuel (miles per gallon with the
    /// default conversion). On timeout all partial work is dropped.
    pub async fn estimate_trip_cost(
        &self,
        waypoints: &[Coordinate],
        date: NaiveDate,
        efficiency: f64,
    ) -> Result<TripCostResult, TripError> {
        check_efficiency(efficiency)?;

        let timeout = self.config.request_timeout;
        tokio::time::timeout(timeout, self.estimate(waypoints, date, efficiency))
            .await
            .map_err(|_| TripError::Timeout(timeout))?
    }

    async fn estimate(
        &self,
        waypoints: &[Coordinate],
        date: NaiveDate,
        efficiency: f64,
    ) -> Result<TripCostResult, TripError> {
        let steps = self.route.fetch_route(waypoints).await?;
        let segments = self.segmenter.segment(&steps).await?;
        let result = self.coster.cost(
            &segments,
            date,
            efficiency,
            self.config.meters_to_distance_unit,
        )?;

        info!(
            waypoints = waypoints.len(),
            steps = steps.len(),
            segments = segments.len(),
            total_cost = result.total_cost,
            %date,
            "estimated trip cost"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Arc;

    use super::*;
    use crate::domain::{RegionCatalog, RegionId, RouteStep};
    use crate::mapbox::MapboxError;
    use crate::pipeline::{GeoResolver, PriceError, RateLimiter, UnresolvedPolicy};

    struct FakeDirections {
        steps: Vec<RouteStep>,
        delay: Duration,
    }

    impl Directions for FakeDirections {
        fn driving_route(
            &self,
            _waypoints: &[Coordinate],
        ) -> impl Future<Output = Result<Vec<RouteStep>, MapboxError>> + Send {
            let steps = self.steps.clone();
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                if steps.is_empty() {
                    Err(MapboxError::NoRoute("No route found".into()))
                } else {
                    Ok(steps)
                }
            }
        }
    }

    /// California west of -117°, Nevada up to -114°, Utah beyond; the
    /// Atlantic (east of -70°) is unavailable.
    struct BandGeocoder;

    impl Geocoder for BandGeocoder {
        fn administrative_area(
            &self,
            coord: Coordinate,
        ) -> impl Future<Output = Result<Option<String>, MapboxError>> + Send {
            let lon = coord.lon();
            async move {
                if lon > -70.0 {
                    return Err(MapboxError::Status {
                        status: 503,
                        message: "unavailable".into(),
                    });
                }
                let area = if lon < -117.0 {
                    "California"
                } else if lon < -114.0 {
                    "Nevada"
                } else {
                    "Utah"
                };
                Ok(Some(area.to_string()))
            }
        }
    }

    struct FlatPrices(HashMap<RegionId, f64>);

    impl PriceEstimator for FlatPrices {
        fn price(&self, region: RegionId, _date: NaiveDate) -> Result<f64, PriceError> {
            self.0.get(&region).copied().ok_or(PriceError::NoModel(region))
        }
    }

    fn coord(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    fn waypoints() -> Vec<Coordinate> {
        vec![coord(-122.42, 37.77), coord(-111.89, 40.76)]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 7, 13).unwrap()
    }

    fn estimator(
        steps: Vec<RouteStep>,
        delay: Duration,
        policy: UnresolvedPolicy,
    ) -> TripEstimator<FakeDirections, BandGeocoder, FlatPrices> {
        let resolver = GeoResolver::new(
            BandGeocoder,
            Arc::new(RateLimiter::per_minute(600).unwrap()),
            Arc::new(RegionCatalog::usa()),
        );
        let prices = FlatPrices(HashMap::from([
            (RegionId::WestCoast, 4.0),
            (RegionId::RockyMountain, 3.0),
        ]));

        TripEstimator::new(
            RouteFetcher::new(FakeDirections { steps, delay }),
            RegionSegmenter::new(resolver, 4),
            TripCoster::new(prices).with_unresolved_policy(policy),
            TripConfig::default(),
        )
    }

    /// Meters in `miles` statute miles.
    fn meters(miles: f64) -> f64 {
        miles / MILES_PER_METER
    }

    #[tokio::test]
    async fn estimates_multi_region_trip() {
        let steps = vec![
            RouteStep::new(meters(200.0), coord(-121.0, 38.0)),
            RouteStep::new(meters(70.0), coord(-116.0, 37.0)),
            RouteStep::new(meters(54.0), coord(-112.0, 40.7)),
        ];
        let estimator = estimator(steps, Duration::ZERO, UnresolvedPolicy::Exclude);

        let result = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap();

        // 270 mi in region 5 at $4 and 54 mi in region 4 at $3, at 27 mpg.
        assert_eq!(result.total_cost, 46.0);
        let regions: Vec<RegionId> = result.segments.iter().map(|s| s.region).collect();
        assert_eq!(regions, vec![RegionId::WestCoast, RegionId::RockyMountain]);
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_step_is_reported() {
        let steps = vec![
            RouteStep::new(meters(27.0), coord(-121.0, 38.0)),
            RouteStep::new(500.0, coord(-60.0, 38.0)),
        ];
        let estimator = estimator(steps, Duration::ZERO, UnresolvedPolicy::Exclude);

        let result = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap();

        assert_eq!(result.total_cost, 4.0);
        assert_eq!(result.unresolved_meters, 500.0);
        assert_eq!(result.segments[1].region, RegionId::Unresolved);
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_step_fails_under_fail_policy() {
        let steps = vec![RouteStep::new(500.0, coord(-60.0, 38.0))];
        let estimator = estimator(steps, Duration::ZERO, UnresolvedPolicy::Fail);

        let err = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TripError::Cost(CostError::UnresolvedRegion { .. })
        ));
    }

    #[tokio::test]
    async fn missing_route_is_an_error() {
        let estimator = estimator(vec![], Duration::ZERO, UnresolvedPolicy::Exclude);

        let err = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap_err();

        assert!(matches!(err, TripError::Route(RouteError::Unavailable(_))));
    }

    #[tokio::test]
    async fn invalid_efficiency_fails_before_routing() {
        let estimator = estimator(vec![], Duration::ZERO, UnresolvedPolicy::Exclude);

        let err = estimator
            .estimate_trip_cost(&waypoints(), date(), 0.0)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TripError::Cost(CostError::InvalidEfficiency(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_interrupts_geocode_backoff() {
        // The geocoder keeps answering 503; its 4.5s of backoff outlasts
        // a 2s request timeout.
        let steps = vec![RouteStep::new(500.0, coord(-60.0, 38.0))];
        let mut estimator = estimator(steps, Duration::ZERO, UnresolvedPolicy::Exclude);
        estimator.config.request_timeout = Duration::from_secs(2);
        let start = tokio::time::Instant::now();

        let err = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap_err();

        assert!(matches!(err, TripError::Timeout(d) if d == Duration::from_secs(2)));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_route_times_out() {
        let steps = vec![RouteStep::new(100.0, coord(-121.0, 38.0))];
        let estimator = estimator(steps, Duration::from_secs(120), UnresolvedPolicy::Exclude);

        let err = estimator
            .estimate_trip_cost(&waypoints(), date(), 27.0)
            .await
            .unwrap_err();

        assert!(matches!(err, TripError::Timeout(d) if d == Duration::from_secs(60)));
    }
}
