//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{AreaCache, CacheConfig};
use crate::config::AppConfig;
use crate::domain::RegionCatalog;
use crate::mapbox::MapboxClient;
use crate::pipeline::{
    GeoResolver, RateLimiter, RateLimiterError, RegionSegmenter, RouteFetcher, TripConfig,
    TripCoster, TripEstimator,
};
use crate::pricing::PriceModels;

/// Trip estimator backed by Mapbox and the persisted price models.
pub type MapboxTripEstimator = TripEstimator<MapboxClient, MapboxClient, PriceModels>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Trip cost pipeline
    pub estimator: Arc<MapboxTripEstimator>,

    /// Efficiency assumed when a request omits `mpg`
    pub default_mpg: f64,
}

impl AppState {
    /// Create a new app state.
    pub fn new(estimator: MapboxTripEstimator, default_mpg: f64) -> Self {
        Self {
            estimator: Arc::new(estimator),
            default_mpg,
        }
    }

    /// Assemble the pipeline from its collaborators.
    ///
    /// One rate limiter governs every geocoding call made by the process.
    pub fn build(
        mapbox: MapboxClient,
        models: PriceModels,
        catalog: RegionCatalog,
        config: &AppConfig,
    ) -> Result<Self, RateLimiterError> {
        let limiter = Arc::new(RateLimiter::per_minute(config.geocode_calls_per_minute)?);

        let resolver = GeoResolver::new(mapbox.clone(), limiter, Arc::new(catalog))
            .with_cache(AreaCache::new(&CacheConfig::default()));
        let segmenter = RegionSegmenter::new(resolver, config.resolve_concurrency);
        let coster = TripCoster::new(models).with_unresolved_policy(config.unresolved_policy);
        let trip_config = TripConfig {
            request_timeout: config.request_timeout,
            ..TripConfig::default()
        };

        let estimator = TripEstimator::new(
            RouteFetcher::new(mapbox),
            segmenter,
            coster,
            trip_config,
        );

        Ok(Self::new(estimator, config.default_mpg))
    }
}
