//! Coordinate → pricing region resolution.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::AreaCache;
use crate::domain::{Coordinate, RegionCatalog, RegionId};
use crate::mapbox::MapboxError;

use super::rate_limit::RateLimiter;
use super::retry::{RetryError, RetryPolicy};

/// Reverse geocoding to an administrative area.
///
/// This abstraction allows the resolver to be tested without network
/// access.
pub trait Geocoder: Send + Sync {
    /// Name of the state/province enclosing `coord`, or `None` if there is
    /// none.
    fn administrative_area(
        &self,
        coord: Coordinate,
    ) -> impl Future<Output = Result<Option<String>, MapboxError>> + Send;
}

/// Failure to resolve one coordinate.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Geocoding kept failing with retryable errors
    #[error("geocoding failed after {attempts} attempts: {last}")]
    Transient { attempts: u32, last: MapboxError },

    /// Geocoding failed in a way retrying cannot fix
    #[error("geocoding failed: {0}")]
    Fatal(MapboxError),
}

impl From<RetryError<MapboxError>> for ResolveError {
    fn from(e: RetryError<MapboxError>) -> Self {
        match e {
            RetryError::Exhausted { attempts, last } => ResolveError::Transient { attempts, last },
            RetryError::Fatal { error, .. } => ResolveError::Fatal(error),
        }
    }
}

/// Resolves coordinates to pricing regions.
///
/// Every geocoding attempt, retries included, first passes through the
/// shared rate limiter.
pub struct GeoResolver<G> {
    geocoder: G,
    limiter: Arc<RateLimiter>,
    catalog: Arc<RegionCatalog>,
    retry: RetryPolicy,
    cache: Option<AreaCache>,
}

impl<G: Geocoder> GeoResolver<G> {
    /// Create a resolver with the default retry policy and no cache.
    pub fn new(geocoder: G, limiter: Arc<RateLimiter>, catalog: Arc<RegionCatalog>) -> Self {
        Self {
            geocoder,
            limiter,
            catalog,
            retry: RetryPolicy::default(),
            cache: None,
        }
    }

    /// Set the retry policy for geocoding calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Memoise successful lookups.
    pub fn with_cache(mut self, cache: AreaCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve a coordinate, reporting geocoding failures.
    ///
    /// An area missing from the catalog, or no area at all, resolves to
    /// `RegionId::Unresolved` rather than an error.
    pub async fn try_resolve(&self, coord: Coordinate) -> Result<RegionId, ResolveError> {
        let area = match self.cached_area(coord).await {
            Some(area) => area,
            None => {
                let area = self.geocode(coord).await?;
                if let Some(cache) = &self.cache {
                    cache.insert(coord, area.clone()).await;
                }
                area
            }
        };

        let region = match &area {
            Some(name) => self.catalog.lookup(name),
            None => RegionId::Unresolved,
        };

        if !region.is_resolved() {
            debug!(%coord, area = area.as_deref(), "area is not a pricing region");
        }

        Ok(region)
    }

    /// Resolve a coordinate, degrading any failure to `RegionId::Unresolved`.
    ///
    /// A single bad coordinate never fails the trip.
    pub async fn resolve_region(&self, coord: Coordinate) -> RegionId {
        match self.try_resolve(coord).await {
            Ok(region) => region,
            Err(e) => {
                warn!(%coord, error = %e, "could not resolve region");
                RegionId::Unresolved
            }
        }
    }

    async fn cached_area(&self, coord: Coordinate) -> Option<Option<String>> {
        match &self.cache {
            Some(cache) => cache.get(coord).await,
            None => None,
        }
    }

    async fn geocode(&self, coord: Coordinate) -> Result<Option<String>, ResolveError> {
        let area = self
            .retry
            .run(
                move |_attempt| async move {
                    self.limiter.acquire().await;
                    self.geocoder.administrative_area(coord).await
                },
                MapboxError::is_transient,
            )
            .await?;
        Ok(area)
    }
}
