//! Caching layer for reverse geocoding results.
//!
//! Routes through the same corridors end their steps at the same junctions,
//! so repeated trips look up identical coordinates. Entries are keyed on the
//! exact coordinate: a point a few meters away may lie across a state line,
//! so only an identical point can reuse a lookup and skip the geocoding
//! service, and with it the rate limiter.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;

/// Cache key: the bit patterns of longitude and latitude.
type AreaKey = (u64, u64);

/// Cached administrative area; `None` means the geocoder found no region.
type AreaEntry = Option<String>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 50_000,
        }
    }
}

/// Cache of coordinate → administrative area lookups.
///
/// Only successful geocoding responses are stored; failures are never
/// cached.
#[derive(Clone)]
pub struct AreaCache {
    areas: MokaCache<AreaKey, AreaEntry>,
}

impl AreaCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let areas = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { areas }
    }

    fn key(coord: Coordinate) -> AreaKey {
        (coord.lon().to_bits(), coord.lat().to_bits())
    }

    /// Get a cached lookup. The outer `Option` is the cache hit.
    pub async fn get(&self, coord: Coordinate) -> Option<AreaEntry> {
        self.areas.get(&Self::key(coord)).await
    }

    /// Record a lookup result.
    pub async fn insert(&self, coord: Coordinate, area: AreaEntry) {
        self.areas.insert(Self::key(coord), area).await;
    }
}
