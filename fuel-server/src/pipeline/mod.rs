//! Trip cost pipeline.
//!
//! Waypoints go through three stages:
//!
//! 1. [`RouteFetcher`] gets a driving route, flattened to steps
//! 2. [`RegionSegmenter`] resolves each step's end point to a pricing region
//!    (via [`GeoResolver`], which retries and rate-limits geocoding calls)
//!    and merges consecutive same-region steps into segments
//! 3. [`TripCoster`] prices each segment for the travel date and sums them
//!
//! [`TripEstimator`] ties the stages together behind a request timeout.

mod cost;
mod rate_limit;
mod resolver;
mod retry;
mod route;
mod segment;
mod trip;

pub use cost::{
    CostError, MILES_PER_METER, PriceError, PriceEstimator, SegmentCost, TripCostResult,
    TripCoster, UnresolvedPolicy,
};
pub use rate_limit::{RateLimiter, RateLimiterError};
pub use resolver::{GeoResolver, Geocoder, ResolveError};
pub use retry::{RetryError, RetryPolicy};
pub use route::{Directions, RouteError, RouteFetcher};
pub use segment::{RegionSegmenter, SegmentError, merge_steps};
pub use trip::{TripConfig, TripError, TripEstimator};
