//! Driving route retrieval.

use std::future::Future;

use tracing::{debug, warn};

use crate::domain::{Coordinate, RouteStep};
use crate::mapbox::MapboxError;

/// A directions service.
///
/// This abstraction allows the pipeline to be tested with canned routes.
pub trait Directions: Send + Sync {
    /// Driving route through `waypoints`, as travel-ordered steps.
    fn driving_route(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<RouteStep>, MapboxError>> + Send;
}

/// Error fetching a route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Fewer than two waypoints were given
    #[error("at least 2 waypoints are required, got {0}")]
    TooFewWaypoints(usize),

    /// The directions service failed or had no route
    #[error("route unavailable: {0}")]
    Unavailable(#[source] MapboxError),
}

/// Fetches a route once per trip. Failures are not retried here.
pub struct RouteFetcher<D> {
    directions: D,
}

impl<D: Directions> RouteFetcher<D> {
    pub fn new(directions: D) -> Self {
        Self { directions }
    }

    /// Get the travel-ordered steps of a route through `waypoints`.
    pub async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<RouteStep>, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }

        let steps = self
            .directions
            .driving_route(waypoints)
            .await
            .map_err(|e| {
                warn!(waypoints = waypoints.len(), error = %e, "directions request failed");
                RouteError::Unavailable(e)
            })?;

        if steps.is_empty() {
            return Err(RouteError::Unavailable(MapboxError::NoRoute(
                "route contained no steps".to_string(),
            )));
        }

        debug!(waypoints = waypoints.len(), steps = steps.len(), "fetched route");
        Ok(steps)
    }
}
