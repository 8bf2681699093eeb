//! Route steps and per-region segments.

use serde::Serialize;

use super::coord::Coordinate;
use super::region::RegionId;

/// One manoeuvre of a driving route.
///
/// Steps are kept in travel order: legs in order, steps within a leg in
/// order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStep {
    /// Distance covered by the step, in meters.
    pub distance_meters: f64,

    /// Where the step ends.
    pub end: Coordinate,
}

impl RouteStep {
    pub fn new(distance_meters: f64, end: Coordinate) -> Self {
        Self {
            distance_meters,
            end,
        }
    }
}

/// A maximal run of consecutive steps in the same region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub region: RegionId,
    pub distance_meters: f64,
}

impl Segment {
    pub fn new(region: RegionId, distance_meters: f64) -> Self {
        Self {
            region,
            distance_meters,
        }
    }
}
