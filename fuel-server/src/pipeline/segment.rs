//! Route segmentation by pricing region.
//!
//! Region lookups for the steps are independent, so they run concurrently
//! (bounded, and through the resolver's rate limiter). The results are
//! collected in step order and merged in a single sequential pass.

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::domain::{Coordinate, RegionId, RouteStep, Segment};

use super::resolver::{GeoResolver, Geocoder};

/// Error segmenting a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// There were no steps to segment
    #[error("route has no steps to segment")]
    EmptyRoute,
}

/// Merge consecutive same-region steps into segments.
///
/// `regions[i]` is the region of `steps[i]`. The output preserves travel
/// order, never has two adjacent segments in the same region, and its
/// distances sum to the step distances. `Unresolved` is merged like any
/// other region: it is never folded into a neighbouring known region.
///
/// Segment distances are partial sums, so with fractional meters the
/// segment total can differ from a flat sum of the steps in the last few
/// bits (`0.1 + (0.2 + 0.3)` is not `(0.1 + 0.2) + 0.3`). With whole
/// meters the totals are identical.
///
/// # Panics
///
/// Panics if `steps` and `regions` differ in length.
pub fn merge_steps(steps: &[RouteStep], regions: &[RegionId]) -> Vec<Segment> {
    assert_eq!(steps.len(), regions.len(), "one region is needed per step");

    let mut segments = Vec::new();
    let mut current: Option<RegionId> = None;
    let mut accumulated = 0.0;

    for (step, &region) in steps.iter().zip(regions) {
        match current {
            Some(open) if open != region => {
                segments.push(Segment::new(open, accumulated));
                accumulated = step.distance_meters;
                current = Some(region);
            }
            Some(_) => accumulated += step.distance_meters,
            None => {
                accumulated += step.distance_meters;
                current = Some(region);
            }
        }
    }

    if let Some(open) = current {
        segments.push(Segment::new(open, accumulated));
    }

    segments
}

/// Splits a route into per-region segments.
pub struct RegionSegmenter<G> {
    resolver: GeoResolver<G>,
    concurrency: usize,
}

impl<G: Geocoder> RegionSegmenter<G> {
    /// Create a segmenter resolving up to `concurrency` steps at once.
    pub fn new(resolver: GeoResolver<G>, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// Resolve every step's end point and merge into segments.
    pub async fn segment(&self, steps: &[RouteStep]) -> Result<Vec<Segment>, SegmentError> {
        if steps.is_empty() {
            return Err(SegmentError::EmptyRoute);
        }

        let ends: Vec<Coordinate> = steps.iter().map(|step| step.end).collect();

        // `buffered` yields in input order regardless of completion order.
        let regions: Vec<RegionId> = stream::iter(ends)
            .map(|end| self.resolver.resolve_region(end))
            .buffered(self.concurrency)
            .collect()
            .await;

        let segments = merge_steps(steps, &regions);

        debug!(
            steps = steps.len(),
            segments = segments.len(),
            unresolved = regions.iter().filter(|r| !r.is_resolved()).count(),
            "segmented route"
        );

        Ok(segments)
    }
}
