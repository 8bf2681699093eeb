//! Segment pricing.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{RegionId, Segment};

/// Meters to statute miles.
pub const MILES_PER_METER: f64 = 0.000_621_371_192_24;

/// Fuel price lookup per region and date.
///
/// Implementations are deterministic: the same region and date always
/// give the same price.
pub trait PriceEstimator: Send + Sync {
    /// Price per unit of fuel in `region` on `date`.
    fn price(&self, region: RegionId, date: NaiveDate) -> Result<f64, PriceError>;
}

/// Error from a price estimator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceError {
    /// No model exists for the region
    #[error("no price model for region {0}")]
    NoModel(RegionId),

    /// The model produced a negative or non-finite price
    #[error("invalid price {price} for region {region}")]
    InvalidPrice { region: RegionId, price: f64 },
}

/// What to do with distance driven in unresolved regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Leave it unpriced and report it in `unresolved_meters`.
    #[default]
    Exclude,

    /// Fail the whole estimate.
    Fail,
}

/// Error costing a trip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CostError {
    /// Efficiency must be a positive, finite number
    #[error("vehicle efficiency must be positive, got {0}")]
    InvalidEfficiency(f64),

    /// Distance conversion factor must be a positive, finite number
    #[error("distance conversion factor must be positive, got {0}")]
    InvalidConversion(f64),

    /// The estimator could not price a region
    #[error("pricing failed: {0}")]
    Price(#[from] PriceError),

    /// Part of the route could not be placed in a region
    #[error("{distance_meters} m of the route is in an unresolved region")]
    UnresolvedRegion { distance_meters: f64 },
}

/// Cost of one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCost {
    pub region: RegionId,
    pub distance_meters: f64,
    /// `None` for unpriced (unresolved) segments.
    pub cost: Option<f64>,
}

/// Cost of a whole trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripCostResult {
    /// Sum of segment costs, rounded to cents.
    pub total_cost: f64,

    /// Per-segment breakdown in travel order, at full precision.
    pub segments: Vec<SegmentCost>,

    /// Distance left unpriced because its region is unknown.
    pub unresolved_meters: f64,
}

impl TripCostResult {
    /// Whether every segment was priced.
    pub fn is_complete(&self) -> bool {
        self.segments.iter().all(|s| s.cost.is_some())
    }
}

/// Prices segments with a per-region estimator.
#[derive(Debug, Clone)]
pub struct TripCoster<P> {
    estimator: P,
    unresolved: UnresolvedPolicy,
}

impl<P: PriceEstimator> TripCoster<P> {
    /// Create a coster that excludes unresolved distance.
    pub fn new(estimator: P) -> Self {
        Self {
            estimator,
            unresolved: UnresolvedPolicy::default(),
        }
    }

    /// Set how unresolved segments are handled.
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Price `segments` for travel on `date`.
    ///
    /// Each segment's distance is converted with `meters_to_unit` (e.g.
    /// [`MILES_PER_METER`]), divided by `efficiency` (distance per unit of
    /// fuel) and multiplied by the region's price. The estimator is asked
    /// once per distinct region.
    pub fn cost(
        &self,
        segments: &[Segment],
        date: NaiveDate,
        efficiency: f64,
        meters_to_unit: f64,
    ) -> Result<TripCostResult, CostError> {
        check_efficiency(efficiency)?;
        if !(meters_to_unit.is_finite() && meters_to_unit > 0.0) {
            return Err(CostError::InvalidConversion(meters_to_unit));
        }

        let unresolved_meters: f64 = segments
            .iter()
            .filter(|s| !s.region.is_resolved())
            .map(|s| s.distance_meters)
            .sum();

        if unresolved_meters > 0.0 && self.unresolved == UnresolvedPolicy::Fail {
            return Err(CostError::UnresolvedRegion {
                distance_meters: unresolved_meters,
            });
        }

        let mut prices: HashMap<RegionId, f64> = HashMap::new();
        let mut total = 0.0;
        let mut costed = Vec::with_capacity(segments.len());

        for segment in segments {
            let cost = if segment.region.is_resolved() {
                let price = self.price_for(&mut prices, segment.region, date)?;
                let fuel = segment.distance_meters * meters_to_unit / efficiency;
                let cost = fuel * price;
                total += cost;
                Some(cost)
            } else {
                None
            };

            costed.push(SegmentCost {
                region: segment.region,
                distance_meters: segment.distance_meters,
                cost,
            });
        }

        debug!(regions = prices.len(), segments = segments.len(), "priced segments");
        if unresolved_meters > 0.0 {
            info!(unresolved_meters, "excluded unresolved distance from trip cost");
        }

        Ok(TripCostResult {
            total_cost: round_cents(total),
            segments: costed,
            unresolved_meters,
        })
    }

    fn price_for(
        &self,
        prices: &mut HashMap<RegionId, f64>,
        region: RegionId,
        date: NaiveDate,
    ) -> Result<f64, PriceError> {
        match prices.entry(region) {
            Entry::Occupied(e) => Ok(*e.get()),
            Entry::Vacant(e) => {
                let price = self.estimator.price(region, date)?;
                if !(price.is_finite() && price >= 0.0) {
                    return Err(PriceError::InvalidPrice { region, price });
                }
                Ok(*e.insert(price))
            }
        }
    }
}

/// Reject non-positive or non-finite vehicle efficiency.
pub(crate) fn check_efficiency(efficiency: f64) -> Result<(), CostError> {
    if efficiency.is_finite() && efficiency > 0.0 {
        Ok(())
    } else {
        Err(CostError::InvalidEfficiency(efficiency))
    }
}

/// Round to 2 decimal places.
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
