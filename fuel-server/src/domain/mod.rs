//! Domain types for the trip fuel-cost estimator.
//!
//! These types represent validated geographic and route data. Coordinates
//! enforce their ranges at construction time, so code that receives them
//! can trust their validity.

mod catalog;
mod coord;
mod error;
mod region;
mod step;

pub use catalog::RegionCatalog;
pub use coord::Coordinate;
pub use error::DomainError;
pub use region::RegionId;
pub use step::{RouteStep, Segment};
