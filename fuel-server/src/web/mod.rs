//! Web layer for the trip fuel-cost estimator.
//!
//! Provides HTTP endpoints for estimating trip fuel cost.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, MapboxTripEstimator};
