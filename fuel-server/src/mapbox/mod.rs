//! Mapbox Directions and Geocoding client.
//!
//! This module provides an HTTP client for the two Mapbox APIs the trip
//! estimator depends on:
//! - Directions (`driving` profile) returns a route as legs of steps, each
//!   with a distance in meters and a geometry
//! - Reverse geocoding with `types=region` returns the state/province
//!   enclosing a coordinate
//!
//! Both APIs authenticate with an `access_token` query parameter.

mod client;
mod convert;
mod error;
mod types;

pub use client::{MapboxClient, MapboxConfig};
pub use convert::{ConversionError, flatten_route, region_name};
pub use error::MapboxError;
pub use types::{
    DirectionsResponse, GeocodeFeature, GeocodeResponse, Leg, Maneuver, Route, Step,
    StepGeometry,
};
