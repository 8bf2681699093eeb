//! Conversion from Mapbox DTOs to domain types.

use crate::domain::{Coordinate, DomainError, RouteStep};

use super::types::{DirectionsResponse, GeocodeResponse, Step};

/// Place type Mapbox assigns to states and provinces.
const REGION_PLACE_TYPE: &str = "region";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The response carried no usable route
    #[error("no route: {0}")]
    NoRoute(String),

    /// A step position was not a valid coordinate
    #[error("invalid step coordinate: {0}")]
    InvalidCoordinate(#[from] DomainError),
}

/// Flatten the first route's legs and steps into one travel-ordered sequence.
///
/// Each step keeps its distance verbatim. The end coordinate is the last
/// position of the step geometry, falling back to the manoeuvre location
/// when no geometry was returned.
pub fn flatten_route(response: &DirectionsResponse) -> Result<Vec<RouteStep>, ConversionError> {
    if response.code != "Ok" {
        return Err(ConversionError::NoRoute(
            response
                .message
                .clone()
                .unwrap_or_else(|| response.code.clone()),
        ));
    }

    let route = response
        .routes
        .first()
        .ok_or_else(|| ConversionError::NoRoute("response contained no routes".to_string()))?;

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(convert_step)
        .collect::<Result<Vec<_>, _>>()?;

    if steps.is_empty() {
        return Err(ConversionError::NoRoute(
            "route contained no steps".to_string(),
        ));
    }

    Ok(steps)
}

fn convert_step(step: &Step) -> Result<RouteStep, ConversionError> {
    let [lon, lat] = step
        .geometry
        .as_ref()
        .and_then(|g| g.coordinates.last().copied())
        .unwrap_or(step.maneuver.location);

    Ok(RouteStep::new(step.distance, Coordinate::new(lon, lat)?))
}

/// Name of the region-level feature in a reverse geocode response, if any.
pub fn region_name(response: &GeocodeResponse) -> Option<String> {
    response
        .features
        .iter()
        .find(|f| f.place_type.iter().any(|t| t == REGION_PLACE_TYPE))
        .map(|f| f.text.clone())
}
