//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from API/IO errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Longitude or latitude outside the valid range
    #[error("invalid coordinate {lon},{lat}: {reason}")]
    InvalidCoordinate {
        lon: f64,
        lat: f64,
        reason: &'static str,
    },

    /// Coordinate text could not be parsed
    #[error("malformed coordinate pair: {0:?}")]
    MalformedCoordinate(String),

    /// A route needs an origin and a destination
    #[error("at least 2 waypoints are required, got {0}")]
    TooFewWaypoints(usize),

    /// Region code not in the pricing-region set
    #[error("unknown region code: {0}")]
    UnknownRegionCode(String),
}
