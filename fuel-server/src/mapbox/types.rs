//! Mapbox API response DTOs.
//!
//! Only the fields the estimator reads are modelled; everything else in the
//! responses is ignored during deserialization.

use serde::Deserialize;

/// Response from the Directions API.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    /// Error description, present when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A route between all requested waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Total distance in meters.
    pub distance: Option<f64>,

    /// One leg per consecutive waypoint pair.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Travel between two consecutive waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A single manoeuvre along a leg.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Distance in meters.
    pub distance: f64,

    /// Step geometry; present when requested with `geometries=geojson`.
    pub geometry: Option<StepGeometry>,

    /// The manoeuvre that starts this step.
    pub maneuver: Maneuver,
}

/// GeoJSON line geometry of a step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepGeometry {
    /// `[lon, lat]` positions.
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// Manoeuvre metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Maneuver {
    /// `[lon, lat]` where the manoeuvre happens.
    pub location: [f64; 2],
}

/// Response from the reverse Geocoding API.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

/// A place feature.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    /// Place types, e.g. `["region"]` or `["place"]`.
    #[serde(default)]
    pub place_type: Vec<String>,

    /// Short place name, e.g. `"California"`.
    pub text: String,

    /// Fully qualified name, e.g. `"California, United States"`.
    pub place_name: Option<String>,
}
