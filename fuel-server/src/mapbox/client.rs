//! Mapbox HTTP client.
//!
//! Provides async methods for the Directions and reverse Geocoding APIs and
//! converts their responses to domain types. Retries and rate limiting are
//! applied by the callers in `pipeline`, not here.

use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::domain::{Coordinate, RouteStep};
use crate::pipeline::{Directions, Geocoder};

use super::convert::{ConversionError, flatten_route, region_name};
use super::error::MapboxError;
use super::types::{DirectionsResponse, GeocodeResponse};

/// Default base URL for the Mapbox APIs.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Mapbox client.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Access token for authentication
    pub access_token: String,
    /// Base URL for the API (defaults to production Mapbox)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Mapbox API client.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MapboxClient {
    /// Create a new Mapbox client with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    /// Get a driving route through the waypoints, flattened to steps.
    pub async fn driving_steps(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteStep>, MapboxError> {
        let url = format!(
            "{}/directions/v5/mapbox/driving/{}",
            self.base_url,
            join_waypoints(waypoints)
        );

        let query = [
            ("steps", "true"),
            ("geometries", "geojson"),
            ("overview", "false"),
            ("access_token", self.access_token.as_str()),
        ];

        let response: DirectionsResponse = match self.get_json(&url, &query).await {
            // Directions reports unroutable input as 422 with a JSON body.
            Err(MapboxError::Status { status: 422, message }) => {
                return Err(MapboxError::NoRoute(message));
            }
            other => other?,
        };

        flatten_route(&response).map_err(|e| match e {
            ConversionError::NoRoute(message) => MapboxError::NoRoute(message),
            other => MapboxError::Json {
                message: other.to_string(),
                body: None,
            },
        })
    }

    /// Get the name of the region (state/province) enclosing a coordinate.
    ///
    /// Returns `Ok(None)` when Mapbox knows no region there (e.g. at sea).
    pub async fn region_at(&self, coord: Coordinate) -> Result<Option<String>, MapboxError> {
        let url = format!("{}/geocoding/v5/mapbox.places/{}.json", self.base_url, coord);

        let query = [
            ("types", "region"),
            ("limit", "1"),
            ("access_token", self.access_token.as_str()),
        ];

        let response: GeocodeResponse = self.get_json(&url, &query).await?;
        Ok(region_name(&response))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MapboxError> {
        trace!(url, "mapbox request");

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MapboxError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapboxError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MapboxError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

/// Directions API path segment: `lon,lat;lon,lat;...`.
fn join_waypoints(waypoints: &[Coordinate]) -> String {
    waypoints
        .iter()
        .map(Coordinate::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

impl Geocoder for MapboxClient {
    fn administrative_area(
        &self,
        coord: Coordinate,
    ) -> impl Future<Output = Result<Option<String>, MapboxError>> + Send {
        self.region_at(coord)
    }
}

impl Directions for MapboxClient {
    fn driving_route(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<RouteStep>, MapboxError>> + Send {
        self.driving_steps(waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = MapboxConfig::new("pk.test")
            .with_base_url("http://localhost:8080")
            .with_timeout(5);

        assert_eq!(config.access_token, "pk.test");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = MapboxConfig::new("pk.test");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation() {
        let client = MapboxClient::new(MapboxConfig::new("pk.test").with_base_url("http://x/"));
        assert_eq!(client.unwrap().base_url, "http://x");
    }

    #[test]
    fn waypoint_path() {
        let waypoints = [
            Coordinate::new(-122.42, 37.77).unwrap(),
            Coordinate::new(-118.24, 34.05).unwrap(),
        ];
        assert_eq!(join_waypoints(&waypoints), "-122.42,37.77;-118.24,34.05");
    }

    // Live API tests need a real token and network access; they belong
    // behind #[ignore] and are not part of the default suite.
}
