//! Mapbox client error types.

use reqwest::StatusCode;

/// Errors from the Mapbox HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum MapboxError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing access token
    #[error("unauthorized: check MAPBOX_TOKEN")]
    Unauthorized,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Directions API found no route between the waypoints
    #[error("no route: {0}")]
    NoRoute(String),
}

impl MapboxError {
    /// Whether the failure is worth retrying.
    ///
    /// Transport failures (connect, timeout) and service-unavailable-class
    /// statuses are transient; everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            MapboxError::Http(e) => e.is_timeout() || e.is_connect(),
            MapboxError::Status { status, .. } => StatusCode::from_u16(*status)
                .map(is_transient_status)
                .unwrap_or(false),
            MapboxError::Unauthorized | MapboxError::Json { .. } | MapboxError::NoRoute(_) => {
                false
            }
        }
    }
}

/// Statuses a retry may fix.
pub(crate) fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
