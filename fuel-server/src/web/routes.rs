//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::mapbox::MapboxError;
use crate::pipeline::{CostError, RouteError, SegmentError, TripError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict/gas", post(predict_gas))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Estimate the fuel cost of a trip.
async fn predict_gas(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GasResponse>, AppError> {
    let req: GasRequest = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {}", e),
    })?;

    let query = req.validate(state.default_mpg)?;

    let result = state
        .estimator
        .estimate_trip_cost(&query.waypoints, query.date, query.mpg)
        .await?;

    Ok(Json(GasResponse::from_result(&result)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unprocessable { message: String },
    BadGateway { message: String },
    GatewayTimeout { message: String },
    Internal { message: String },
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        let message = e.to_string();
        match e {
            TripError::Route(RouteError::TooFewWaypoints(_))
            | TripError::Cost(CostError::InvalidEfficiency(_)) => AppError::BadRequest { message },
            TripError::Route(RouteError::Unavailable(MapboxError::NoRoute(_)))
            | TripError::Segment(SegmentError::EmptyRoute)
            | TripError::Cost(CostError::UnresolvedRegion { .. }) => {
                AppError::Unprocessable { message }
            }
            TripError::Route(RouteError::Unavailable(_)) => AppError::BadGateway { message },
            TripError::Timeout(_) => AppError::GatewayTimeout { message },
            TripError::Cost(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::GatewayTimeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "request failed");
        } else {
            warn!(status = status.as_u16(), %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
