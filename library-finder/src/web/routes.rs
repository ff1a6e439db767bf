//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::domain::Coordinate;
use crate::finder::FindError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/postcode/:postcode/count/:count", get(nearest_to_postcode))
        .route(
            "/latitude/:latitude/longitude/:longitude/count/:count",
            get(nearest_to_coordinate),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Cache size and age.
async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let status = state
        .finder
        .status()
        .map_err(|e| AppError::from(FindError::from(e)))?;
    Ok(Json(StatusResponse::from(status)))
}

/// Nearest libraries to a postcode.
async fn nearest_to_postcode(
    State(state): State<AppState>,
    Path((postcode, count)): Path<(String, String)>,
) -> Result<Json<NearestLibrariesResponse>, AppError> {
    let count = parse_count(&count)?;

    let found = state.finder.resolve_postcode(&postcode, count).await?;
    if found.libraries.is_empty() {
        return Err(AppError::no_libraries());
    }

    Ok(Json(NearestLibrariesResponse::new(
        Some(found.postcode.to_string()),
        found.location,
        &found.libraries,
    )))
}

/// Nearest libraries to a latitude/longitude pair.
async fn nearest_to_coordinate(
    State(state): State<AppState>,
    Path((latitude, longitude, count)): Path<(String, String, String)>,
) -> Result<Json<NearestLibrariesResponse>, AppError> {
    let location = parse_coordinate(&latitude, &longitude)?;
    let count = parse_count(&count)?;

    let libraries = state.finder.resolve_nearest(location, count).await?;
    if libraries.is_empty() {
        return Err(AppError::no_libraries());
    }

    Ok(Json(NearestLibrariesResponse::new(None, location, &libraries)))
}

/// Parse a library count; it must be a positive integer.
fn parse_count(raw: &str) -> Result<usize, AppError> {
    let bad = || AppError::BadRequest {
        message: format!("Invalid count: {raw} (must be a positive integer)"),
    };

    let count: i64 = raw.trim().parse().map_err(|_| bad())?;
    if count <= 0 {
        return Err(bad());
    }
    usize::try_from(count).map_err(|_| bad())
}

/// Parse and range-check a coordinate from path segments.
fn parse_coordinate(latitude: &str, longitude: &str) -> Result<Coordinate, AppError> {
    let parse = |raw: &str, what: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| AppError::BadRequest {
                message: format!("Invalid {what}: {raw}"),
            })
    };

    let latitude = parse(latitude, "latitude")?;
    let longitude = parse(longitude, "longitude")?;

    Coordinate::new(latitude, longitude).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl AppError {
    fn no_libraries() -> Self {
        AppError::NotFound {
            message: "No libraries found".to_string(),
        }
    }
}

impl From<FindError> for AppError {
    fn from(e: FindError) -> Self {
        let message = e.to_string();
        match e {
            FindError::InvalidInput(_) => AppError::BadRequest { message },
            FindError::Geocode(_) => AppError::BadGateway { message },
            FindError::NoData(_) => AppError::ServiceUnavailable { message },
            FindError::Store(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::ServiceUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
