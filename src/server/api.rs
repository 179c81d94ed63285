//! REST API handlers
//!
//! This module defines the routes and handlers of the schedule API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::crawler::Transport;
use crate::error::{Error, FailureSignal};
use crate::models::Source;
use crate::schedule::ScheduleRequest;
use crate::utils::error::ValidationError;

use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Machine-readable failure kind
    pub kind: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(kind: FailureSignal, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind: kind.as_str(),
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Directory sources that were built, e.g. `s_group`
    pub sources: Vec<String>,
}

/// Engine error on its way to an HTTP client
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.signal() {
            FailureSignal::InvalidRole | FailureSignal::UnknownEntity => StatusCode::BAD_REQUEST,
            FailureSignal::NetworkUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            FailureSignal::UpstreamFormatError => StatusCode::BAD_GATEWAY,
        }
    }
}

impl<E: Into<Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Rejected request");
        }

        let body = ErrorResponse::new(self.0.signal(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router<T: Transport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        // Health endpoints
        .route("/api/health", get(health_check::<T>))
        // Schedule endpoints
        .route("/kitis/api", post(get_schedule::<T>))
        .route("/kitis/api/", post(get_schedule::<T>))
        .route("/kitis/ping", get(ping::<T>))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check<T: Transport + 'static>(State(state): State<AppState<T>>) -> impl IntoResponse {
    let sources = state
        .service
        .directory()
        .available()
        .map(|s: Source| s.key())
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sources,
    })
}

/// Projected schedule of one entity
async fn get_schedule<T: Transport + 'static>(
    State(state): State<AppState<T>>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|e| ValidationError::MalformedRequest(e.body_text()))?;

    tracing::info!(role = %request.role, entity = %request.entity, "Schedule request");
    let schedule = state.service.get_schedule(&request).await?;

    Ok((StatusCode::OK, Json(schedule)).into_response())
}

/// Ping the upstream host
async fn ping<T: Transport + 'static>(State(state): State<AppState<T>>) -> Result<Response, ApiError> {
    let report = state.service.ping().await?;
    Ok(Json(report).into_response())
}
