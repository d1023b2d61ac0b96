//! Health endpoint and fallback.

use axum::{extract::State, http::StatusCode, response::Json};
use opsdeck_tools::HealthSummary;

use crate::runtime::{HttpRuntime, error::ErrorResponse};

/// GET /health - component counts and trace fill level
pub async fn health_check(State(runtime): State<HttpRuntime>) -> Json<HealthSummary> {
    Json(runtime.dispatcher().health())
}

/// Any route the router does not know.
pub async fn not_found() -> ErrorResponse {
    ErrorResponse::new(StatusCode::NOT_FOUND, "not found")
}
