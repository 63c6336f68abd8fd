//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies Sailthru API reachability (and that the configured credentials
/// are accepted) before returning OK.
/// Returns 503 Service Unavailable if the API is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.sailthru().settings().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
