//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the caller. Route handlers that surface failures return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::magento::MagentoError;
use crate::sailthru::SailthruError;

/// Application-level error type for the connector.
///
/// Both variants are upstream failures; the webhook caller only learns that
/// the sync did not land, never why.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sailthru API operation failed.
    #[error("Sailthru error: {0}")]
    Sailthru(#[from] SailthruError),

    /// Platform REST API operation failed.
    #[error("Magento error: {0}")]
    Magento(#[from] MagentoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose upstream error details to the webhook caller
        (StatusCode::BAD_GATEWAY, "Upstream service error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
