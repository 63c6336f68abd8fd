//! HTTP route handlers for the connector.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (probes the Sailthru API)
//!
//! # Webhooks (called by the platform extension)
//! POST /webhooks/orders/save    - Order state change -> purchase sync
//! POST /webhooks/orders/confirm - Order confirmation -> purchase sync + template send
//! POST /webhooks/products/save  - Product save -> content sync
//! ```

pub mod health;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the webhook routes router.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/save", post(webhooks::order_save))
        .route("/orders/confirm", post(webhooks::order_confirm))
        .route("/products/save", post(webhooks::product_save))
}

/// Create all routes for the connector.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Webhook routes
        .nest("/webhooks", webhook_routes())
}
