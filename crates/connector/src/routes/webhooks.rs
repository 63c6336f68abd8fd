//! Webhook route handlers.
//!
//! The platform extension posts entity snapshots here after commerce events.
//! The two order webhooks surface dispatch failures to the caller (502) so
//! the extension can log them; the product webhook always answers 200 because
//! catalog saves must never be blocked by sync failures.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use sailbridge_core::Email;

use crate::error::Result;
use crate::magento::types::{OrderEvent, ProductEvent};
use crate::sailthru::SyncEvent;
use crate::state::AppState;
use crate::sync::types::{ContentContext, PurchaseContext};
use crate::sync::{build_content, build_purchase};

/// Result of one webhook-triggered sync, returned to the caller.
#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    /// `synced`, `skipped`, or `failed`.
    pub outcome: &'static str,
    /// Reason, present for skipped and failed outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Marketing cookie for the storefront to set, when one was fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
}

impl SyncOutcome {
    fn synced() -> Self {
        Self {
            outcome: "synced",
            detail: None,
            correlation: None,
        }
    }

    fn skipped(detail: impl Into<String>) -> Self {
        Self {
            outcome: "skipped",
            detail: Some(detail.into()),
            correlation: None,
        }
    }

    fn failed(detail: impl Into<String>) -> Self {
        Self {
            outcome: "failed",
            detail: Some(detail.into()),
            correlation: None,
        }
    }

    fn with_correlation(mut self, correlation: Option<String>) -> Self {
        self.correlation = correlation;
        self
    }
}

/// Sync an order state change to the purchase log.
///
/// POST /webhooks/orders/save
///
/// # Errors
///
/// Returns a 502 if the purchase dispatch fails, so the calling extension
/// can log the failure. The extension treats webhook failures as log-only,
/// keeping the commerce flow unblocked.
#[instrument(skip(state, event), fields(order_id = %event.order.id))]
pub async fn order_save(
    State(state): State<AppState>,
    Json(event): Json<OrderEvent>,
) -> Result<Json<SyncOutcome>> {
    let ctx = PurchaseContext {
        order_id_format: state.config().sync.save_order_id_format,
        message_id: event.message_id,
        send_template: None,
        purchase_date: None,
    };
    let payload = build_purchase(&event.order, &ctx);

    state
        .sailthru()
        .purchase(SyncEvent::OrderSave, &payload)
        .await?;

    tracing::info!(increment_id = %event.order.increment_id, "Order state synced");
    Ok(Json(SyncOutcome::synced()))
}

/// Sync a confirmed order, sending the override template if configured.
///
/// POST /webhooks/orders/confirm
///
/// After a successful templated send the order is marked email-sent on the
/// platform side so the confirmation is not sent twice. When the event
/// carries no marketing cookie, one is fetched from the user profile and
/// returned so the storefront can set it.
///
/// # Errors
///
/// Returns a 502 if the purchase dispatch fails; the surrounding
/// transactional email flow must see the failure rather than silently
/// losing the confirmation.
#[instrument(skip(state, event), fields(order_id = %event.order.id))]
pub async fn order_confirm(
    State(state): State<AppState>,
    Json(event): Json<OrderEvent>,
) -> Result<Json<SyncOutcome>> {
    if event.order.email_sent {
        tracing::info!(increment_id = %event.order.increment_id, "Order already confirmed, skipping");
        return Ok(Json(SyncOutcome::skipped("order already confirmed")));
    }

    let template = state.config().sync.order_template.clone();
    let ctx = PurchaseContext {
        order_id_format: state.config().sync.confirm_order_id_format,
        message_id: event.message_id.clone(),
        send_template: template.clone(),
        purchase_date: None,
    };
    let payload = build_purchase(&event.order, &ctx);

    state
        .sailthru()
        .purchase(SyncEvent::PlaceOrder, &payload)
        .await?;

    // The override template replaces the platform's own confirmation email,
    // so record the send to keep the two from racing.
    if template.is_some() {
        if let Err(e) = state.magento().mark_email_sent(event.order.id).await {
            tracing::warn!(error = %e, "Failed to mark order email sent");
        }
    }

    let correlation = match event.message_id {
        Some(_) => None,
        None => fetch_correlation(&state, &event.order.customer_email).await,
    };

    tracing::info!(increment_id = %event.order.increment_id, "Order confirmation synced");
    Ok(Json(SyncOutcome::synced().with_correlation(correlation)))
}

/// Sync a saved product to the content library.
///
/// POST /webhooks/products/save
///
/// Always answers 200: assembly and dispatch failures are logged and
/// reported in the body, never as an HTTP error, so catalog saves are never
/// blocked by sync problems.
#[instrument(skip(state, event), fields(product_id = %event.product.id))]
pub async fn product_save(
    State(state): State<AppState>,
    Json(event): Json<ProductEvent>,
) -> Json<SyncOutcome> {
    let config = state.config();
    if !config.sync.products_enabled {
        return Json(SyncOutcome::skipped("product sync disabled"));
    }

    let ctx = ContentContext {
        scope: config.sync.scope(),
        requested_store: event.store_id,
        stores: &config.stores,
    };

    let payload = match build_content(&event.product, ctx) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::debug!(sku = %event.product.sku, "Product not eligible for sync");
            return Json(SyncOutcome::skipped("product not eligible for sync"));
        }
        Err(e) => {
            tracing::error!(error = %e, sku = %event.product.sku, "Content assembly failed");
            return Json(SyncOutcome::skipped(format!("assembly failed: {e}")));
        }
    };

    match state.sailthru().content(&payload).await {
        Ok(_) => {
            tracing::info!(sku = %event.product.sku, "Product synced");
            Json(SyncOutcome::synced())
        }
        Err(e) => {
            tracing::error!(error = %e, sku = %event.product.sku, "Content dispatch failed");
            Json(SyncOutcome::failed("content dispatch failed"))
        }
    }
}

/// Look up the marketing cookie on the user profile.
///
/// Failures only cost the correlation, never the sync, so they are logged
/// and flattened to `None`.
async fn fetch_correlation(state: &AppState, customer_email: &str) -> Option<String> {
    let email = match Email::parse(customer_email) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid customer email, skipping cookie lookup");
            return None;
        }
    };

    match state.sailthru().user_cookie(&email).await {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::warn!(error = %e, "Cookie lookup failed");
            None
        }
    }
}
