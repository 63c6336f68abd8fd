//! Sync backfill commands.
//!
//! Replays entity snapshots (JSON files in the webhook body shape) through
//! the same engine the connector runs, so a missed webhook or a fresh
//! Sailthru account can be caught up from exported data.
//!
//! # Usage
//!
//! ```bash
//! # Backfill a product
//! sb-cli sync product fixtures/product.json --store 1
//!
//! # Backfill an order
//! sb-cli sync order fixtures/order.json
//! ```
//!
//! # Environment Variables
//!
//! Same as the connector: `SAILTHRU_API_KEY`/`SAILTHRU_API_SECRET`, the
//! `SYNC_*` flags, and `STORE_<id>_*` URLs (products only).

use std::path::Path;

use thiserror::Error;

use sailbridge_connector::config::{ConfigError, SailthruConfig, StoreUrls, SyncConfig};
use sailbridge_connector::magento::types::{Order, Product};
use sailbridge_connector::sailthru::{SailthruClient, SailthruError, SyncEvent};
use sailbridge_connector::sync::types::{ContentContext, PurchaseContext};
use sailbridge_connector::sync::{AssemblyError, build_content, build_purchase};
use sailbridge_core::StoreId;

/// Errors that can occur during a backfill.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot file could not be read.
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON for the expected shape.
    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// Content payload could not be assembled.
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Sailthru API call failed.
    #[error("Sailthru error: {0}")]
    Sailthru(#[from] SailthruError),
}

/// Backfill one product snapshot into the content library.
///
/// Runs the same eligibility gate as the webhook: a product outside the
/// configured scope is reported and skipped, not forced through.
///
/// # Errors
///
/// Returns `SyncError` if the snapshot cannot be read or assembled, or the
/// dispatch fails.
pub async fn product(path: &Path, store: Option<i64>) -> Result<(), SyncError> {
    dotenvy::dotenv().ok();

    let sailthru_config = SailthruConfig::from_env()?;
    let sync_config = SyncConfig::from_env()?;
    let stores = StoreUrls::from_env()?;
    let client = SailthruClient::new(&sailthru_config)?;

    let raw = std::fs::read_to_string(path)?;
    let product: Product = serde_json::from_str(&raw)?;

    let ctx = ContentContext {
        scope: sync_config.scope(),
        requested_store: store.map(StoreId::new),
        stores: &stores,
    };

    let Some(payload) = build_content(&product, ctx)? else {
        tracing::warn!(sku = %product.sku, "Product is not eligible under the configured scope");
        return Ok(());
    };

    tracing::info!(sku = %product.sku, url = %payload.url, "Syncing product...");
    client.content(&payload).await?;
    tracing::info!(sku = %product.sku, "Product synced");

    Ok(())
}

/// Backfill one order snapshot into the purchase log.
///
/// The purchase is stamped with the order's original creation date so the
/// purchase history stays in order, and no template is attached (the
/// confirmation email was sent long ago).
///
/// # Errors
///
/// Returns `SyncError` if the snapshot cannot be read or the dispatch fails.
pub async fn order(path: &Path) -> Result<(), SyncError> {
    dotenvy::dotenv().ok();

    let sailthru_config = SailthruConfig::from_env()?;
    let sync_config = SyncConfig::from_env()?;
    let client = SailthruClient::new(&sailthru_config)?;

    let raw = std::fs::read_to_string(path)?;
    let order: Order = serde_json::from_str(&raw)?;

    let ctx = PurchaseContext {
        order_id_format: sync_config.save_order_id_format,
        message_id: None,
        send_template: None,
        purchase_date: Some(order.created_at),
    };
    let payload = build_purchase(&order, &ctx);

    tracing::info!(increment_id = %order.increment_id, "Syncing order...");
    client.purchase(SyncEvent::OrderSave, &payload).await?;
    tracing::info!(increment_id = %order.increment_id, "Order synced");

    Ok(())
}
