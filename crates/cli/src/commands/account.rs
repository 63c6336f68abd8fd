//! Sailthru account commands.
//!
//! # Usage
//!
//! ```bash
//! # Probe the API with the configured credentials
//! sb-cli validate
//!
//! # List transactional templates
//! sb-cli templates
//! ```
//!
//! # Environment Variables
//!
//! - `SAILTHRU_API_KEY` - Sailthru API key
//! - `SAILTHRU_API_SECRET` - Sailthru API secret
//! - `SAILTHRU_API_URL` - API root override (optional)

use thiserror::Error;

use sailbridge_connector::config::{ConfigError, SailthruConfig};
use sailbridge_connector::sailthru::{SailthruClient, SailthruError};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sailthru API call failed.
    #[error("Sailthru error: {0}")]
    Sailthru(#[from] SailthruError),
}

/// Probe the Sailthru API with the configured credentials.
///
/// Hits the settings endpoint, which fails on a bad key or secret without
/// side effects.
///
/// # Errors
///
/// Returns `AccountError` if configuration is incomplete or the API rejects
/// the credentials.
pub async fn validate() -> Result<(), AccountError> {
    dotenvy::dotenv().ok();

    let config = SailthruConfig::from_env()?;
    let client = SailthruClient::new(&config)?;

    tracing::info!("Probing Sailthru API...");
    let message = client.validate().await?;
    tracing::info!("{message}");

    Ok(())
}

/// List transactional templates on the account.
///
/// Useful when wiring `ORDER_TEMPLATE`: the value must name one of these.
///
/// # Errors
///
/// Returns `AccountError` if configuration is incomplete or the API call
/// fails.
pub async fn templates() -> Result<(), AccountError> {
    dotenvy::dotenv().ok();

    let config = SailthruConfig::from_env()?;
    let client = SailthruClient::new(&config)?;

    tracing::info!("Fetching templates...");
    let templates = client.templates().await?;

    if templates.is_empty() {
        tracing::info!("No templates found on this account");
        return Ok(());
    }

    for name in &templates {
        tracing::info!("  {name}");
    }
    tracing::info!("{} template(s)", templates.len());

    Ok(())
}
