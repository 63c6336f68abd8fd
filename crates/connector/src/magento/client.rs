//! Magento REST client.
//!
//! The connector is almost entirely one-directional, but the confirmation
//! flow has to tell the platform when the marketing API has delivered the
//! order email so the platform's own mailer stays suppressed.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use sailbridge_core::OrderId;

use crate::config::MagentoConfig;

/// Errors that can occur when talking to the platform's REST API.
#[derive(Debug, Error)]
pub enum MagentoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a request.
    #[error("Request error: {0}")]
    Request(String),
}

/// Magento REST client.
#[derive(Clone)]
pub struct MagentoClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MagentoClient {
    /// Create a new Magento REST client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MagentoConfig) -> Result<Self, MagentoError> {
        let mut headers = HeaderMap::new();

        // Integration token auth
        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MagentoError::Request(format!("Invalid API token format: {e}")))?,
        );

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Record on the platform that the order confirmation email went out.
    ///
    /// The plugin exposes this endpoint; flipping the flag stops the
    /// platform's own mailer from sending a duplicate confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers with a
    /// non-success status.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_email_sent(&self, order_id: OrderId) -> Result<(), MagentoError> {
        let url = self
            .base_url
            .join(&format!("rest/V1/sailbridge/orders/{order_id}/email-sent"))
            .map_err(|e| MagentoError::Request(e.to_string()))?;

        let response = self.client.put(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MagentoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
