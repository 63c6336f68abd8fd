//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ConnectorConfig;
use crate::magento::{MagentoClient, MagentoError};
use crate::sailthru::{SailthruClient, SailthruError};

/// Error building the shared API clients.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("sailthru client: {0}")]
    Sailthru(#[from] SailthruError),
    #[error("magento client: {0}")]
    Magento(#[from] MagentoError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConnectorConfig,
    sailthru: SailthruClient,
    magento: MagentoClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either API client fails to build.
    pub fn new(config: ConnectorConfig) -> Result<Self, StateError> {
        let sailthru = SailthruClient::new(&config.sailthru)?;
        let magento = MagentoClient::new(&config.magento)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sailthru,
                magento,
            }),
        })
    }

    /// Get a reference to the connector configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    /// Get a reference to the Sailthru API client.
    #[must_use]
    pub fn sailthru(&self) -> &SailthruClient {
        &self.inner.sailthru
    }

    /// Get a reference to the platform REST client.
    #[must_use]
    pub fn magento(&self) -> &MagentoClient {
        &self.inner.magento
    }
}
