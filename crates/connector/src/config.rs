//! Connector configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SAILTHRU_API_KEY` - Sailthru API key
//! - `SAILTHRU_API_SECRET` - Sailthru API secret
//! - `MAGENTO_BASE_URL` - Base URL of the platform's REST API
//! - `MAGENTO_API_TOKEN` - Integration token for the platform's REST API
//! - `STORE_<id>_BASE_URL` - Storefront URL root per store view (at least one)
//! - `STORE_<id>_MEDIA_URL` - Media URL root per store view (one per base URL)
//!
//! ## Optional
//! - `CONNECTOR_HOST` - Bind address (default: 127.0.0.1)
//! - `CONNECTOR_PORT` - Listen port (default: 3100)
//! - `SAILTHRU_API_URL` - API root override, for test rigs (default: <https://api.sailthru.com/>)
//! - `SYNC_MASTERS` - Sync configurable master products (default: false)
//! - `SYNC_VARIANTS` - Sync variant products (default: false)
//! - `PRODUCT_SYNC_ENABLED` - Master switch for the product webhook (default: true)
//! - `ORDER_TEMPLATE` - Transactional template for order confirmations
//! - `ORDER_ID_FORMAT_SAVE` - `prefixed` or `plain` (default: prefixed)
//! - `ORDER_ID_FORMAT_CONFIRM` - `prefixed` or `plain` (default: plain)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: development)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use sailbridge_core::StoreId;

use crate::sync::eligibility::SyncScope;
use crate::sync::types::OrderIdFormat;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connector application configuration.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sailthru API configuration
    pub sailthru: SailthruConfig,
    /// Platform REST API configuration
    pub magento: MagentoConfig,
    /// Sync behaviour flags
    pub sync: SyncConfig,
    /// Storefront URL roots per store view
    pub stores: StoreUrls,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Sailthru API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct SailthruConfig {
    /// API root. Overridable so test rigs can stand in for the live API.
    pub api_url: Url,
    /// API key
    pub api_key: SecretString,
    /// API secret
    pub api_secret: SecretString,
}

impl std::fmt::Debug for SailthruConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SailthruConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Platform REST API configuration.
///
/// Implements `Debug` manually to redact the integration token.
#[derive(Clone)]
pub struct MagentoConfig {
    /// Base URL of the platform's REST API
    pub base_url: Url,
    /// Integration token
    pub api_token: SecretString,
}

impl std::fmt::Debug for MagentoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagentoConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Sync behaviour flags.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Sync configurable master products
    pub masters: bool,
    /// Sync variant products
    pub variants: bool,
    /// Master switch for the product webhook
    pub products_enabled: bool,
    /// Transactional template for order confirmations
    pub order_template: Option<String>,
    /// Order id rendering for the state-change pipeline
    pub save_order_id_format: OrderIdFormat,
    /// Order id rendering for the confirmation pipeline
    pub confirm_order_id_format: OrderIdFormat,
}

impl SyncConfig {
    /// The product scope these flags describe.
    #[must_use]
    pub const fn scope(&self) -> SyncScope {
        SyncScope {
            masters: self.masters,
            variants: self.variants,
        }
    }
}

/// Storefront URL roots per store view.
#[derive(Debug, Clone, Default)]
pub struct StoreUrls {
    links: HashMap<StoreId, StoreLink>,
}

impl StoreUrls {
    /// URL roots for a store view, if configured.
    #[must_use]
    pub fn get(&self, store_id: StoreId) -> Option<&StoreLink> {
        self.links.get(&store_id)
    }

    /// Number of configured store views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no store views are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Collect `STORE_<id>_BASE_URL` / `STORE_<id>_MEDIA_URL` pairs.
    ///
    /// Non-numeric `STORE_*` variables are ignored; a base URL without its
    /// media URL is an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no store is configured, a media URL is
    /// missing, or a URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut links = HashMap::new();

        for (key, value) in std::env::vars() {
            let Some(rest) = key.strip_prefix("STORE_") else {
                continue;
            };
            let Some(id_text) = rest.strip_suffix("_BASE_URL") else {
                continue;
            };
            let Ok(id) = id_text.parse::<i64>() else {
                continue;
            };

            let base_url = parse_url(&key, &value)?;
            let media_key = format!("STORE_{id_text}_MEDIA_URL");
            let media_url = parse_url(&media_key, &get_required_env(&media_key)?)?;

            links.insert(StoreId::new(id), StoreLink::new(base_url, media_url));
        }

        if links.is_empty() {
            return Err(ConfigError::MissingEnvVar("STORE_<id>_BASE_URL".to_owned()));
        }

        Ok(Self { links })
    }
}

impl FromIterator<(StoreId, StoreLink)> for StoreUrls {
    fn from_iter<I: IntoIterator<Item = (StoreId, StoreLink)>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

/// URL roots for one store view.
#[derive(Debug, Clone)]
pub struct StoreLink {
    /// Storefront URL root, with a trailing slash.
    pub base_url: Url,
    /// Media URL root, with a trailing slash.
    pub media_base_url: Url,
}

impl StoreLink {
    /// Build a store link, normalising both roots to end in a slash so
    /// path joins behave.
    #[must_use]
    pub fn new(base_url: Url, media_base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            media_base_url: with_trailing_slash(media_base_url),
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CONNECTOR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CONNECTOR_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("CONNECTOR_PORT", "3100")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CONNECTOR_PORT".to_owned(), e.to_string()))?;

        let sailthru = SailthruConfig::from_env()?;
        let magento = MagentoConfig::from_env()?;
        let sync = SyncConfig::from_env()?;
        let stores = StoreUrls::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            sailthru,
            magento,
            sync,
            stores,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SailthruConfig {
    /// Load the Sailthru section alone, for tools that only talk to the API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key or secret is missing, or the API URL
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_url(
            "SAILTHRU_API_URL",
            &get_env_or_default("SAILTHRU_API_URL", "https://api.sailthru.com/"),
        )?;

        Ok(Self {
            api_url: with_trailing_slash(api_url),
            api_key: get_required_secret("SAILTHRU_API_KEY")?,
            api_secret: get_required_secret("SAILTHRU_API_SECRET")?,
        })
    }
}

impl MagentoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url("MAGENTO_BASE_URL", &get_required_env("MAGENTO_BASE_URL")?)?;

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            api_token: get_required_secret("MAGENTO_API_TOKEN")?,
        })
    }
}

impl SyncConfig {
    /// Load the sync flags alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a flag or format value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            masters: get_bool_env("SYNC_MASTERS", false)?,
            variants: get_bool_env("SYNC_VARIANTS", false)?,
            products_enabled: get_bool_env("PRODUCT_SYNC_ENABLED", true)?,
            order_template: get_optional_env("ORDER_TEMPLATE"),
            save_order_id_format: get_format_env("ORDER_ID_FORMAT_SAVE", OrderIdFormat::Prefixed)?,
            confirm_order_id_format: get_format_env(
                "ORDER_ID_FORMAT_CONFIRM",
                OrderIdFormat::Plain,
            )?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a boolean environment variable with a default value.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => match value.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_owned(),
                format!("expected true or false, got {other}"),
            )),
        },
    }
}

/// Get an order id format with a default value.
fn get_format_env(key: &str, default: OrderIdFormat) -> Result<OrderIdFormat, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => value
            .parse()
            .map_err(|e: String| ConfigError::InvalidEnvVar(key.to_owned(), e)),
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Joining relative paths onto a URL drops the last path segment unless
/// the base ends in a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://shop.example/rest").unwrap());
        assert_eq!(url.as_str(), "https://shop.example/rest/");

        let url = with_trailing_slash(Url::parse("https://shop.example/rest/").unwrap());
        assert_eq!(url.as_str(), "https://shop.example/rest/");

        let url = with_trailing_slash(Url::parse("https://shop.example").unwrap());
        assert_eq!(url.as_str(), "https://shop.example/");
    }

    #[test]
    fn test_store_link_normalises_roots() {
        let link = StoreLink::new(
            Url::parse("https://shop.example").unwrap(),
            Url::parse("https://shop.example/media").unwrap(),
        );
        assert_eq!(link.base_url.as_str(), "https://shop.example/");
        assert_eq!(link.media_base_url.as_str(), "https://shop.example/media/");
    }

    #[test]
    fn test_store_urls_lookup() {
        let stores: StoreUrls = [(
            StoreId::new(1),
            StoreLink::new(
                Url::parse("https://shop.example/").unwrap(),
                Url::parse("https://shop.example/media/").unwrap(),
            ),
        )]
        .into_iter()
        .collect();

        assert_eq!(stores.len(), 1);
        assert!(stores.get(StoreId::new(1)).is_some());
        assert!(stores.get(StoreId::new(2)).is_none());
    }

    #[test]
    fn test_sync_config_scope() {
        let sync = SyncConfig {
            masters: true,
            variants: false,
            products_enabled: true,
            order_template: None,
            save_order_id_format: OrderIdFormat::Prefixed,
            confirm_order_id_format: OrderIdFormat::Plain,
        };
        assert_eq!(
            sync.scope(),
            SyncScope {
                masters: true,
                variants: false
            }
        );
    }

    #[test]
    fn test_get_bool_env_defaults_when_unset() {
        assert!(get_bool_env("SAILBRIDGE_TEST_UNSET_FLAG", true).unwrap());
        assert!(!get_bool_env("SAILBRIDGE_TEST_UNSET_FLAG", false).unwrap());
    }
}
