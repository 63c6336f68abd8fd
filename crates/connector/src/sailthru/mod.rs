//! Sailthru API client.
//!
//! One convention dominates this API: a response body containing an `error`
//! key is a failure, regardless of the HTTP status code. Every call funnels
//! through [`SailthruClient::interpret_body`], which applies that rule once.

use core::fmt;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use sailbridge_core::Email;

use crate::config::SailthruConfig;
use crate::sync::types::{ContentPayload, PurchasePayload};

/// Response key that marks a failed call.
const ERROR_KEY: &str = "error";

/// Banner returned by a successful credential probe.
const VALIDATED_MESSAGE: &str = "Successfully Validated!";

/// Errors that can occur when interacting with the Sailthru API.
#[derive(Debug, Error)]
pub enum SailthruError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status and no readable body.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered, but the body carries the error key.
    #[error("Sailthru rejected the request: {0}")]
    Rejected(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failed to build a request.
    #[error("Request error: {0}")]
    Request(String),
}

/// Which pipeline produced a purchase dispatch. Used as the logging tag so
/// remote failures can be traced back to the triggering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// Checkout confirmation pipeline.
    PlaceOrder,
    /// Order state-change pipeline.
    OrderSave,
    /// Catalog save pipeline.
    SaveProduct,
}

impl SyncEvent {
    /// Event tag shared with the platform plugin's vocabulary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlaceOrder => "placeOrder",
            Self::OrderSave => "orderSave",
            Self::SaveProduct => "saveProduct",
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API endpoints the connector talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Purchase,
    Content,
    Settings,
    User,
    Template,
}

impl Endpoint {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Content => "content",
            Self::Settings => "settings",
            Self::User => "user",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sailthru API client.
#[derive(Clone)]
pub struct SailthruClient {
    client: reqwest::Client,
    api_url: Url,
    api_key: SecretString,
    api_secret: SecretString,
}

impl SailthruClient {
    /// Create a new Sailthru API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SailthruConfig) -> Result<Self, SailthruError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    /// Send a purchase payload.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    #[tracing::instrument(skip(self, payload), fields(event = %event))]
    pub async fn purchase(
        &self,
        event: SyncEvent,
        payload: &PurchasePayload,
    ) -> Result<Value, SailthruError> {
        self.post(Endpoint::Purchase, payload).await
    }

    /// Push a content payload into the product catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    #[tracing::instrument(skip(self, payload), fields(event = %SyncEvent::SaveProduct))]
    pub async fn content(&self, payload: &ContentPayload) -> Result<Value, SailthruError> {
        self.post(Endpoint::Content, payload).await
    }

    /// Fetch account settings. Doubles as the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    #[tracing::instrument(skip(self))]
    pub async fn settings(&self) -> Result<Value, SailthruError> {
        self.get(Endpoint::Settings).await
    }

    /// Probe the configured credentials against the live API.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are rejected or the API is
    /// unreachable.
    pub async fn validate(&self) -> Result<&'static str, SailthruError> {
        self.settings().await?;
        Ok(VALIDATED_MESSAGE)
    }

    /// Fetch the marketing cookie for a user profile, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    /// A profile without a cookie is `Ok(None)`.
    #[tracing::instrument(skip(self, email))]
    pub async fn user_cookie(&self, email: &Email) -> Result<Option<String>, SailthruError> {
        let body = serde_json::json!({
            "id": email.as_str(),
            "fields": { "keys": 1 },
        });

        let response = self.post(Endpoint::User, &body).await?;
        Ok(response
            .pointer("/keys/cookie")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned))
    }

    /// List the names of the account's transactional templates.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    #[tracing::instrument(skip(self))]
    pub async fn templates(&self) -> Result<Vec<String>, SailthruError> {
        let response = self.get(Endpoint::Template).await?;

        let names = response
            .get("templates")
            .and_then(Value::as_array)
            .map(|templates| {
                templates
                    .iter()
                    .filter_map(|template| template.get("name").and_then(Value::as_str))
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(names)
    }

    async fn post<B>(&self, endpoint: Endpoint, body: &B) -> Result<Value, SailthruError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .post(url)
            .basic_auth(
                self.api_key.expose_secret(),
                Some(self.api_secret.expose_secret()),
            )
            .json(body)
            .send()
            .await?;

        Self::interpret(endpoint, response).await
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, SailthruError> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .get(url)
            .basic_auth(
                self.api_key.expose_secret(),
                Some(self.api_secret.expose_secret()),
            )
            .send()
            .await?;

        Self::interpret(endpoint, response).await
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, SailthruError> {
        self.api_url
            .join(endpoint.as_str())
            .map_err(|e| SailthruError::Request(e.to_string()))
    }

    async fn interpret(
        endpoint: Endpoint,
        response: reqwest::Response,
    ) -> Result<Value, SailthruError> {
        let status = response.status();
        let text = response.text().await?;
        Self::interpret_body(endpoint, status, &text)
    }

    /// Apply the API's response convention: a body containing the error key
    /// is a failure, whatever the HTTP status says.
    fn interpret_body(
        endpoint: Endpoint,
        status: StatusCode,
        text: &str,
    ) -> Result<Value, SailthruError> {
        let Ok(body) = serde_json::from_str::<Value>(text) else {
            if status.is_success() {
                return Err(SailthruError::Parse(format!(
                    "non-JSON response from {endpoint}: {text}"
                )));
            }
            return Err(SailthruError::Api {
                status: status.as_u16(),
                message: text.to_owned(),
            });
        };

        if let Some(error) = body.get(ERROR_KEY) {
            let message = body
                .get("errormsg")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), ToOwned::to_owned);
            return Err(SailthruError::Rejected(message));
        }

        if !status.is_success() {
            return Err(SailthruError::Api {
                status: status.as_u16(),
                message: text.to_owned(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(api_url: &str) -> SailthruClient {
        let config = SailthruConfig {
            api_url: Url::parse(api_url).unwrap(),
            api_key: SecretString::from("test-key"),
            api_secret: SecretString::from("test-secret"),
        };
        SailthruClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_requests_carry_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .and(header(
                "Authorization",
                "Basic dGVzdC1rZXk6dGVzdC1zZWNyZXQ=",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri()).settings().await.unwrap();
    }

    #[tokio::test]
    async fn test_user_cookie_reads_the_profile_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"keys": {"cookie": "ck_1"}})),
            )
            .mount(&server)
            .await;

        let email = Email::parse("jane@example.com").unwrap();
        let cookie = test_client(&server.uri()).user_cookie(&email).await.unwrap();
        assert_eq!(cookie.as_deref(), Some("ck_1"));
    }

    #[tokio::test]
    async fn test_user_cookie_absent_when_profile_has_no_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let email = Email::parse("jane@example.com").unwrap();
        let cookie = test_client(&server.uri()).user_cookie(&email).await.unwrap();
        assert_eq!(cookie, None);
    }

    #[tokio::test]
    async fn test_templates_lists_account_template_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/template"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "templates": [
                    {"name": "welcome", "template_id": 1},
                    {"name": "order-confirmation", "template_id": 2}
                ]
            })))
            .mount(&server)
            .await;

        let names = test_client(&server.uri()).templates().await.unwrap();
        assert_eq!(names, vec!["welcome", "order-confirmation"]);
    }

    #[tokio::test]
    async fn test_validate_reports_the_banner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domain": "x"})))
            .mount(&server)
            .await;

        let message = test_client(&server.uri()).validate().await.unwrap();
        assert_eq!(message, VALIDATED_MESSAGE);
    }

    #[test]
    fn test_error_key_fails_even_on_http_success() {
        let result =
            SailthruClient::interpret_body(Endpoint::Purchase, StatusCode::OK, r#"{"error":99}"#);
        assert!(matches!(result, Err(SailthruError::Rejected(_))));
    }

    #[test]
    fn test_error_key_includes_remote_message() {
        let result = SailthruClient::interpret_body(
            Endpoint::Purchase,
            StatusCode::OK,
            r#"{"error":14,"errormsg":"Unknown template"}"#,
        );
        match result {
            Err(SailthruError::Rejected(message)) => assert_eq!(message, "Unknown template"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_success_body_passes_through() {
        let result = SailthruClient::interpret_body(
            Endpoint::Settings,
            StatusCode::OK,
            r#"{"domain":"example.com"}"#,
        );
        assert_eq!(result.unwrap()["domain"], "example.com");
    }

    #[test]
    fn test_error_key_wins_over_error_status() {
        // The error key is the API's own verdict; prefer it to the transport's.
        let result = SailthruClient::interpret_body(
            Endpoint::Content,
            StatusCode::BAD_REQUEST,
            r#"{"error":99,"errormsg":"Invalid URL"}"#,
        );
        assert!(matches!(result, Err(SailthruError::Rejected(_))));
    }

    #[test]
    fn test_non_json_error_status_maps_to_api_error() {
        let result = SailthruClient::interpret_body(
            Endpoint::Settings,
            StatusCode::BAD_GATEWAY,
            "upstream unavailable",
        );
        assert!(matches!(
            result,
            Err(SailthruError::Api { status: 502, .. })
        ));
    }

    #[test]
    fn test_non_json_success_is_a_parse_error() {
        let result =
            SailthruClient::interpret_body(Endpoint::Settings, StatusCode::OK, "<html></html>");
        assert!(matches!(result, Err(SailthruError::Parse(_))));
    }

    #[test]
    fn test_event_tags() {
        assert_eq!(SyncEvent::PlaceOrder.as_str(), "placeOrder");
        assert_eq!(SyncEvent::OrderSave.as_str(), "orderSave");
        assert_eq!(SyncEvent::SaveProduct.as_str(), "saveProduct");
    }
}
