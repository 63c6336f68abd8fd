//! Integration tests for the health endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sailbridge_connector::routes;
use sailbridge_integration_tests::{test_config, test_state};

fn app(config: sailbridge_connector::config::ConnectorConfig) -> Router {
    routes::routes().with_state(test_state(config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_answers_ok_without_dependencies() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_readiness_reflects_the_marketing_api() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domain": "example.com"})))
        .mount(&sailthru)
        .await;

    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(get("/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_on_rejected_credentials() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    // Credential rejections come back 200 with the error key.
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": 3, "errormsg": "Bad key"})),
        )
        .mount(&sailthru)
        .await;

    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(get("/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
