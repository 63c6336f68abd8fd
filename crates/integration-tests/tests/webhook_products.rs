//! Integration tests for the product webhook.
//!
//! The product path never surfaces an HTTP error: whatever happens during
//! assembly or dispatch, the platform gets a 200 with the outcome in the
//! body. These tests pin that contract alongside the happy path.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sailbridge_connector::magento::types::{ProductEvent, ProductKind};
use sailbridge_connector::routes;
use sailbridge_integration_tests::{
    bare_product, sample_master, sample_product, sample_variant, test_config, test_state,
};

fn app(config: sailbridge_connector::config::ConnectorConfig) -> Router {
    routes::routes().with_state(test_state(config))
}

fn post_product(event: &ProductEvent) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/products/save")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(event).unwrap()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn content_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/content")
        .map(|request| request.body_json().unwrap())
        .collect()
}

#[tokio::test]
async fn test_product_save_syncs_content() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&sailthru)
        .await;

    let event = ProductEvent {
        product: sample_product(),
        store_id: None,
    };
    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(post_product(&event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"outcome": "synced"}));

    let bodies = content_bodies(&sailthru).await;
    let body = bodies.first().unwrap();

    assert_eq!(body["url"], "https://shop.example/drinkware/blue-mug");
    assert_eq!(body["title"], "Blue Mug");
    assert_eq!(body["spider"], json!(0));
    assert_eq!(body["price"], json!(1500));
    assert_eq!(body["description"], "A sturdy blue mug.");
    assert_eq!(body["tags"], json!(["mug", "ceramic"]));
    assert_eq!(
        body["images"]["thumb"]["url"],
        "https://media.shop.example/catalog/product/cache/product_listing_thumbnail/b/l/blue-mug.jpg"
    );
    assert_eq!(
        body["images"]["full"]["url"],
        "https://media.shop.example/catalog/product/b/l/blue-mug.jpg"
    );

    assert_eq!(body["vars"]["sku"], "MUG-BLUE");
    assert_eq!(body["vars"]["typeId"], "simple");
    assert_eq!(body["vars"]["storeId"], json!(1));
    assert_eq!(body["vars"]["price"], json!(1500));
    assert_eq!(body["vars"]["isMaster"], json!(0));
    assert_eq!(body["vars"]["isVariant"], json!(0));
    assert_eq!(body["vars"]["isSalable"], json!(1));
    assert_eq!(body["vars"]["isInStock"], json!(1));
    assert_eq!(body["vars"]["categories"], json!(["Drinkware"]));
    // Projected attribute bag entry rides along.
    assert_eq!(body["vars"]["material"], "Ceramic");
    assert!(body.get("inventory").is_none());
}

#[tokio::test]
async fn test_product_save_skips_masters_by_default() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&sailthru)
        .await;

    let event = ProductEvent {
        product: sample_master(),
        store_id: None,
    };
    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(post_product(&event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({"outcome": "skipped", "detail": "product not eligible for sync"})
    );
}

#[tokio::test]
async fn test_product_save_syncs_masters_when_enabled() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sailthru)
        .await;

    let mut config = test_config(&sailthru.uri(), &magento.uri());
    config.sync.masters = true;

    let event = ProductEvent {
        product: sample_master(),
        store_id: None,
    };
    let response = app(config).oneshot(post_product(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"outcome": "synced"}));

    let bodies = content_bodies(&sailthru).await;
    let body = bodies.first().unwrap();
    assert_eq!(body["vars"]["isMaster"], json!(1));
    assert_eq!(body["vars"]["isConfigurable"], json!(1));
}

#[tokio::test]
async fn test_product_save_syncs_variants_when_enabled() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sailthru)
        .await;

    let mut config = test_config(&sailthru.uri(), &magento.uri());
    config.sync.variants = true;

    let event = ProductEvent {
        product: sample_variant(),
        store_id: None,
    };
    let response = app(config).oneshot(post_product(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"outcome": "synced"}));

    let bodies = content_bodies(&sailthru).await;
    let body = bodies.first().unwrap();

    // Variants share the parent's page, keyed by SKU fragment.
    assert_eq!(body["url"], "https://shop.example/apparel/logo-tee#TEE-RED-L");
    assert_eq!(body["inventory"], json!(8));
    assert_eq!(body["vars"]["isVariant"], json!(1));
    assert_eq!(body["vars"]["parentID"], json!(7));
}

#[tokio::test]
async fn test_product_save_assembly_failure_answers_ok() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&sailthru)
        .await;

    // Eligible, but missing a price entirely.
    let mut product = bare_product(9, "NO-PRICE", ProductKind::Simple);
    product.request_path = Some("no-price".to_owned());
    product.store_ids = vec![sailbridge_core::StoreId::new(1)];

    let event = ProductEvent {
        product,
        store_id: None,
    };
    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(post_product(&event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({
            "outcome": "skipped",
            "detail": "assembly failed: product 9 has no usable price"
        })
    );
}

#[tokio::test]
async fn test_product_save_dispatch_failure_answers_ok() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": 99})))
        .mount(&sailthru)
        .await;

    let event = ProductEvent {
        product: sample_product(),
        store_id: None,
    };
    let response = app(test_config(&sailthru.uri(), &magento.uri()))
        .oneshot(post_product(&event))
        .await
        .unwrap();

    // Catalog saves must never bounce off a sync failure.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({"outcome": "failed", "detail": "content dispatch failed"})
    );
}

#[tokio::test]
async fn test_product_save_honours_the_kill_switch() {
    let sailthru = MockServer::start().await;
    let magento = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&sailthru)
        .await;

    let mut config = test_config(&sailthru.uri(), &magento.uri());
    config.sync.products_enabled = false;

    let event = ProductEvent {
        product: sample_product(),
        store_id: None,
    };
    let response = app(config).oneshot(post_product(&event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({"outcome": "skipped", "detail": "product sync disabled"})
    );
}
