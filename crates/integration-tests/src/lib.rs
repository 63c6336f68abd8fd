//! Shared fixtures for Sailbridge integration tests.
//!
//! Builders here produce the shapes the platform plugin posts, so the
//! `tests/` suites can drive the full webhook -> engine -> dispatch path
//! against mock servers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sailbridge-integration-tests
//! ```
//!
//! All remote endpoints are wiremock servers; no credentials or network
//! access are needed.

// Test-support crate: fixture builders panic on malformed literals.
#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use sailbridge_connector::config::{
    ConnectorConfig, MagentoConfig, SailthruConfig, StoreLink, StoreUrls, SyncConfig,
};
use sailbridge_connector::magento::types::{
    AttrMap, AttrValue, ItemOptions, Order, OrderItem, Payment, Product, ProductKind,
    SelectedOption,
};
use sailbridge_connector::state::AppState;
use sailbridge_connector::sync::types::OrderIdFormat;
use sailbridge_core::{OrderId, ProductId, StoreId, WebsiteId};

/// Connector configuration pointing both API clients at the given mock
/// servers. Store view 1 is configured with shop/media URL roots.
#[must_use]
pub fn test_config(sailthru_url: &str, magento_url: &str) -> ConnectorConfig {
    let stores: StoreUrls = [(
        StoreId::new(1),
        StoreLink::new(
            Url::parse("https://shop.example/").unwrap(),
            Url::parse("https://media.shop.example/").unwrap(),
        ),
    )]
    .into_iter()
    .collect();

    ConnectorConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        sailthru: SailthruConfig {
            api_url: Url::parse(sailthru_url).unwrap(),
            api_key: SecretString::from("test-key"),
            api_secret: SecretString::from("test-secret"),
        },
        magento: MagentoConfig {
            base_url: Url::parse(magento_url).unwrap(),
            api_token: SecretString::from("test-token"),
        },
        sync: SyncConfig {
            masters: false,
            variants: false,
            products_enabled: true,
            order_template: None,
            save_order_id_format: OrderIdFormat::Prefixed,
            confirm_order_id_format: OrderIdFormat::Plain,
        },
        stores,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Application state over [`test_config`]-style configuration.
#[must_use]
pub fn test_state(config: ConnectorConfig) -> AppState {
    AppState::new(config).unwrap()
}

// =============================================================================
// Order Fixtures
// =============================================================================

/// An order with one standalone row, one configurable pair, and the
/// adjustment amounts 12.50 / 20.00 / 3.00.
///
/// Flattening yields two line items: `MUG-BLUE` and the variant
/// `TEE-RED-L` (the configurable child row is suppressed).
#[must_use]
pub fn sample_order() -> Order {
    Order {
        id: OrderId::new(42),
        increment_id: "100000017".to_owned(),
        customer_email: "jane@example.com".to_owned(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap(),
        store_id: StoreId::new(1),
        email_sent: false,
        shipping_amount: Decimal::new(1250, 2),
        discount_amount: Decimal::new(2000, 2),
        tax_amount: Decimal::new(300, 2),
        items: vec![standalone_item(), configurable_item(), configurable_child()],
        payment: Some(Payment {
            method_label: Some("Visa".to_owned()),
            amount_ordered: Decimal::new(5050, 2),
        }),
    }
}

/// Standalone simple row: `MUG-BLUE`, 15.00 x 2.
#[must_use]
pub fn standalone_item() -> OrderItem {
    OrderItem {
        product_id: ProductId::new(101),
        product_type: ProductKind::Simple,
        sku: "MUG-BLUE".to_owned(),
        name: "Blue Mug".to_owned(),
        price: Decimal::new(1500, 2),
        qty_ordered: 2,
        parent_product_id: None,
        product_url: Some("https://shop.example/drinkware/blue-mug".to_owned()),
        image_url: Some(
            "https://media.shop.example/catalog/product/b/l/blue-mug.jpg".to_owned(),
        ),
        meta_keywords: Some("mug,ceramic".to_owned()),
        options: None,
    }
}

/// Configurable row standing in for the purchased variant `TEE-RED-L`.
#[must_use]
pub fn configurable_item() -> OrderItem {
    OrderItem {
        product_id: ProductId::new(7),
        product_type: ProductKind::Configurable,
        sku: "TEE".to_owned(),
        name: "Logo Tee".to_owned(),
        price: Decimal::new(2200, 2),
        qty_ordered: 1,
        parent_product_id: None,
        product_url: Some("https://shop.example/apparel/logo-tee#TEE-RED-L".to_owned()),
        image_url: None,
        meta_keywords: None,
        options: Some(ItemOptions {
            simple_sku: Some("TEE-RED-L".to_owned()),
            simple_name: Some("Logo Tee Red L".to_owned()),
            attributes_info: vec![
                SelectedOption {
                    label: "Color".to_owned(),
                    value: "Red".to_owned(),
                },
                SelectedOption {
                    label: "Size".to_owned(),
                    value: "L".to_owned(),
                },
            ],
        }),
    }
}

/// Child row of [`configurable_item`]; flattening must suppress it.
#[must_use]
pub fn configurable_child() -> OrderItem {
    OrderItem {
        product_id: ProductId::new(71),
        product_type: ProductKind::Simple,
        sku: "TEE-RED-L".to_owned(),
        name: "Logo Tee Red L".to_owned(),
        price: Decimal::ZERO,
        qty_ordered: 1,
        parent_product_id: Some(ProductId::new(7)),
        product_url: None,
        image_url: None,
        meta_keywords: None,
        options: None,
    }
}

// =============================================================================
// Product Fixtures
// =============================================================================

/// A product with only the required fields set.
#[must_use]
pub fn bare_product(id: i64, sku: &str, kind: ProductKind) -> Product {
    Product {
        id: ProductId::new(id),
        sku: sku.to_owned(),
        name: sku.to_owned(),
        kind,
        status: None,
        is_salable: false,
        is_in_stock: false,
        is_visible: false,
        price: None,
        final_price: None,
        special_price: None,
        special_from_date: None,
        special_to_date: None,
        weight: None,
        description: None,
        meta_keywords: None,
        request_path: None,
        parent_request_path: None,
        image: None,
        stock_qty: None,
        categories: Vec::new(),
        website_ids: Vec::new(),
        store_ids: Vec::new(),
        parent_ids: Vec::new(),
        related_ids: Vec::new(),
        up_sell_ids: Vec::new(),
        cross_sell_ids: Vec::new(),
        attributes: AttrMap::new(),
    }
}

/// A fully-populated standalone simple product on store view 1.
#[must_use]
pub fn sample_product() -> Product {
    let mut product = bare_product(101, "MUG-BLUE", ProductKind::Simple);
    product.name = "Blue Mug".to_owned();
    product.status = Some(1);
    product.is_salable = true;
    product.is_in_stock = true;
    product.is_visible = true;
    product.price = Some(Decimal::new(1500, 2));
    product.final_price = Some(Decimal::new(1350, 2));
    product.weight = Some(Decimal::new(45, 2));
    product.description = Some("<p>A sturdy <b>blue</b> mug.</p>".to_owned());
    product.meta_keywords = Some("mug,ceramic".to_owned());
    product.request_path = Some("drinkware/blue-mug".to_owned());
    product.image = Some("/b/l/blue-mug.jpg".to_owned());
    product.categories = vec!["Drinkware".to_owned()];
    product.website_ids = vec![WebsiteId::new(1)];
    product.store_ids = vec![StoreId::new(1)];
    product
        .attributes
        .insert("material".to_owned(), AttrValue::Text("Ceramic".to_owned()));
    product
}

/// A variant (parented simple) of configurable product 7, with stock.
#[must_use]
pub fn sample_variant() -> Product {
    let mut product = bare_product(71, "TEE-RED-L", ProductKind::Simple);
    product.name = "Logo Tee Red L".to_owned();
    product.status = Some(1);
    product.is_salable = true;
    product.is_in_stock = true;
    product.price = Some(Decimal::new(2200, 2));
    product.final_price = Some(Decimal::new(2200, 2));
    product.request_path = Some("apparel/logo-tee-red-l".to_owned());
    product.parent_request_path = Some("apparel/logo-tee".to_owned());
    product.image = Some("/t/e/tee-red-l.jpg".to_owned());
    product.stock_qty = Some(8);
    product.store_ids = vec![StoreId::new(1)];
    product.parent_ids = vec![ProductId::new(7)];
    product
}

/// The configurable master product over [`sample_variant`].
#[must_use]
pub fn sample_master() -> Product {
    let mut product = bare_product(7, "TEE", ProductKind::Configurable);
    product.name = "Logo Tee".to_owned();
    product.status = Some(1);
    product.is_salable = true;
    product.is_visible = true;
    product.price = Some(Decimal::new(2200, 2));
    product.final_price = Some(Decimal::new(2200, 2));
    product.request_path = Some("apparel/logo-tee".to_owned());
    product.image = Some("/t/e/tee.jpg".to_owned());
    product.store_ids = vec![StoreId::new(1)];
    product
}
