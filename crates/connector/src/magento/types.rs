//! Inbound snapshot types for the platform webhook plugin.
//!
//! The plugin serialises the entities it intercepts and posts them here.
//! These types mirror the platform's vocabulary (snake_case attribute codes,
//! entity and increment ids) without reaching back into it: every decision
//! the connector makes is made from these snapshots alone.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sailbridge_core::{OrderId, ProductId, StoreId, WebsiteId};

// =============================================================================
// Product Types
// =============================================================================

/// Product type identifiers used by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Standalone sellable product, or a variant when it has parents.
    Simple,
    /// Parent product whose variants carry the sellable SKUs.
    Configurable,
    /// Fixed or dynamic bundle of other products.
    Bundle,
    /// Display grouping of other products.
    Grouped,
    /// Product with no physical shipment.
    Virtual,
    /// Digital product delivered as a download.
    Downloadable,
}

impl ProductKind {
    /// The platform's type code for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Configurable => "configurable",
            Self::Bundle => "bundle",
            Self::Grouped => "grouped",
            Self::Virtual => "virtual",
            Self::Downloadable => "downloadable",
        }
    }

    /// Whether products of this kind ship nothing physical.
    #[must_use]
    pub const fn is_virtual(self) -> bool {
        matches!(self, Self::Virtual | Self::Downloadable)
    }
}

impl core::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamic attribute value in a product snapshot.
///
/// Platform attribute bags are loosely typed. This closed union covers the
/// shapes that actually appear so projection stays exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value (also covers select/option ids).
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Free-form text.
    Text(String),
    /// Multi-valued attribute.
    List(Vec<AttrValue>),
    /// Explicitly unset attribute.
    Null,
}

/// Attribute bag keyed by the platform's attribute codes.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// A product snapshot.
///
/// Identity and type are required; everything else is optional because the
/// plugin sends whatever the triggering save happened to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Platform entity id.
    pub id: ProductId,
    /// Stock keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Product type identifier.
    #[serde(rename = "type_id")]
    pub kind: ProductKind,
    /// Enabled/disabled status code (1 enabled, 2 disabled).
    #[serde(default)]
    pub status: Option<i64>,
    /// Whether the product can currently be sold.
    #[serde(default)]
    pub is_salable: bool,
    /// Whether the product is in stock.
    #[serde(default)]
    pub is_in_stock: bool,
    /// Whether the product is visible in catalog or search.
    #[serde(default)]
    pub is_visible: bool,
    /// Catalog price in major units. Zero or absent means "derive from the
    /// final price".
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Final price after catalog rules, from the platform's price info.
    #[serde(default)]
    pub final_price: Option<Decimal>,
    /// Promotional price, if one is configured.
    #[serde(default)]
    pub special_price: Option<Decimal>,
    /// Start of the promotional price window, platform-formatted.
    #[serde(default)]
    pub special_from_date: Option<String>,
    /// End of the promotional price window, platform-formatted.
    #[serde(default)]
    pub special_to_date: Option<String>,
    /// Shipping weight.
    #[serde(default)]
    pub weight: Option<Decimal>,
    /// Raw HTML description.
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated keyword list.
    #[serde(default)]
    pub meta_keywords: Option<String>,
    /// Rewrite path of the product's canonical URL, e.g. `blue-tee.html`.
    #[serde(default)]
    pub request_path: Option<String>,
    /// Rewrite path of the first configurable parent, sent with variants.
    #[serde(default)]
    pub parent_request_path: Option<String>,
    /// Base image path under the media root, e.g. `/b/l/blue-tee.jpg`.
    #[serde(default)]
    pub image: Option<String>,
    /// Units in stock. The plugin sends this for variant snapshots.
    #[serde(default)]
    pub stock_qty: Option<i64>,
    /// Names of the categories the product belongs to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Websites the product is assigned to.
    #[serde(default)]
    pub website_ids: Vec<WebsiteId>,
    /// Store views the product is assigned to.
    #[serde(default)]
    pub store_ids: Vec<StoreId>,
    /// Configurable parents of this product, when it is a variant.
    #[serde(default)]
    pub parent_ids: Vec<ProductId>,
    /// Related products.
    #[serde(default)]
    pub related_ids: Vec<ProductId>,
    /// Up-sell products.
    #[serde(default)]
    pub up_sell_ids: Vec<ProductId>,
    /// Cross-sell products.
    #[serde(default)]
    pub cross_sell_ids: Vec<ProductId>,
    /// Remaining attribute bag, keyed by attribute code.
    #[serde(default)]
    pub attributes: AttrMap,
}

// =============================================================================
// Order Types
// =============================================================================

/// Payment captured on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Human-readable payment method label, e.g. the card network.
    #[serde(default)]
    pub method_label: Option<String>,
    /// Amount ordered in major units.
    #[serde(default)]
    pub amount_ordered: Decimal,
}

/// One selected option on a configurable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Attribute label, e.g. `Color`.
    pub label: String,
    /// Selected value, e.g. `Blue`.
    pub value: String,
}

/// Options captured on a configurable order item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemOptions {
    /// SKU of the concrete simple product that was purchased.
    #[serde(default)]
    pub simple_sku: Option<String>,
    /// Name of the concrete simple product.
    #[serde(default)]
    pub simple_name: Option<String>,
    /// Selected configurable attributes.
    #[serde(default)]
    pub attributes_info: Vec<SelectedOption>,
}

/// One row of an order's item tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product entity id for this row.
    pub product_id: ProductId,
    /// Product type of this row.
    pub product_type: ProductKind,
    /// SKU as captured on the order.
    pub sku: String,
    /// Display name as captured on the order.
    pub name: String,
    /// Unit price in major units.
    #[serde(default)]
    pub price: Decimal,
    /// Quantity ordered.
    #[serde(default)]
    pub qty_ordered: i64,
    /// Product id of the parent row, when this row is a child.
    #[serde(default)]
    pub parent_product_id: Option<ProductId>,
    /// Canonical product URL resolved by the plugin. For configurable rows
    /// this is the purchased variant's URL.
    #[serde(default)]
    pub product_url: Option<String>,
    /// Absolute image URL for the row's product.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Comma-separated keyword list for the row's product.
    #[serde(default)]
    pub meta_keywords: Option<String>,
    /// Configurable option data for this row.
    #[serde(default)]
    pub options: Option<ItemOptions>,
}

/// An order snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Platform entity id.
    pub id: OrderId,
    /// Human-facing order number, e.g. `100000123`.
    pub increment_id: String,
    /// Customer email the order was placed under.
    pub customer_email: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Store view the order was placed in.
    pub store_id: StoreId,
    /// Whether the platform already sent the order confirmation email.
    #[serde(default)]
    pub email_sent: bool,
    /// Shipping total in major units.
    #[serde(default)]
    pub shipping_amount: Decimal,
    /// Discount total in major units. The platform usually reports this as
    /// a negative number, but positive values show up in the wild.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Tax total in major units.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Rows of the order's item tree, as the platform reports them.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Payment captured on the order.
    #[serde(default)]
    pub payment: Option<Payment>,
}

// =============================================================================
// Webhook Envelopes
// =============================================================================

/// Body of the order webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// The order snapshot.
    pub order: Order,
    /// Marketing cookie captured from the shopper's browser, if any.
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Body of the product webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEvent {
    /// The product snapshot.
    pub product: Product,
    /// Store view scope requested for this sync, if any.
    #[serde(default)]
    pub store_id: Option<StoreId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_kind_uses_platform_type_codes() {
        let kind: ProductKind = serde_json::from_str("\"configurable\"").unwrap();
        assert_eq!(kind, ProductKind::Configurable);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"configurable\"");
    }

    #[test]
    fn test_virtual_kinds() {
        assert!(ProductKind::Virtual.is_virtual());
        assert!(ProductKind::Downloadable.is_virtual());
        assert!(!ProductKind::Simple.is_virtual());
        assert!(!ProductKind::Bundle.is_virtual());
    }

    #[test]
    fn test_product_deserialises_with_sparse_fields() {
        let json = serde_json::json!({
            "id": 42,
            "sku": "WS12-M-Blue",
            "name": "Blue Tee",
            "type_id": "simple"
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id.as_i64(), 42);
        assert_eq!(product.kind, ProductKind::Simple);
        assert!(product.price.is_none());
        assert!(product.store_ids.is_empty());
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_attribute_bag_accepts_mixed_value_shapes() {
        let json = serde_json::json!({
            "id": 7,
            "sku": "SKU-7",
            "name": "Mixed",
            "type_id": "simple",
            "attributes": {
                "activity": "Running",
                "climate": ["Cool", "Mild"],
                "eco_collection": true,
                "sort_order": 3,
                "rating": 4.5,
                "pattern": null
            }
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(
            product.attributes.get("activity"),
            Some(&AttrValue::Text("Running".to_owned()))
        );
        assert_eq!(
            product.attributes.get("eco_collection"),
            Some(&AttrValue::Bool(true))
        );
        assert_eq!(product.attributes.get("sort_order"), Some(&AttrValue::Int(3)));
        assert_eq!(product.attributes.get("pattern"), Some(&AttrValue::Null));
        assert!(matches!(
            product.attributes.get("climate"),
            Some(AttrValue::List(values)) if values.len() == 2
        ));
    }

    #[test]
    fn test_order_event_deserialises() {
        let json = serde_json::json!({
            "order": {
                "id": 900,
                "increment_id": "100000123",
                "customer_email": "jane@example.com",
                "created_at": "2024-03-01T12:00:00Z",
                "store_id": 1,
                "shipping_amount": "5.00",
                "discount_amount": "-10.00",
                "tax_amount": "1.25",
                "items": [],
            },
            "message_id": "bid.123"
        });

        let event: OrderEvent = serde_json::from_value(json).unwrap();
        assert_eq!(event.order.increment_id, "100000123");
        assert_eq!(event.order.shipping_amount, Decimal::new(500, 2));
        assert_eq!(event.message_id.as_deref(), Some("bid.123"));
        assert!(!event.order.email_sent);
    }

    #[test]
    fn test_order_amounts_accept_bare_numbers() {
        let json = serde_json::json!({
            "id": 901,
            "increment_id": "100000124",
            "customer_email": "jane@example.com",
            "created_at": "2024-03-01T12:00:00Z",
            "store_id": 1,
            "shipping_amount": 5.0,
            "tax_amount": 1.25
        });

        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.shipping_amount, Decimal::new(5, 0));
        assert_eq!(order.tax_amount, Decimal::new(125, 2));
        assert_eq!(order.discount_amount, Decimal::ZERO);
    }
}
