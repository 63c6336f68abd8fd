//! Outbound payload vocabulary for the marketing API.
//!
//! These types define the wire shapes the connector sends. Field names and
//! sentinels here are a compatibility contract: downstream templates and
//! reports already consume them, so changes ripple outside this codebase.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use sailbridge_core::StoreId;

use crate::config::StoreUrls;
use crate::sync::eligibility::SyncScope;

// =============================================================================
// Image Types
// =============================================================================

/// A single image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    /// Absolute image URL.
    pub url: String,
}

/// Image set attached to items and content.
///
/// Serialises to `{}` when no image is known; the API treats the empty
/// object as "no images".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSet {
    /// Thumbnail-sized image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<ImageUrl>,
    /// Full-sized image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<ImageUrl>,
}

impl ImageSet {
    /// Image set with only a full-size image.
    #[must_use]
    pub fn full_only(url: Option<String>) -> Self {
        Self {
            thumb: None,
            full: url.map(|url| ImageUrl { url }),
        }
    }
}

// =============================================================================
// Purchase Types
// =============================================================================

/// One flattened line item of a purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Resolved item identifier (SKU).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Unit price in integer cents.
    pub price: i64,
    /// Quantity purchased.
    pub qty: i64,
    /// Product URL, when the snapshot carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Item images.
    pub images: ImageSet,
    /// Keyword tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Selected-option vars for configurable purchases.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub vars: Map<String, Value>,
}

/// Order totals that ride along as adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdjustmentTitle {
    /// Shipping total.
    Shipping,
    /// Discount total, always non-positive on the wire.
    Discount,
    /// Tax total.
    Tax,
}

impl AdjustmentTitle {
    /// Wire name, which doubles as the order var key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Discount => "Discount",
            Self::Tax => "Tax",
        }
    }
}

impl fmt::Display for AdjustmentTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed order-level adjustment in integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjustment {
    /// Which total this adjustment represents.
    pub title: AdjustmentTitle,
    /// Amount in integer cents. Negative means money off.
    pub price: i64,
}

/// One payment tender on a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tender {
    /// Payment method label.
    pub title: String,
    /// Amount ordered in major units.
    pub price: Decimal,
}

/// Tender list with the legacy empty sentinel.
///
/// Orders without a usable payment method serialise the field as `""`
/// rather than an empty list. Downstream consumers accept the sentinel and
/// existing reports depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tenders {
    /// No usable payment method.
    Empty,
    /// One or more tenders.
    List(Vec<Tender>),
}

impl Serialize for Tenders {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::List(tenders) => tenders.serialize(serializer),
        }
    }
}

/// Purchase payload posted to the marketing API.
#[derive(Debug, Clone, Serialize)]
pub struct PurchasePayload {
    /// Customer email the purchase belongs to.
    pub email: String,
    /// Flattened line items.
    pub items: Vec<LineItem>,
    /// Order-level adjustments.
    pub adjustments: Vec<Adjustment>,
    /// Order vars: adjustment totals plus the formatted order id.
    pub vars: Map<String, Value>,
    /// Marketing cookie correlating the purchase to a browsing session.
    pub message_id: Option<String>,
    /// Payment tenders.
    pub tenders: Tenders,
    /// Transactional template to send instead of the default receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_template: Option<String>,
    /// Purchase date override for backfilled orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

// =============================================================================
// Content Types
// =============================================================================

/// Content payload pushed into the marketing API's product catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPayload {
    /// Canonical product URL; the catalog's content key.
    pub url: String,
    /// HTML-escaped product title.
    pub title: String,
    /// Always zero so the catalog does not re-crawl the URL.
    pub spider: u8,
    /// Price in integer cents.
    pub price: i64,
    /// Plain-text description.
    pub description: String,
    /// Keyword or category tags.
    pub tags: Vec<String>,
    /// Product images.
    pub images: ImageSet,
    /// Projected attribute vars plus the explicit commerce vars.
    pub vars: Map<String, Value>,
    /// Units in stock, sent for variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i64>,
}

// =============================================================================
// Assembly Contexts
// =============================================================================

/// How the order id var is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderIdFormat {
    /// `#`-prefixed human-facing increment id, e.g. `#100000123`.
    Prefixed,
    /// Plain entity id, e.g. `900`.
    Plain,
}

impl FromStr for OrderIdFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefixed" => Ok(Self::Prefixed),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown order id format: {other}")),
        }
    }
}

/// Per-dispatch inputs for purchase assembly.
#[derive(Debug, Clone)]
pub struct PurchaseContext {
    /// How the order id var is rendered.
    pub order_id_format: OrderIdFormat,
    /// Marketing cookie from the triggering session.
    pub message_id: Option<String>,
    /// Template to send for this purchase.
    pub send_template: Option<String>,
    /// Purchase date override for backfills.
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Per-dispatch inputs for content assembly.
#[derive(Debug, Clone, Copy)]
pub struct ContentContext<'a> {
    /// Which product kinds are eligible to sync.
    pub scope: SyncScope,
    /// Store view requested by the triggering save, if any.
    pub requested_store: Option<StoreId>,
    /// Store URL roots keyed by store view.
    pub stores: &'a StoreUrls,
}
