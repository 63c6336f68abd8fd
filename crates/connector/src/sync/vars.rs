//! Attribute projection.
//!
//! Product snapshots carry the platform's full attribute bag. Most of it is
//! merchandising data worth forwarding as vars; a fixed set of keys is
//! platform plumbing (layout hints, media bookkeeping, tax wiring) that
//! must never leak into the marketing profile.

use serde_json::{Map, Value};

use crate::magento::types::AttrMap;

/// Attribute codes that never become vars.
///
/// Shared by every projection site so the two sync paths cannot drift.
pub const EXCLUDED_ATTRIBUTES: &[&str] = &[
    "status",
    "row_id",
    "type_id",
    "attribute_set_id",
    "media_gallery",
    "thumbnail",
    "shipment_type",
    "url_key",
    "price_view",
    "msrp_display_actual_price_type",
    "page_layout",
    "options_container",
    "custom_design",
    "custom_layout",
    "gift_message_available",
    "category_ids",
    "image",
    "small_image",
    "visibility",
    "related_product_ids",
    "up_sell_product_ids",
    "description",
    "meta_keyword",
    "name",
    "created_at",
    "updated_at",
    "tax_class_id",
    "quantity_and_stock_status",
    "sku",
];

/// Project an attribute bag into vars, dropping excluded keys.
///
/// Value shapes pass through unchanged; only the key set is filtered.
#[must_use]
pub fn project_vars(attributes: &AttrMap) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|(code, _)| !EXCLUDED_ATTRIBUTES.contains(&code.as_str()))
        .map(|(code, value)| {
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            (code.clone(), value)
        })
        .collect()
}
