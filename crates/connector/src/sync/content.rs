//! Content payload assembly.
//!
//! Builds the catalog entry for a product snapshot. Unlike the purchase
//! path, assembly here is fallible: a snapshot without a price or a URL
//! path cannot become a content entry, and the caller decides what a
//! failure means (the webhook logs and skips).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use sailbridge_core::{ProductId, StoreId, minor_units};

use crate::config::{StoreLink, StoreUrls};
use crate::magento::types::{Product, ProductKind};
use crate::sync::eligibility::{is_variant, should_sync_product};
use crate::sync::split_keywords;
use crate::sync::types::{ContentContext, ContentPayload, ImageSet, ImageUrl};
use crate::sync::vars::project_vars;

/// Media path segment for platform-generated thumbnails.
const THUMBNAIL_CACHE_SEGMENT: &str = "catalog/product/cache/product_listing_thumbnail";

/// Media path segment for original product images.
const IMAGE_SEGMENT: &str = "catalog/product";

/// Session-id query fragments the platform appends to generated URLs.
static SESSION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?SID=(.*?)(?:[@:*]|$)").expect("session id pattern"));

/// HTML tags, for flattening descriptions to plain text.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Why a snapshot could not become a content entry.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// No store view to resolve URLs against.
    #[error("product {product_id} has no store scope to resolve URLs against")]
    MissingStoreScope {
        /// Product the snapshot describes.
        product_id: ProductId,
    },

    /// The resolved store view has no configured URL roots.
    #[error("store {store_id} has no configured URL roots")]
    UnknownStore {
        /// Store view that was resolved.
        store_id: StoreId,
    },

    /// Neither an explicit nor a final price is present.
    #[error("product {product_id} has no usable price")]
    MissingPrice {
        /// Product the snapshot describes.
        product_id: ProductId,
    },

    /// The snapshot carries no URL path for the product (or, for a
    /// variant, for its parent).
    #[error("product {product_id} has no URL path in its snapshot")]
    MissingUrlPath {
        /// Product the snapshot describes.
        product_id: ProductId,
    },

    /// A URL could not be assembled from the configured roots.
    #[error("failed to build a product URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Assemble the content payload for a product snapshot.
///
/// Resolves eligibility first: an ineligible product is `Ok(None)`, which
/// callers report as a skip rather than a failure.
///
/// # Errors
///
/// Returns [`AssemblyError`] when the snapshot is missing the data a
/// catalog entry cannot exist without.
pub fn build_content(
    product: &Product,
    ctx: ContentContext<'_>,
) -> Result<Option<ContentPayload>, AssemblyError> {
    if !should_sync_product(product, ctx.scope) {
        return Ok(None);
    }

    let store_id = ctx
        .requested_store
        .or_else(|| product.store_ids.first().copied())
        .ok_or(AssemblyError::MissingStoreScope {
            product_id: product.id,
        })?;
    let link = ctx
        .stores
        .get(store_id)
        .ok_or(AssemblyError::UnknownStore { store_id })?;

    let variant = is_variant(product);
    let url = if variant {
        variant_url(product, link)?
    } else {
        canonical_url(product, link)?
    };

    let price = product
        .price
        .filter(|price| !price.is_zero())
        .or(product.final_price)
        .ok_or(AssemblyError::MissingPrice {
            product_id: product.id,
        })?;

    let tags = {
        let keywords = split_keywords(product.meta_keywords.as_deref());
        if keywords.is_empty() {
            product.categories.clone()
        } else {
            keywords
        }
    };

    let mut vars = project_vars(&product.attributes);
    for (key, value) in explicit_vars(product, store_id, variant) {
        vars.insert(key, value);
    }

    Ok(Some(ContentPayload {
        url,
        title: escape_html(&product.name),
        spider: 0,
        price: minor_units(price),
        description: strip_tags(product.description.as_deref().unwrap_or_default()),
        tags,
        images: images(product, link),
        vars,
        inventory: variant.then_some(product.stock_qty).flatten(),
    }))
}

/// Canonical product URL: store base plus the snapshot's rewrite path,
/// with any session-id fragment stripped.
fn canonical_url(product: &Product, link: &StoreLink) -> Result<String, AssemblyError> {
    let path = product
        .request_path
        .as_deref()
        .ok_or(AssemblyError::MissingUrlPath {
            product_id: product.id,
        })?;
    let url = link.base_url.join(path)?;
    Ok(strip_session_id(url.as_str()))
}

/// Variant URL: the parent's canonical URL with the variant SKU as the
/// fragment, so one catalog page carries every variant entry.
fn variant_url(product: &Product, link: &StoreLink) -> Result<String, AssemblyError> {
    let parent_path =
        product
            .parent_request_path
            .as_deref()
            .ok_or(AssemblyError::MissingUrlPath {
                product_id: product.id,
            })?;
    let parent_url = link.base_url.join(parent_path)?;
    Ok(format!(
        "{}#{}",
        strip_session_id(parent_url.as_str()),
        urlencoding::encode(&product.sku)
    ))
}

fn strip_session_id(url: &str) -> String {
    SESSION_ID.replace_all(url, "").into_owned()
}

/// Thumbnail and full-size image URLs.
///
/// The platform's image accessor returns a path with its own leading
/// slash, so both URLs are assembled by hand instead of joined.
fn images(product: &Product, link: &StoreLink) -> ImageSet {
    let Some(image) = product.image.as_deref().filter(|image| !image.is_empty()) else {
        return ImageSet::default();
    };

    ImageSet {
        thumb: Some(ImageUrl {
            url: media_url(&link.media_base_url, THUMBNAIL_CACHE_SEGMENT, image),
        }),
        full: Some(ImageUrl {
            url: media_url(&link.media_base_url, IMAGE_SEGMENT, image),
        }),
    }
}

fn media_url(media_base: &Url, segment: &str, image: &str) -> String {
    let separator = if image.starts_with('/') { "" } else { "/" };
    format!("{media_base}{segment}{separator}{image}")
}

/// First-class commerce vars. These take precedence over projected
/// attributes with the same key.
fn explicit_vars(product: &Product, store_id: StoreId, variant: bool) -> Map<String, Value> {
    let master = product.kind == ProductKind::Configurable;
    let mut vars = Map::new();

    vars.insert("isMaster".to_owned(), flag(master));
    vars.insert("isVariant".to_owned(), flag(variant));
    vars.insert("sku".to_owned(), Value::String(product.sku.clone()));
    vars.insert("weight".to_owned(), json_or_null(&product.weight));
    vars.insert("storeId".to_owned(), Value::from(store_id.as_i64()));
    vars.insert(
        "typeId".to_owned(),
        Value::String(product.kind.as_str().to_owned()),
    );
    vars.insert("status".to_owned(), json_or_null(&product.status));
    vars.insert(
        "categories".to_owned(),
        serde_json::to_value(&product.categories).unwrap_or(Value::Null),
    );
    vars.insert(
        "websiteIds".to_owned(),
        serde_json::to_value(&product.website_ids).unwrap_or(Value::Null),
    );
    vars.insert(
        "storeIds".to_owned(),
        serde_json::to_value(&product.store_ids).unwrap_or(Value::Null),
    );
    vars.insert(
        "price".to_owned(),
        Value::from(minor_units(product.price.unwrap_or_default())),
    );
    vars.insert("specialPrice".to_owned(), json_or_null(&product.special_price));
    vars.insert(
        "specialFromDate".to_owned(),
        json_or_null(&product.special_from_date),
    );
    vars.insert(
        "specialToDate".to_owned(),
        json_or_null(&product.special_to_date),
    );
    vars.insert(
        "relatedProductIds".to_owned(),
        serde_json::to_value(&product.related_ids).unwrap_or(Value::Null),
    );
    vars.insert(
        "upSellProductIds".to_owned(),
        serde_json::to_value(&product.up_sell_ids).unwrap_or(Value::Null),
    );
    vars.insert(
        "crossSellProductIds".to_owned(),
        serde_json::to_value(&product.cross_sell_ids).unwrap_or(Value::Null),
    );
    vars.insert("isConfigurable".to_owned(), flag(master));
    vars.insert("isSalable".to_owned(), flag(product.is_salable));
    vars.insert("isVirtual".to_owned(), flag(product.kind.is_virtual()));
    vars.insert("isInStock".to_owned(), flag(product.is_in_stock));
    vars.insert("isVisible".to_owned(), flag(product.is_visible));

    if let [parent] = product.parent_ids.as_slice() {
        vars.insert("parentID".to_owned(), Value::from(parent.as_i64()));
    }

    vars
}

/// Boolean vars ride the wire as 0/1, matching what downstream templates
/// already match against.
fn flag(value: bool) -> Value {
    Value::from(i32::from(value))
}

fn json_or_null<T: serde::Serialize>(value: &Option<T>) -> Value {
    value
        .as_ref()
        .and_then(|inner| serde_json::to_value(inner).ok())
        .unwrap_or(Value::Null)
}

/// Minimal HTML escaping for titles, covering the characters the platform
/// itself escapes.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn strip_tags(input: &str) -> String {
    HTML_TAG.replace_all(input, "").into_owned()
}
