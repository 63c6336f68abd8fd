//! Order item flattening.
//!
//! The platform reports composite purchases as multi-row trees: a
//! configurable row standing in for its purchased variant, a bundle row
//! followed by its component rows. The marketing API wants one row per
//! sellable thing, so this module collapses the tree: configurable rows
//! take their variant's identity and rows whose parent is a composite are
//! dropped.

use std::collections::HashSet;

use serde_json::{Map, Value};

use sailbridge_core::{ProductId, minor_units};

use crate::magento::types::{ItemOptions, OrderItem, ProductKind};
use crate::sync::split_keywords;
use crate::sync::types::{ImageSet, LineItem};

/// Collapse an order's item tree into purchase line items.
///
/// Emission order follows the input. Zero-quantity rows and repeated SKUs
/// pass through untouched. Rows that resolve to no identity (configurable
/// rows without recorded option data) are dropped.
#[must_use]
pub fn flatten_items(items: &[OrderItem]) -> Vec<LineItem> {
    let bundle_parents = ids_of_kind(items, ProductKind::Bundle);
    let configurable_parents = ids_of_kind(items, ProductKind::Configurable);

    items
        .iter()
        .filter_map(|item| {
            let resolved = resolve_identity(item, &bundle_parents, &configurable_parents)?;
            Some(build_line_item(item, resolved))
        })
        .collect()
}

/// Identity a row resolved to.
struct Resolved {
    id: String,
    title: String,
    vars: Map<String, Value>,
}

fn resolve_identity(
    item: &OrderItem,
    bundle_parents: &HashSet<ProductId>,
    configurable_parents: &HashSet<ProductId>,
) -> Option<Resolved> {
    // A configurable row is a stand-in: the thing actually purchased is the
    // variant recorded in its options.
    if item.product_type == ProductKind::Configurable {
        let options = item.options.as_ref()?;
        let id = options.simple_sku.clone()?;
        return Some(Resolved {
            id,
            title: options
                .simple_name
                .clone()
                .unwrap_or_else(|| item.name.clone()),
            vars: selected_option_vars(options),
        });
    }

    // Children of composite rows are already represented by their parent.
    let standalone = item.parent_product_id.is_none_or(|parent| {
        !bundle_parents.contains(&parent) && !configurable_parents.contains(&parent)
    });

    standalone.then(|| Resolved {
        id: item.sku.clone(),
        title: item.name.clone(),
        vars: Map::new(),
    })
}

fn build_line_item(item: &OrderItem, resolved: Resolved) -> LineItem {
    LineItem {
        id: resolved.id,
        title: resolved.title,
        price: minor_units(item.price),
        qty: item.qty_ordered,
        url: item.product_url.clone(),
        images: ImageSet::full_only(item.image_url.clone()),
        tags: split_keywords(item.meta_keywords.as_deref()),
        vars: resolved.vars,
    }
}

fn selected_option_vars(options: &ItemOptions) -> Map<String, Value> {
    options
        .attributes_info
        .iter()
        .map(|option| (option.label.clone(), Value::String(option.value.clone())))
        .collect()
}

fn ids_of_kind(items: &[OrderItem], kind: ProductKind) -> HashSet<ProductId> {
    items
        .iter()
        .filter(|item| item.product_type == kind)
        .map(|item| item.product_id)
        .collect()
}
