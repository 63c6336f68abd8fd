//! Product sync gating.
//!
//! Catalog saves fire for every product row, but only some of them belong
//! in the marketing catalog. Master (configurable) products and their
//! variants are each gated behind a configuration flag; everything else
//! always syncs.

use crate::magento::types::{Product, ProductKind};

/// Which product roles are allowed to sync, from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncScope {
    /// Sync configurable master products.
    pub masters: bool,
    /// Sync simple products that belong to a configurable parent.
    pub variants: bool,
}

/// Whether a product is a variant: a simple product owned by at least one
/// configurable parent.
#[must_use]
pub fn is_variant(product: &Product) -> bool {
    product.kind == ProductKind::Simple && !product.parent_ids.is_empty()
}

/// Decide whether a product snapshot should sync at all.
///
/// Masters and variants follow their scope flags. Standalone simples and
/// the remaining kinds are always eligible; they carry their own sellable
/// identity.
#[must_use]
pub fn should_sync_product(product: &Product, scope: SyncScope) -> bool {
    match product.kind {
        ProductKind::Configurable => scope.masters,
        ProductKind::Simple if !product.parent_ids.is_empty() => scope.variants,
        ProductKind::Simple
        | ProductKind::Bundle
        | ProductKind::Grouped
        | ProductKind::Virtual
        | ProductKind::Downloadable => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sailbridge_core::ProductId;

    fn product(kind: ProductKind, parent_ids: Vec<ProductId>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "sku": "SKU-1",
            "name": "Product",
            "type_id": kind.as_str(),
            "parent_ids": parent_ids,
        }))
        .unwrap()
    }

    const ALL: SyncScope = SyncScope {
        masters: true,
        variants: true,
    };
    const NONE: SyncScope = SyncScope {
        masters: false,
        variants: false,
    };

    #[test]
    fn test_master_follows_masters_flag() {
        let master = product(ProductKind::Configurable, Vec::new());
        assert!(should_sync_product(&master, ALL));
        assert!(!should_sync_product(&master, NONE));
    }

    #[test]
    fn test_variant_follows_variants_flag() {
        let variant = product(ProductKind::Simple, vec![ProductId::new(10)]);
        assert!(should_sync_product(&variant, ALL));
        assert!(!should_sync_product(&variant, NONE));
        assert!(should_sync_product(
            &variant,
            SyncScope {
                masters: false,
                variants: true
            }
        ));
    }

    #[test]
    fn test_standalone_simple_always_syncs() {
        let simple = product(ProductKind::Simple, Vec::new());
        assert!(should_sync_product(&simple, NONE));
    }

    #[test]
    fn test_other_kinds_always_sync() {
        for kind in [
            ProductKind::Bundle,
            ProductKind::Grouped,
            ProductKind::Virtual,
            ProductKind::Downloadable,
        ] {
            let p = product(kind, Vec::new());
            assert!(should_sync_product(&p, NONE), "{kind} should sync");
        }
    }

    #[test]
    fn test_is_variant_requires_simple_kind_and_a_parent() {
        assert!(is_variant(&product(
            ProductKind::Simple,
            vec![ProductId::new(10)]
        )));
        assert!(!is_variant(&product(ProductKind::Simple, Vec::new())));
        // A parented non-simple row is not a variant.
        assert!(!is_variant(&product(
            ProductKind::Virtual,
            vec![ProductId::new(10)]
        )));
    }
}
