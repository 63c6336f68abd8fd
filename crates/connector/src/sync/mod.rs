//! The sync engine: decisions and payload shaping.
//!
//! Everything in this module is pure. Snapshots come in, payloads (or a
//! decision not to build one) come out; dispatch and error policy live with
//! the routes. That split keeps the business rules testable without a
//! server on either side.
//!
//! - [`eligibility`] - which product snapshots sync at all
//! - [`items`] - collapsing order item trees into line items
//! - [`pricing`] - adjustment and tender derivation
//! - [`vars`] - attribute projection
//! - [`purchase`] - purchase payload assembly
//! - [`content`] - content payload assembly
//! - [`types`] - the outbound payload vocabulary

pub mod content;
pub mod eligibility;
pub mod items;
pub mod pricing;
pub mod purchase;
pub mod types;
pub mod vars;

pub use content::{AssemblyError, build_content};
pub use purchase::build_purchase;

/// Split a comma-separated keyword list into trimmed, non-empty tags.
pub(crate) fn split_keywords(keywords: Option<&str>) -> Vec<String> {
    keywords
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
