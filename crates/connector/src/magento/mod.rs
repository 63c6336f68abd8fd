//! Magento platform integration.
//!
//! Inbound snapshot types posted by the platform-side plugin, plus the small
//! REST client used for the one write-back the sync flow needs (marking the
//! order confirmation email as sent).

pub mod client;
pub mod types;

pub use client::{MagentoClient, MagentoError};
