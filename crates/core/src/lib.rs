//! Sailbridge Core - Shared types library.
//!
//! This crate provides common types used across all Sailbridge components:
//! - `connector` - Webhook service that syncs commerce data to the marketing API
//! - `cli` - Command-line tools for credential checks and manual backfills
//!
//! # Architecture
//!
//! The core crate contains only types and conversions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus money
//!   conversion helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
