//! Sailbridge connector library.
//!
//! This crate provides the connector functionality as a library,
//! allowing it to be tested and reused (the CLI drives the same engine).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod magento;
pub mod middleware;
pub mod routes;
pub mod sailthru;
pub mod state;
pub mod sync;
