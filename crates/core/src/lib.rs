//! Catalog Sync Core - Shared types library.
//!
//! This crate provides common types used across the catalog sync components:
//! - `shopify` - Admin API client for the catalog operations
//! - `sync` - CSV loading, the row driver, outcome sinks and the jobs
//! - `cli` - The `catalog-sync` binary
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shopify global IDs, money amounts, CSV rows and row outcomes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
