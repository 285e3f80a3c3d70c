//! Catalog Sync - CSV-driven Shopify batch jobs.
//!
//! Every job follows the same shape: load a CSV into memory, then hand the
//! rows one at a time to a [`RowHandler`] through [`drive`], which records
//! each row's outcome in a [`Sink`].
//!
//! # Modules
//!
//! - [`source`] - CSV loading
//! - [`driver`] - Sequential row driver and run summary
//! - [`sink`] - Outcome sinks (log, CSV report, catalog snapshot)
//! - [`api`] - The Admin API operations the jobs use
//! - [`jobs`] - create-products, find-products, zero-inventory,
//!   update-inventory and update-costs
//! - [`reconcile`] - Offline diff of a supplier catalog against a snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod driver;
pub mod error;
pub mod jobs;
pub mod reconcile;
pub mod sink;
pub mod source;

pub use api::CatalogApi;
pub use driver::{FailurePolicy, RowHandler, RowResult, RunSummary, drive};
pub use error::{ReconcileError, SinkError, SourceError, SyncError};
pub use sink::{CsvStatusSink, LogSink, Sink, SnapshotSink};
pub use source::{CsvTable, load_rows, load_table};
