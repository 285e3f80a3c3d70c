//! Offline reconcile command.
//!
//! # Usage
//!
//! ```bash
//! # Diff the supplier catalog against the last find-products snapshot
//! catalog-sync reconcile --folder data/2026-10-16 --clean-file supplier_clean.csv
//! ```

use std::path::Path;

use catalog_sync::ReconcileError;
use catalog_sync::reconcile::{self, ReconcileSummary};

/// Run the reconcile step over `folder`.
///
/// # Errors
///
/// Returns `ReconcileError` if an input is missing or invalid, or an output
/// cannot be written.
pub fn run(folder: &Path, clean_file: &Path) -> Result<ReconcileSummary, ReconcileError> {
    tracing::info!(folder = %folder.display(), clean_file = %clean_file.display(), "Reconciling");
    reconcile::reconcile(folder, clean_file)
}
