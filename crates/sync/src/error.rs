//! Error types for the sync jobs.

use std::path::PathBuf;

use catalog_sync_core::ProductId;
use catalog_sync_shopify::AdminShopifyError;
use catalog_sync_shopify::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading an input CSV.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid CSV.
    #[error("Failed to read {path}: {source}")]
    Csv {
        /// File path.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A column the job needs is not in the header row.
    #[error("{path} has no {column:?} column")]
    MissingColumn {
        /// File path.
        path: PathBuf,
        /// Missing column name.
        column: String,
    },
}

/// Errors that can occur while writing outcomes.
#[derive(Debug, Error)]
pub enum SinkError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by a job, either for a single row or for the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Admin API call failed.
    #[error(transparent)]
    Api(#[from] AdminShopifyError),

    /// A product was created but a follow-up step failed.
    #[error("product {product_id} created but {step} failed: {source}")]
    PartialCreate {
        /// The product left behind.
        product_id: ProductId,
        /// Step that failed (`media` or `variants`).
        step: &'static str,
        /// The failure.
        source: AdminShopifyError,
    },

    /// The store reports a quantity the job refuses to correct.
    #[error("invalid delta for {sku}: available quantity is {available}")]
    InvalidDelta {
        /// SKU of the variant.
        sku: String,
        /// Quantity reported by the store.
        available: i64,
    },

    /// The variant has no inventory level to adjust.
    #[error("{sku} has no inventory level")]
    NoInventoryLevel {
        /// SKU of the variant.
        sku: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Outcomes could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors raised by the offline reconcile job.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An input file could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// An output file could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_create_names_product() {
        let err = SyncError::PartialCreate {
            product_id: ProductId::from_numeric(42),
            step: "media",
            source: AdminShopifyError::UserError("media.0: Invalid URL".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "product gid://shopify/Product/42 created but media failed: User error: media.0: Invalid URL"
        );
    }

    #[test]
    fn test_invalid_delta_message() {
        let err = SyncError::InvalidDelta {
            sku: "ABC123".to_string(),
            available: -2,
        };
        assert!(err.to_string().starts_with("invalid delta"));
    }
}
