//! Remote job commands.
//!
//! # Usage
//!
//! ```bash
//! # Create draft products from a supplier catalog
//! catalog-sync create-products -i others_add_products.csv --report created.csv
//!
//! # Snapshot what the store holds (writes shopify_data.csv and to_add.csv)
//! catalog-sync find-products -i all_skus.csv --output data/2026-10-16
//!
//! # Apply the reconcile outputs
//! catalog-sync update-inventory -i os_update_products.csv
//! catalog-sync update-costs -i different_costs.csv
//! catalog-sync zero-inventory -i zero_inventory_shopify.csv --abort-on-error
//! ```
//!
//! # Environment Variables
//!
//! See [`catalog_sync_shopify::config`]. `SHOPIFY_LOCATION_ID` is only
//! required by `create-products`.

use std::fmt::Debug;
use std::path::PathBuf;

use catalog_sync::jobs::{
    CreateProducts, FindProducts, SKU_COLUMN, UpdateCosts, UpdateInventory, ZeroInventory,
    create_products, update_costs, update_inventory,
};
use catalog_sync::{
    CsvStatusSink, FailurePolicy, LogSink, RowHandler, RunSummary, Sink, SnapshotSink, SyncError,
    drive, load_table,
};
use catalog_sync_core::Row;
use catalog_sync_shopify::AdminClient;
use catalog_sync_shopify::config::SyncConfig;

/// A remote job and its job-specific arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    CreateProducts,
    FindProducts {
        /// Folder receiving `shopify_data.csv` and `to_add.csv`
        output: PathBuf,
    },
    ZeroInventory,
    UpdateInventory,
    UpdateCosts,
}

/// Arguments shared by every remote job.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input CSV
    pub input: PathBuf,
    /// Optional `line,key,outcome,detail` report
    pub report: Option<PathBuf>,
    /// What to do after a failed row
    pub policy: FailurePolicy,
}

/// Load configuration and input, then run `job` over every row.
///
/// # Errors
///
/// Returns `SyncError` if configuration or input cannot be loaded, the
/// client cannot be built, or an outcome cannot be written. Row failures
/// are counted in the summary instead.
pub async fn run(job: Job, options: &RunOptions) -> Result<RunSummary, SyncError> {
    let config = SyncConfig::from_env()?;
    let table = load_table(&options.input)?;
    let client = AdminClient::new(&config.shopify, config.retry)?;
    tracing::info!(endpoint = %client.endpoint(), input = %options.input.display(), "Client ready");

    // Every check below runs before the first remote call
    let rows = table.rows();
    match job {
        Job::CreateProducts => {
            table.require_columns(&[
                create_products::TITLE_COLUMN,
                create_products::IMAGES_COLUMN,
                create_products::SIZE_COLUMN,
            ])?;
            let location_id = config.shopify.require_location()?.clone();
            let handler = CreateProducts::new(&client, location_id, config.post_create_pause);
            execute(&handler, rows, options, ()).await
        }
        Job::FindProducts { output } => {
            table.require_columns(&[SKU_COLUMN])?;
            let snapshot = SnapshotSink::create(&output)?;
            execute(&FindProducts::new(&client), rows, options, snapshot).await
        }
        Job::ZeroInventory => {
            table.require_columns(&[SKU_COLUMN])?;
            execute(&ZeroInventory::new(&client), rows, options, ()).await
        }
        Job::UpdateInventory => {
            table.require_columns(&[SKU_COLUMN])?;
            table.require_any_column(&update_inventory::QTY_COLUMNS)?;
            execute(&UpdateInventory::new(&client), rows, options, ()).await
        }
        Job::UpdateCosts => {
            table.require_columns(&[SKU_COLUMN])?;
            table.require_any_column(&update_costs::COST_COLUMNS)?;
            execute(&UpdateCosts::new(&client), rows, options, ()).await
        }
    }
}

/// Drive `handler` with the log sink, the optional report and `extra`.
async fn execute<H, S>(
    handler: &H,
    rows: &[Row],
    options: &RunOptions,
    extra: S,
) -> Result<RunSummary, SyncError>
where
    H: RowHandler,
    H::Record: Debug,
    S: Sink<H::Record>,
{
    let report = options
        .report
        .as_deref()
        .map(CsvStatusSink::create)
        .transpose()?;
    let mut sink = ((LogSink::new(handler.name()), extra), report);

    let summary = drive(rows, handler, &mut sink, options.policy).await?;
    summary.log();
    Ok(summary)
}
