//! The CSV-driven jobs.
//!
//! Each job is a [`RowHandler`](crate::driver::RowHandler) that turns one
//! row into at most a handful of Admin API calls.

pub mod create_products;
pub mod find_products;
pub mod update_costs;
pub mod update_inventory;
pub mod zero_inventory;

pub use create_products::CreateProducts;
pub use find_products::FindProducts;
pub use update_costs::UpdateCosts;
pub use update_inventory::UpdateInventory;
pub use zero_inventory::ZeroInventory;

use catalog_sync_core::{Row, Sku};
use catalog_sync_shopify::{InventoryLevel, SkuVariant};
use tracing::info;

use crate::api::CatalogApi;
use crate::driver::RowResult;
use crate::error::SyncError;

/// Column holding the SKU in every job's input.
pub const SKU_COLUMN: &str = "SKU";

/// Inventory adjustment reason recorded on every quantity change.
pub const ADJUST_REASON: &str = "correction";

/// An applied change to a variant's `available` quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    /// Variant title (the size).
    pub variant: String,
    /// Quantity before the change.
    pub from: i64,
    /// Quantity after the change.
    pub to: i64,
}

/// Read the row's SKU, or the skip result to record when it is blank.
fn require_sku<R>(row: &Row) -> Result<Sku, RowResult<R>> {
    row.get(SKU_COLUMN)
        .and_then(Sku::parse)
        .ok_or_else(|| RowResult::missing("", SKU_COLUMN))
}

/// First non-blank value among `columns`, with the column it came from.
fn first_present<'r>(row: &'r Row, columns: &[&'static str]) -> Option<(&'static str, &'r str)> {
    columns
        .iter()
        .find_map(|column| row.get(column).map(|value| (*column, value)))
}

/// Move `level` from its current quantity to `target`.
///
/// The adjustment is sent as a compare-and-set against the quantity read
/// during lookup, so a concurrent change in the store fails the row
/// instead of being overwritten.
async fn set_available<A: CatalogApi>(
    api: &A,
    sku: &Sku,
    variant: &SkuVariant,
    level: &InventoryLevel,
    target: i64,
) -> Result<QuantityChange, SyncError> {
    let delta = target - level.available;
    api.adjust_available(
        &variant.inventory_item_id,
        &level.location_id,
        delta,
        Some(level.available),
        ADJUST_REASON,
    )
    .await?;

    info!(
        sku = %sku,
        variant = %variant.title,
        from = level.available,
        to = target,
        delta,
        "Inventory adjusted"
    );
    Ok(QuantityChange {
        variant: variant.title.clone(),
        from: level.available,
        to: target,
    })
}
