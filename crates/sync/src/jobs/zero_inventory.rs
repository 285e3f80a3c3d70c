//! Set the available quantity of listed SKUs to zero.

use catalog_sync_core::Row;

use super::{QuantityChange, require_sku, set_available};
use crate::api::CatalogApi;
use crate::driver::{RowHandler, RowResult};
use crate::error::SyncError;

/// The zero-inventory job.
///
/// Only the first variant found for a SKU, at its first inventory level,
/// is zeroed.
pub struct ZeroInventory<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> ZeroInventory<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: CatalogApi> RowHandler for ZeroInventory<'_, A> {
    type Record = QuantityChange;

    fn name(&self) -> &'static str {
        "zero-inventory"
    }

    async fn handle(&self, row: &Row) -> Result<RowResult<QuantityChange>, SyncError> {
        let sku = match require_sku(row) {
            Ok(sku) => sku,
            Err(skip) => return Ok(skip),
        };

        let variants = self.api.find_variants_by_sku(&sku).await?;
        let Some(variant) = variants.first() else {
            return Ok(RowResult::not_found(sku));
        };
        let Some(level) = variant.first_level() else {
            return Ok(RowResult::no_update_needed(sku));
        };

        match level.available {
            0 => Ok(RowResult::no_update_needed(sku)),
            available if available < 0 => Err(SyncError::InvalidDelta {
                sku: sku.into(),
                available,
            }),
            _ => {
                let change = set_available(self.api, &sku, variant, level, 0).await?;
                Ok(RowResult::success(sku, change))
            }
        }
    }
}
