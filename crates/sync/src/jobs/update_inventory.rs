//! Bring per-size available quantities in line with the supplier.

use catalog_sync_core::{Row, SkipReason};
use tracing::debug;

use super::{QuantityChange, SKU_COLUMN, first_present, require_sku, set_available};
use crate::api::CatalogApi;
use crate::driver::{RowHandler, RowResult};
use crate::error::SyncError;

pub const SIZE_COLUMN: &str = "Size";

/// Desired quantity columns, in order of preference.
pub const QTY_COLUMNS: [&str; 2] = ["Qty_supplier", "Qty"];

/// The update-inventory job.
///
/// Every variant whose title equals the row's `Size` is adjusted at its
/// first inventory level. A row without a size targets the first variant.
pub struct UpdateInventory<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> UpdateInventory<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: CatalogApi> RowHandler for UpdateInventory<'_, A> {
    type Record = Vec<QuantityChange>;

    fn name(&self) -> &'static str {
        "update-inventory"
    }

    fn key(&self, row: &Row) -> String {
        let sku = row.get(SKU_COLUMN).unwrap_or_default();
        match row.get(SIZE_COLUMN) {
            Some(size) => format!("{sku}/{size}"),
            None => sku.to_string(),
        }
    }

    async fn handle(&self, row: &Row) -> Result<RowResult<Vec<QuantityChange>>, SyncError> {
        let sku = match require_sku(row) {
            Ok(sku) => sku,
            Err(skip) => return Ok(skip),
        };
        let key = self.key(row);

        let Some((column, raw)) = first_present(row, &QTY_COLUMNS) else {
            return Ok(RowResult::missing(key, QTY_COLUMNS[0]));
        };
        let Ok(desired) = raw.parse::<i64>() else {
            return Ok(RowResult::skipped(
                key,
                SkipReason::InvalidValue {
                    column: column.to_string(),
                    value: raw.to_string(),
                },
            ));
        };

        let variants = self.api.find_variants_by_sku(&sku).await?;
        let size = row.get(SIZE_COLUMN);
        let matches: Vec<_> = match size {
            Some(size) => variants.iter().filter(|v| v.title.trim() == size).collect(),
            None => variants.first().into_iter().collect(),
        };
        if matches.is_empty() {
            debug!(sku = %sku, size, found = variants.len(), "No matching variant");
            return Ok(RowResult::not_found(key));
        }

        // Levels are checked for every match before the first mutation
        let mut stale = Vec::with_capacity(matches.len());
        for variant in matches {
            let Some(level) = variant.first_level() else {
                return Err(SyncError::NoInventoryLevel { sku: key });
            };
            if level.available != desired {
                stale.push((variant, level));
            }
        }
        if stale.is_empty() {
            return Ok(RowResult::no_update_needed(key));
        }

        let mut changes = Vec::with_capacity(stale.len());
        for (variant, level) in stale {
            changes.push(set_available(self.api, &sku, variant, level, desired).await?);
        }
        Ok(RowResult::success(key, changes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_sync_core::Outcome;

    use super::*;
    use crate::api::fake::{Call, FakeCatalog, variant};
    use crate::driver::{FailurePolicy, drive};
    use crate::sink::VecSink;

    async fn run(api: &FakeCatalog, rows: Vec<Row>) -> Vec<RowResult<Vec<QuantityChange>>> {
        let mut sink = VecSink::default();
        drive(&rows, &UpdateInventory::new(api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();
        sink.results.into_iter().map(|(_, r)| r).collect()
    }

    #[tokio::test]
    async fn test_matching_quantity_makes_no_mutation() {
        let api = FakeCatalog::with_variants("ABC123", vec![variant("ABC123", "OS", 5, None)]);
        let rows = vec![Row::from_pairs(1, [("SKU", "ABC123"), ("Qty", "5")])];

        let results = run(&api, rows).await;

        assert_eq!(results.first().unwrap().outcome, Outcome::no_update_needed());
        assert_eq!(results.first().unwrap().outcome.detail(), "no update needed");
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_adjusts_the_matching_size_by_delta() {
        let medium = variant("XYZ", "M", 3, None);
        let large = variant("XYZ", "L", 0, None);
        let api = FakeCatalog::with_variants("XYZ", vec![medium, large.clone()]);
        let rows = vec![Row::from_pairs(
            1,
            [("SKU", "XYZ"), ("Size", "L"), ("Qty_supplier", "4"), ("Qty", "9")],
        )];

        let results = run(&api, rows).await;

        let result = results.first().unwrap();
        assert_eq!(result.key, "XYZ/L");
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(
            api.mutations(),
            vec![Call::Adjust {
                inventory_item_id: large.inventory_item_id,
                location_id: large.levels.first().unwrap().location_id.clone(),
                delta: 4,
                change_from: Some(0),
                reason: "correction".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_every_variant_with_the_size_is_adjusted() {
        let listed = variant("XYZ", "M", 3, None);
        let relisted = variant("XYZ", "M", 1, None);
        let current = variant("XYZ", "M", 4, None);
        let api = FakeCatalog::with_variants(
            "XYZ",
            vec![listed.clone(), variant("XYZ", "L", 0, None), relisted.clone(), current],
        );
        let rows = vec![Row::from_pairs(1, [("SKU", "XYZ"), ("Size", "M"), ("Qty", "4")])];

        let results = run(&api, rows).await;

        let result = results.first().unwrap();
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.record.as_ref().map(Vec::len), Some(2));
        let adjusted: Vec<_> = api
            .mutations()
            .into_iter()
            .filter_map(|call| match call {
                Call::Adjust {
                    inventory_item_id,
                    delta,
                    ..
                } => Some((inventory_item_id, delta)),
                _ => None,
            })
            .collect();
        assert_eq!(
            adjusted,
            vec![(listed.inventory_item_id, 1), (relisted.inventory_item_id, 3)]
        );
    }

    #[tokio::test]
    async fn test_unknown_size_is_not_found() {
        let api = FakeCatalog::with_variants("XYZ", vec![variant("XYZ", "M", 3, None)]);
        let rows = vec![Row::from_pairs(1, [("SKU", "XYZ"), ("Size", "XL"), ("Qty", "1")])];

        let results = run(&api, rows).await;

        assert_eq!(results.first().unwrap().outcome, Outcome::NotFound);
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_non_integer_quantity_is_skipped_without_lookup() {
        let api = FakeCatalog::default();
        let rows = vec![Row::from_pairs(1, [("SKU", "XYZ"), ("Qty", "lots")])];

        let results = run(&api, rows).await;

        assert_eq!(
            results.first().unwrap().outcome,
            Outcome::Skipped(SkipReason::InvalidValue {
                column: "Qty".to_string(),
                value: "lots".to_string(),
            })
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_variant_without_level_is_an_error() {
        let mut bare = variant("XYZ", "M", 0, None);
        bare.levels.clear();
        let api = FakeCatalog::with_variants("XYZ", vec![bare]);
        let rows = vec![Row::from_pairs(1, [("SKU", "XYZ"), ("Size", "M"), ("Qty", "2")])];

        let results = run(&api, rows).await;

        assert_eq!(
            results.first().unwrap().outcome,
            Outcome::Error("XYZ/M has no inventory level".to_string())
        );
    }
}
