//! Snapshot what the store holds for each SKU.
//!
//! Read-only: one lookup per row. The snapshot itself is written by
//! [`SnapshotSink`](crate::sink::SnapshotSink).

use catalog_sync_core::Row;
use catalog_sync_shopify::SkuVariant;
use rust_decimal::Decimal;
use tracing::debug;

use super::require_sku;
use crate::api::CatalogApi;
use crate::driver::{RowHandler, RowResult};
use crate::error::SyncError;

/// Store state for one SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Variant titles, in store order.
    pub sizes: Vec<String>,
    /// Available quantity per variant at its first inventory level.
    pub quantities: Vec<i64>,
    /// Unit cost of the first variant.
    pub unit_cost: Option<Decimal>,
}

/// The find-products job.
pub struct FindProducts<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> FindProducts<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: CatalogApi> RowHandler for FindProducts<'_, A> {
    type Record = SnapshotRecord;

    fn name(&self) -> &'static str {
        "find-products"
    }

    async fn handle(&self, row: &Row) -> Result<RowResult<SnapshotRecord>, SyncError> {
        let sku = match require_sku(row) {
            Ok(sku) => sku,
            Err(skip) => return Ok(skip),
        };

        let variants = self.api.find_variants_by_sku(&sku).await?;
        let Some(first) = variants.first() else {
            return Ok(RowResult::not_found(sku));
        };
        debug!(sku = %sku, variants = variants.len(), "SKU found");

        let record = SnapshotRecord {
            unit_cost: first.unit_cost.as_ref().map(|money| money.amount),
            sizes: variants.iter().map(|v| v.title.clone()).collect(),
            quantities: variants.iter().map(SkuVariant::available).collect(),
        };
        Ok(RowResult::success(sku, record))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_sync_core::{Outcome, SkipReason};

    use super::*;
    use crate::api::fake::{FakeCatalog, variant};
    use crate::driver::{FailurePolicy, drive};
    use crate::sink::{SnapshotSink, VecSink};

    #[tokio::test]
    async fn test_records_sizes_quantities_and_first_cost() {
        let api = FakeCatalog::with_variants(
            "XYZ",
            vec![
                variant("XYZ", "M", 3, Some(Decimal::new(4550, 2))),
                variant("XYZ", "L", 0, Some(Decimal::new(9900, 2))),
            ],
        );
        let rows = vec![Row::from_pairs(1, [("SKU", "XYZ")])];
        let mut sink = VecSink::default();

        drive(&rows, &FindProducts::new(&api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();

        let (_, result) = sink.results.first().unwrap();
        assert_eq!(
            result.record,
            Some(SnapshotRecord {
                sizes: vec!["M".to_string(), "L".to_string()],
                quantities: vec![3, 0],
                unit_cost: Some(Decimal::new(4550, 2)),
            })
        );
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_blank_skus_reach_to_add() {
        let api = FakeCatalog::default();
        let rows = vec![
            Row::from_pairs(1, [("SKU", "NEW1")]),
            Row::from_pairs(2, [("SKU", " ")]),
        ];
        let mut data = Vec::new();
        let mut to_add = Vec::new();
        {
            let mut sink = SnapshotSink::new(&mut data, &mut to_add).unwrap();
            let summary = drive(&rows, &FindProducts::new(&api), &mut sink, FailurePolicy::Continue)
                .await
                .unwrap();
            assert_eq!(summary.not_found, 1);
            assert_eq!(summary.skipped, 1);
        }

        assert_eq!(String::from_utf8(to_add).unwrap(), "SKU\nNEW1\n");
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "SKU,Sizes,Quantities,Unit Cost\n"
        );
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_sku_is_missing_field() {
        let api = FakeCatalog::default();
        let result = FindProducts::new(&api)
            .handle(&Row::from_pairs(4, [("SKU", "")]))
            .await
            .unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Skipped(SkipReason::MissingField("SKU".to_string()))
        );
    }
}
