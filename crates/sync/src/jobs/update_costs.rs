//! Set inventory item unit costs from the supplier catalog.

use std::collections::HashSet;

use catalog_sync_core::{Row, SkipReason, parse_amount, round_cost};
use catalog_sync_shopify::SkuVariant;
use rust_decimal::Decimal;
use tracing::info;

use super::{first_present, require_sku};
use crate::api::CatalogApi;
use crate::driver::{RowHandler, RowResult};
use crate::error::SyncError;

/// Cost columns, in order of preference.
pub const COST_COLUMNS: [&str; 2] = ["Unit Cost_supplier", "Unit Cost"];

/// Applied cost update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostChange {
    /// Cost set, rounded to cents.
    pub cost: Decimal,
    /// Inventory items updated.
    pub items: usize,
}

/// The update-costs job.
pub struct UpdateCosts<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> UpdateCosts<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: CatalogApi> RowHandler for UpdateCosts<'_, A> {
    type Record = CostChange;

    fn name(&self) -> &'static str {
        "update-costs"
    }

    async fn handle(&self, row: &Row) -> Result<RowResult<CostChange>, SyncError> {
        let sku = match require_sku(row) {
            Ok(sku) => sku,
            Err(skip) => return Ok(skip),
        };

        let Some((column, raw)) = first_present(row, &COST_COLUMNS) else {
            return Ok(RowResult::missing(sku, COST_COLUMNS[0]));
        };
        let Ok(amount) = parse_amount(raw) else {
            return Ok(RowResult::skipped(
                sku,
                SkipReason::InvalidValue {
                    column: column.to_string(),
                    value: raw.to_string(),
                },
            ));
        };
        let cost = round_cost(amount);

        let variants = self.api.find_variants_by_sku(&sku).await?;
        if variants.is_empty() {
            return Ok(RowResult::not_found(sku));
        }

        let stale = stale_items(&variants, cost);
        if stale.is_empty() {
            return Ok(RowResult::no_update_needed(sku));
        }

        for variant in &stale {
            self.api
                .update_unit_cost(&variant.inventory_item_id, cost)
                .await?;
        }
        info!(sku = %sku, %cost, items = stale.len(), "Unit cost updated");

        Ok(RowResult::success(
            sku,
            CostChange {
                cost,
                items: stale.len(),
            },
        ))
    }
}

/// Variants whose inventory item cost differs from `cost`, one per item.
fn stale_items(variants: &[SkuVariant], cost: Decimal) -> Vec<&SkuVariant> {
    let mut seen = HashSet::new();
    variants
        .iter()
        .filter(|v| v.unit_cost.is_none_or(|current| current.amount != cost))
        .filter(|v| seen.insert(v.inventory_item_id.as_str()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_sync_core::Outcome;

    use super::*;
    use crate::api::fake::{Call, FakeCatalog, variant};
    use crate::driver::{FailurePolicy, drive};
    use crate::sink::VecSink;

    async fn run(api: &FakeCatalog, cost: &str) -> RowResult<CostChange> {
        let rows = vec![Row::from_pairs(
            1,
            [("SKU", "XYZ"), ("Unit Cost_supplier", cost), ("Unit Cost", "1.00")],
        )];
        let mut sink = VecSink::default();
        drive(&rows, &UpdateCosts::new(api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();
        sink.results.into_iter().next().unwrap().1
    }

    #[tokio::test]
    async fn test_updates_only_differing_items() {
        let same = variant("XYZ", "M", 1, Some(Decimal::new(4550, 2)));
        let stale = variant("XYZ", "L", 2, Some(Decimal::new(40, 0)));
        let api = FakeCatalog::with_variants("XYZ", vec![same, stale.clone()]);

        let result = run(&api, "45.499").await;

        assert_eq!(
            result.record,
            Some(CostChange {
                cost: Decimal::new(4550, 2),
                items: 1,
            })
        );
        assert_eq!(
            api.mutations(),
            vec![Call::UpdateCost(stale.inventory_item_id, Decimal::new(455, 1))]
        );
    }

    #[tokio::test]
    async fn test_equal_costs_need_no_update() {
        let api = FakeCatalog::with_variants(
            "XYZ",
            vec![variant("XYZ", "M", 1, Some(Decimal::new(4550, 2)))],
        );

        let result = run(&api, "45.5").await;

        assert_eq!(result.outcome, Outcome::no_update_needed());
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_shared_inventory_item_updated_once() {
        let first = variant("XYZ", "M", 1, None);
        let mut twin = variant("XYZ", "M ", 1, None);
        twin.inventory_item_id = first.inventory_item_id.clone();
        let api = FakeCatalog::with_variants("XYZ", vec![first, twin]);

        let result = run(&api, "12").await;

        assert_eq!(result.record.map(|c| c.items), Some(1));
        assert_eq!(api.mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_cost_is_skipped() {
        let api = FakeCatalog::default();

        let result = run(&api, "n/a").await;

        assert_eq!(
            result.outcome,
            Outcome::Skipped(SkipReason::InvalidValue {
                column: "Unit Cost_supplier".to_string(),
                value: "n/a".to_string(),
            })
        );
        assert!(api.calls().is_empty());
    }
}
