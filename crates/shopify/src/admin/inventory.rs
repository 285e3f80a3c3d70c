//! Variant lookup and inventory operations for the Admin API.

use catalog_sync_core::{InventoryItemId, LocationId, Money, Sku};
use rust_decimal::Decimal;
use tracing::instrument;

use super::{
    AdminClient,
    conversions::{AVAILABLE, check_user_errors, convert_adjustment_group, convert_sku_variant},
    queries::{self, InventoryAdjustQuantities, InventoryItemUpdate, VariantsBySku},
};
use crate::types::{InventoryAdjustment, SkuVariant};
use crate::{AdminShopifyError, GraphQLError};

/// Variants fetched per SKU lookup.
const SKU_LOOKUP_LIMIT: i64 = 100;

impl AdminClient {
    /// Find every variant whose SKU matches exactly.
    ///
    /// Shopify's `sku:` search is a prefix/token match, so results are
    /// filtered to exact (ASCII case-insensitive) matches, keeping Shopify's
    /// order.
    ///
    /// # Arguments
    ///
    /// * `sku` - SKU to look up
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub async fn find_variants_by_sku(
        &self,
        sku: &Sku,
    ) -> Result<Vec<SkuVariant>, AdminShopifyError> {
        let variables = queries::variants_by_sku::Variables {
            query: sku.search_query(),
            first: SKU_LOOKUP_LIMIT,
        };

        let response = self.execute::<VariantsBySku>(variables).await?;

        Ok(response
            .product_variants
            .edges
            .into_iter()
            .map(|e| e.node)
            .filter(|v| {
                v.sku
                    .as_deref()
                    .is_some_and(|s| s.trim().eq_ignore_ascii_case(sku.as_str()))
            })
            .map(convert_sku_variant)
            .collect())
    }

    /// Adjust the `available` quantity of an inventory item at a location.
    ///
    /// # Arguments
    ///
    /// * `inventory_item_id` - Inventory item to adjust
    /// * `location_id` - Location holding the stock
    /// * `delta` - Signed quantity change
    /// * `change_from` - Expected current quantity (compare-and-set), if known
    /// * `reason` - Adjustment reason (e.g. `correction`)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(
        skip(self, inventory_item_id, location_id),
        fields(inventory_item_id = %inventory_item_id, location_id = %location_id)
    )]
    pub async fn adjust_available(
        &self,
        inventory_item_id: &InventoryItemId,
        location_id: &LocationId,
        delta: i64,
        change_from: Option<i64>,
        reason: &str,
    ) -> Result<InventoryAdjustment, AdminShopifyError> {
        use queries::inventory_adjust_quantities::{
            InventoryAdjustQuantitiesInput, InventoryChangeInput, Variables,
        };

        let variables = Variables {
            input: InventoryAdjustQuantitiesInput {
                reason: reason.to_string(),
                name: AVAILABLE.to_string(),
                changes: vec![InventoryChangeInput {
                    delta,
                    inventory_item_id: inventory_item_id.clone(),
                    location_id: location_id.clone(),
                    change_from_quantity: change_from,
                }],
            },
        };

        let response = self.execute::<InventoryAdjustQuantities>(variables).await?;

        if let Some(payload) = response.inventory_adjust_quantities {
            check_user_errors(&payload.user_errors)?;

            if let Some(group) = payload.inventory_adjustment_group {
                return Ok(convert_adjustment_group(group));
            }
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::client(
            "Inventory adjustment failed",
        )]))
    }

    /// Set the unit cost of an inventory item.
    ///
    /// # Arguments
    ///
    /// * `inventory_item_id` - Inventory item to update
    /// * `cost` - New unit cost in the store currency
    ///
    /// # Returns
    ///
    /// The unit cost Shopify now records, if it returned one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, inventory_item_id, cost), fields(inventory_item_id = %inventory_item_id, cost = %cost))]
    pub async fn update_unit_cost(
        &self,
        inventory_item_id: &InventoryItemId,
        cost: Decimal,
    ) -> Result<Option<Money>, AdminShopifyError> {
        use queries::inventory_item_update::{InventoryItemInput, Variables};

        let variables = Variables {
            id: inventory_item_id.clone(),
            input: InventoryItemInput { cost },
        };

        let response = self.execute::<InventoryItemUpdate>(variables).await?;

        if let Some(payload) = response.inventory_item_update {
            check_user_errors(&payload.user_errors)?;

            if let Some(item) = payload.inventory_item {
                return Ok(item.unit_cost);
            }
        }

        Err(AdminShopifyError::NotFound(format!(
            "Inventory item {inventory_item_id}"
        )))
    }
}
