//! The slice of the Admin API the jobs depend on.
//!
//! Jobs are generic over [`CatalogApi`] so they can run against the real
//! [`AdminClient`] or an in-memory fake in tests.

use catalog_sync_core::{InventoryItemId, LocationId, Money, ProductId, Sku};
use catalog_sync_shopify::{
    AdminClient, AdminShopifyError, CreatedMedia, CreatedProduct, CreatedVariant,
    InventoryAdjustment, MediaImage, NewProduct, NewVariant, SkuVariant, VariantCreateStrategy,
};
use rust_decimal::Decimal;

/// Remote catalog operations used by the sync jobs.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Create a product shell.
    async fn create_product(&self, product: NewProduct)
    -> Result<CreatedProduct, AdminShopifyError>;

    /// Attach images to a product.
    async fn create_product_media(
        &self,
        product_id: &ProductId,
        images: Vec<MediaImage>,
    ) -> Result<Vec<CreatedMedia>, AdminShopifyError>;

    /// Bulk-create variants with their initial quantities.
    async fn create_variants(
        &self,
        product_id: &ProductId,
        variants: Vec<NewVariant>,
        location_id: &LocationId,
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<CreatedVariant>, AdminShopifyError>;

    /// Every variant carrying exactly this SKU.
    async fn find_variants_by_sku(&self, sku: &Sku) -> Result<Vec<SkuVariant>, AdminShopifyError>;

    /// Adjust the `available` quantity at a location.
    async fn adjust_available(
        &self,
        inventory_item_id: &InventoryItemId,
        location_id: &LocationId,
        delta: i64,
        change_from: Option<i64>,
        reason: &str,
    ) -> Result<InventoryAdjustment, AdminShopifyError>;

    /// Set an inventory item's unit cost.
    async fn update_unit_cost(
        &self,
        inventory_item_id: &InventoryItemId,
        cost: Decimal,
    ) -> Result<Option<Money>, AdminShopifyError>;
}

impl CatalogApi for AdminClient {
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        Self::create_product(self, product).await
    }

    async fn create_product_media(
        &self,
        product_id: &ProductId,
        images: Vec<MediaImage>,
    ) -> Result<Vec<CreatedMedia>, AdminShopifyError> {
        Self::create_product_media(self, product_id, images).await
    }

    async fn create_variants(
        &self,
        product_id: &ProductId,
        variants: Vec<NewVariant>,
        location_id: &LocationId,
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<CreatedVariant>, AdminShopifyError> {
        Self::create_variants(self, product_id, variants, location_id, strategy).await
    }

    async fn find_variants_by_sku(&self, sku: &Sku) -> Result<Vec<SkuVariant>, AdminShopifyError> {
        Self::find_variants_by_sku(self, sku).await
    }

    async fn adjust_available(
        &self,
        inventory_item_id: &InventoryItemId,
        location_id: &LocationId,
        delta: i64,
        change_from: Option<i64>,
        reason: &str,
    ) -> Result<InventoryAdjustment, AdminShopifyError> {
        Self::adjust_available(self, inventory_item_id, location_id, delta, change_from, reason)
            .await
    }

    async fn update_unit_cost(
        &self,
        inventory_item_id: &InventoryItemId,
        cost: Decimal,
    ) -> Result<Option<Money>, AdminShopifyError> {
        Self::update_unit_cost(self, inventory_item_id, cost).await
    }
}
