//! Domain types for the Admin API operations used by the sync jobs.
//!
//! These are the clean types the jobs work with; the GraphQL wire types
//! live next to each query and are converted at the client boundary.

use catalog_sync_core::{
    InventoryItemId, InventoryLevelId, InventoryPolicy, LocationId, Money, ProductId,
    ProductStatus, Sku, VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Product creation
// =============================================================================

/// Input for creating a product shell (no variants, no media).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: Option<String>,
    /// HTML description.
    pub description_html: Option<String>,
    /// Product type.
    pub product_type: Option<String>,
    /// Vendor name.
    pub vendor: Option<String>,
    /// Product tags.
    pub tags: Vec<String>,
    /// Publication status.
    pub status: ProductStatus,
    /// Metafields set at creation.
    pub metafields: Vec<Metafield>,
    /// Product options (e.g. `Size`) and their values.
    pub options: Vec<ProductOption>,
}

/// A metafield to attach to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    /// Metafield namespace (e.g. `custom`).
    pub namespace: String,
    /// Metafield key (e.g. `made_in`).
    pub key: String,
    /// Value as a string.
    pub value: String,
    /// Metafield type (e.g. `single_line_text_field`).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Metafield {
    /// A single-line text metafield.
    #[must_use]
    pub fn single_line(namespace: &str, key: &str, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.into(),
            kind: "single_line_text_field".to_string(),
        }
    }

    /// A multi-line text metafield.
    #[must_use]
    pub fn multi_line(namespace: &str, key: &str, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.into(),
            kind: "multi_line_text_field".to_string(),
        }
    }
}

/// A product option and its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    /// Option name (e.g. `Size`).
    pub name: String,
    /// Option values, in display order.
    pub values: Vec<String>,
}

/// A product returned by `productCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProduct {
    /// Product ID.
    pub id: ProductId,
    /// Product title as stored.
    pub title: String,
    /// URL handle as stored.
    pub handle: String,
}

// =============================================================================
// Media
// =============================================================================

/// An external image to attach to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaImage {
    /// Alt text.
    pub alt: String,
    /// Public URL Shopify fetches the image from.
    pub source_url: String,
}

/// Media record returned by `productCreateMedia`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMedia {
    /// Alt text as stored.
    pub alt: Option<String>,
    /// Processing status (e.g. `UPLOADED`, `PROCESSING`).
    pub status: String,
}

// =============================================================================
// Variants
// =============================================================================

/// Input for one variant in a bulk create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    /// Name of the product option this variant sets (e.g. `Size`).
    pub option_name: String,
    /// Value of that option (e.g. `M`).
    pub option_value: String,
    /// Stock keeping unit.
    pub sku: Option<Sku>,
    /// Selling price.
    pub price: Option<Decimal>,
    /// Compare-at price.
    pub compare_at_price: Option<Decimal>,
    /// Unit cost.
    pub cost: Option<Decimal>,
    /// Barcode.
    pub barcode: Option<String>,
    /// Initial available quantity at the target location.
    pub inventory_quantity: i64,
    /// Whether the variant is taxable.
    pub taxable: bool,
    /// Whether the variant requires shipping.
    pub requires_shipping: bool,
    /// Whether inventory is tracked.
    pub tracked: bool,
    /// Out-of-stock selling policy.
    pub inventory_policy: InventoryPolicy,
}

/// Variant returned by `productVariantsBulkCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (the option value for single-option products).
    pub title: String,
}

/// Strategy for `productVariantsBulkCreate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantCreateStrategy {
    /// Keep the default variant Shopify creates with the product.
    #[default]
    Default,
    /// Replace the default standalone variant with the new ones.
    RemoveStandaloneVariant,
}

// =============================================================================
// SKU lookup
// =============================================================================

/// Parent product of a looked-up variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
}

/// Available quantity of an inventory item at one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLevel {
    /// Inventory level ID.
    pub id: InventoryLevelId,
    /// Location holding the stock.
    pub location_id: LocationId,
    /// `available` quantity.
    pub available: i64,
}

/// A variant found by SKU, with its inventory item and levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (the size for single-option products).
    pub title: String,
    /// SKU as stored in Shopify.
    pub sku: Option<String>,
    /// Selling price.
    pub price: Option<Decimal>,
    /// Barcode.
    pub barcode: Option<String>,
    /// Parent product.
    pub product: ProductRef,
    /// Inventory item ID.
    pub inventory_item_id: InventoryItemId,
    /// Unit cost recorded on the inventory item.
    pub unit_cost: Option<Money>,
    /// Inventory levels, in the order Shopify returned them.
    pub levels: Vec<InventoryLevel>,
}

impl SkuVariant {
    /// First inventory level, which the sync jobs treat as authoritative.
    #[must_use]
    pub fn first_level(&self) -> Option<&InventoryLevel> {
        self.levels.first()
    }

    /// Available quantity at the first level (0 when there is none).
    #[must_use]
    pub fn available(&self) -> i64 {
        self.first_level().map_or(0, |level| level.available)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Result of an `inventoryAdjustQuantities` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryAdjustment {
    /// Adjustment group ID, if Shopify returned one.
    pub group_id: Option<String>,
    /// Reason recorded on the adjustment.
    pub reason: String,
    /// Per-item deltas applied.
    pub changes: Vec<InventoryChange>,
}

/// One applied quantity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryChange {
    /// Quantity name (e.g. `available`).
    pub name: String,
    /// Delta applied.
    pub delta: i64,
}
