//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a module holding its query text plus the `Variables`
//! and `ResponseData` wire types, and a unit struct implementing
//! `graphql_client::GraphQLQuery` so the client can execute it generically.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;

/// Implement `GraphQLQuery` for an operation module.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        #[doc = concat!("The `", stringify!($name), "` operation.")]
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

graphql_operation!(ProductCreate, product_create);
graphql_operation!(ProductCreateMedia, product_create_media);
graphql_operation!(ProductVariantsBulkCreate, product_variants_bulk_create);
graphql_operation!(VariantsBySku, variants_by_sku);
graphql_operation!(InventoryAdjustQuantities, inventory_adjust_quantities);
graphql_operation!(InventoryItemUpdate, inventory_item_update);

/// A mutation `userErrors` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Generic `edges { node }` connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

// =============================================================================
// Product mutations
// =============================================================================

pub mod product_create {
    use catalog_sync_core::{ProductId, ProductStatus};
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "ProductCreate";
    pub const QUERY: &str = r"
mutation ProductCreate($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      title
      handle
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description_html: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub product_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub vendor: Option<String>,
        pub tags: Vec<String>,
        pub status: ProductStatus,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub metafields: Vec<MetafieldInput>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub product_options: Vec<OptionCreateInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct MetafieldInput {
        pub namespace: String,
        pub key: String,
        pub value: String,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct OptionCreateInput {
        pub name: String,
        pub values: Vec<OptionValueCreateInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct OptionValueCreateInput {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub product: Option<Product>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Product {
        pub id: ProductId,
        pub title: String,
        pub handle: String,
    }
}

pub mod product_create_media {
    use catalog_sync_core::ProductId;
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "ProductCreateMedia";
    pub const QUERY: &str = r"
mutation ProductCreateMedia($productId: ID!, $media: [CreateMediaInput!]!) {
  productCreateMedia(productId: $productId, media: $media) {
    media {
      alt
      status
    }
    mediaUserErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: ProductId,
        pub media: Vec<CreateMediaInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaInput {
        pub alt: String,
        pub media_content_type: MediaContentType,
        pub original_source: String,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MediaContentType {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create_media: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub media: Option<Vec<Media>>,
        #[serde(default)]
        pub media_user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Media {
        pub alt: Option<String>,
        pub status: String,
    }
}

pub mod product_variants_bulk_create {
    use catalog_sync_core::{InventoryPolicy, LocationId, ProductId, VariantId};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use super::UserError;
    use crate::types::VariantCreateStrategy;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkCreate";
    pub const QUERY: &str = r"
mutation ProductVariantsBulkCreate(
  $productId: ID!
  $strategy: ProductVariantsBulkCreateStrategy
  $variants: [ProductVariantsBulkInput!]!
) {
  productVariantsBulkCreate(productId: $productId, strategy: $strategy, variants: $variants) {
    productVariants {
      id
      title
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: ProductId,
        pub strategy: VariantCreateStrategy,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkInput {
        pub option_values: Vec<VariantOptionValueInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub price: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub compare_at_price: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub barcode: Option<String>,
        pub taxable: bool,
        pub inventory_policy: InventoryPolicy,
        pub inventory_item: InventoryItemInput,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub inventory_quantities: Vec<InventoryLevelInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantOptionValueInput {
        pub name: String,
        pub option_name: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryItemInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sku: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub cost: Option<Decimal>,
        pub requires_shipping: bool,
        pub tracked: bool,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryLevelInput {
        pub location_id: LocationId,
        pub available_quantity: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_create: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub product_variants: Option<Vec<Variant>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Variant {
        pub id: VariantId,
        pub title: String,
    }
}

// =============================================================================
// Variant lookup
// =============================================================================

pub mod variants_by_sku {
    use catalog_sync_core::{
        InventoryItemId, InventoryLevelId, LocationId, Money, ProductId, VariantId,
    };
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use super::Connection;

    pub const OPERATION_NAME: &str = "VariantsBySku";
    pub const QUERY: &str = r#"
query VariantsBySku($query: String!, $first: Int!) {
  productVariants(first: $first, query: $query) {
    edges {
      node {
        id
        title
        sku
        price
        barcode
        product {
          id
          title
          handle
        }
        inventoryItem {
          id
          unitCost {
            amount
            currencyCode
          }
          inventoryLevels(first: 10) {
            edges {
              node {
                id
                location {
                  id
                }
                quantities(names: ["available"]) {
                  name
                  quantity
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub query: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants: Connection<Variant>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variant {
        pub id: VariantId,
        pub title: String,
        pub sku: Option<String>,
        pub price: Option<Decimal>,
        pub barcode: Option<String>,
        pub product: Product,
        pub inventory_item: InventoryItem,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Product {
        pub id: ProductId,
        pub title: String,
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryItem {
        pub id: InventoryItemId,
        pub unit_cost: Option<Money>,
        pub inventory_levels: Connection<InventoryLevel>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct InventoryLevel {
        pub id: InventoryLevelId,
        pub location: Location,
        #[serde(default)]
        pub quantities: Vec<Quantity>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Location {
        pub id: LocationId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Quantity {
        pub name: String,
        pub quantity: i64,
    }
}

// =============================================================================
// Inventory mutations
// =============================================================================

pub mod inventory_adjust_quantities {
    use catalog_sync_core::{InventoryItemId, LocationId};
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "InventoryAdjustQuantities";
    pub const QUERY: &str = r"
mutation InventoryAdjustQuantities($input: InventoryAdjustQuantitiesInput!) {
  inventoryAdjustQuantities(input: $input) {
    inventoryAdjustmentGroup {
      id
      reason
      changes {
        name
        delta
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: InventoryAdjustQuantitiesInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct InventoryAdjustQuantitiesInput {
        pub reason: String,
        pub name: String,
        pub changes: Vec<InventoryChangeInput>,
    }

    /// `changeFromQuantity` is always sent; `null` opts out of the
    /// compare-and-set check.
    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryChangeInput {
        pub delta: i64,
        pub inventory_item_id: InventoryItemId,
        pub location_id: LocationId,
        pub change_from_quantity: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub inventory_adjust_quantities: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub inventory_adjustment_group: Option<AdjustmentGroup>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct AdjustmentGroup {
        pub id: Option<String>,
        pub reason: String,
        #[serde(default)]
        pub changes: Vec<Change>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Change {
        pub name: String,
        pub delta: i64,
    }
}

pub mod inventory_item_update {
    use catalog_sync_core::{InventoryItemId, Money};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "InventoryItemUpdate";
    pub const QUERY: &str = r"
mutation InventoryItemUpdate($id: ID!, $input: InventoryItemInput!) {
  inventoryItemUpdate(id: $id, input: $input) {
    inventoryItem {
      id
      unitCost {
        amount
        currencyCode
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: InventoryItemId,
        pub input: InventoryItemInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct InventoryItemInput {
        pub cost: Decimal,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub inventory_item_update: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub inventory_item: Option<InventoryItem>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryItem {
        pub id: InventoryItemId,
        pub unit_cost: Option<Money>,
    }
}
