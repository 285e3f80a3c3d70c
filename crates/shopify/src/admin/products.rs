//! Product and variant creation for the Admin API.

use catalog_sync_core::{LocationId, ProductId};
use tracing::instrument;

use super::{
    AdminClient,
    conversions::{
        check_user_errors, convert_created_product, convert_created_variant, convert_new_product,
        convert_new_variant,
    },
    queries::{self, ProductCreate, ProductVariantsBulkCreate},
};
use crate::types::{CreatedProduct, CreatedVariant, NewProduct, NewVariant, VariantCreateStrategy};
use crate::{AdminShopifyError, GraphQLError};

impl AdminClient {
    /// Create a new product (without variants or media).
    ///
    /// # Arguments
    ///
    /// * `product` - Title, handle, status, metafields and options
    ///
    /// # Returns
    ///
    /// Returns the created product's ID, title and handle on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        let variables = queries::product_create::Variables {
            product: convert_new_product(product),
        };

        let response = self.execute::<ProductCreate>(variables).await?;

        if let Some(payload) = response.product_create {
            check_user_errors(&payload.user_errors)?;

            if let Some(product) = payload.product {
                return Ok(convert_created_product(product));
            }
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::client(
            "No product returned from create",
        )]))
    }

    /// Create variants on an existing product in one call.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Product the variants belong to
    /// * `variants` - Variants to create, one per option value
    /// * `location_id` - Location their initial quantities are placed at
    /// * `strategy` - Whether the default standalone variant is kept
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(
        skip(self, product_id, variants),
        fields(product_id = %product_id, variant_count = variants.len())
    )]
    pub async fn create_variants(
        &self,
        product_id: &ProductId,
        variants: Vec<NewVariant>,
        location_id: &LocationId,
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<CreatedVariant>, AdminShopifyError> {
        let variables = queries::product_variants_bulk_create::Variables {
            product_id: product_id.clone(),
            strategy,
            variants: variants
                .into_iter()
                .map(|v| convert_new_variant(v, location_id))
                .collect(),
        };

        let response = self.execute::<ProductVariantsBulkCreate>(variables).await?;

        if let Some(payload) = response.product_variants_bulk_create {
            check_user_errors(&payload.user_errors)?;

            return Ok(payload
                .product_variants
                .unwrap_or_default()
                .into_iter()
                .map(convert_created_variant)
                .collect());
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::client(
            "Variant creation failed",
        )]))
    }
}
