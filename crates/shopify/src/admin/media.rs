//! Media attachment for products.

use catalog_sync_core::ProductId;
use tracing::instrument;

use super::{
    AdminClient,
    conversions::{check_user_errors, convert_created_media, convert_media_image},
    queries::{self, ProductCreateMedia},
};
use crate::types::{CreatedMedia, MediaImage};
use crate::{AdminShopifyError, GraphQLError};

impl AdminClient {
    /// Attach external images to a product.
    ///
    /// Shopify downloads each image from its source URL asynchronously, so
    /// the returned media are usually still `UPLOADED` or `PROCESSING`.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product ID
    /// * `images` - Images to attach, in display order
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns media user errors.
    #[instrument(
        skip(self, product_id, images),
        fields(product_id = %product_id, image_count = images.len())
    )]
    pub async fn create_product_media(
        &self,
        product_id: &ProductId,
        images: Vec<MediaImage>,
    ) -> Result<Vec<CreatedMedia>, AdminShopifyError> {
        let variables = queries::product_create_media::Variables {
            product_id: product_id.clone(),
            media: images.into_iter().map(convert_media_image).collect(),
        };

        let response = self.execute::<ProductCreateMedia>(variables).await?;

        if let Some(payload) = response.product_create_media {
            check_user_errors(&payload.media_user_errors)?;

            return Ok(payload
                .media
                .unwrap_or_default()
                .into_iter()
                .map(convert_created_media)
                .collect());
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::client(
            "Media creation failed",
        )]))
    }
}
