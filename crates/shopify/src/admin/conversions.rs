//! Conversions between the GraphQL wire types and the domain types.

use catalog_sync_core::LocationId;

use super::queries::{
    UserError, inventory_adjust_quantities, product_create, product_create_media,
    product_variants_bulk_create, variants_by_sku,
};
use crate::AdminShopifyError;
use crate::types::{
    CreatedMedia, CreatedProduct, CreatedVariant, InventoryAdjustment, InventoryChange,
    InventoryLevel, MediaImage, NewProduct, NewVariant, ProductRef, SkuVariant,
};

/// Name of the inventory quantity the sync jobs read and adjust.
pub const AVAILABLE: &str = "available";

/// Turn a non-empty `userErrors` list into a `UserError` error.
pub fn check_user_errors(errors: &[UserError]) -> Result<(), AdminShopifyError> {
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            format!("{}: {}", field, e.message)
        })
        .collect();
    Err(AdminShopifyError::UserError(messages.join("; ")))
}

pub fn convert_new_product(product: NewProduct) -> product_create::ProductCreateInput {
    use product_create::{
        MetafieldInput, OptionCreateInput, OptionValueCreateInput, ProductCreateInput,
    };

    ProductCreateInput {
        title: product.title,
        handle: product.handle,
        description_html: product.description_html,
        product_type: product.product_type,
        vendor: product.vendor,
        tags: product.tags,
        status: product.status,
        metafields: product
            .metafields
            .into_iter()
            .map(|m| MetafieldInput {
                namespace: m.namespace,
                key: m.key,
                value: m.value,
                kind: m.kind,
            })
            .collect(),
        product_options: product
            .options
            .into_iter()
            .map(|o| OptionCreateInput {
                name: o.name,
                values: o
                    .values
                    .into_iter()
                    .map(|name| OptionValueCreateInput { name })
                    .collect(),
            })
            .collect(),
    }
}

pub fn convert_created_product(product: product_create::Product) -> CreatedProduct {
    CreatedProduct {
        id: product.id,
        title: product.title,
        handle: product.handle,
    }
}

pub fn convert_media_image(image: MediaImage) -> product_create_media::CreateMediaInput {
    product_create_media::CreateMediaInput {
        alt: image.alt,
        media_content_type: product_create_media::MediaContentType::Image,
        original_source: image.source_url,
    }
}

pub fn convert_created_media(media: product_create_media::Media) -> CreatedMedia {
    CreatedMedia {
        alt: media.alt,
        status: media.status,
    }
}

pub fn convert_new_variant(
    variant: NewVariant,
    location_id: &LocationId,
) -> product_variants_bulk_create::ProductVariantsBulkInput {
    use product_variants_bulk_create::{
        InventoryItemInput, InventoryLevelInput, ProductVariantsBulkInput, VariantOptionValueInput,
    };

    ProductVariantsBulkInput {
        option_values: vec![VariantOptionValueInput {
            name: variant.option_value,
            option_name: variant.option_name,
        }],
        price: variant.price,
        compare_at_price: variant.compare_at_price,
        barcode: variant.barcode.filter(|b| !b.is_empty()),
        taxable: variant.taxable,
        inventory_policy: variant.inventory_policy,
        inventory_item: InventoryItemInput {
            sku: variant.sku.map(String::from),
            cost: variant.cost,
            requires_shipping: variant.requires_shipping,
            tracked: variant.tracked,
        },
        inventory_quantities: vec![InventoryLevelInput {
            location_id: location_id.clone(),
            available_quantity: variant.inventory_quantity,
        }],
    }
}

pub fn convert_created_variant(variant: product_variants_bulk_create::Variant) -> CreatedVariant {
    CreatedVariant {
        id: variant.id,
        title: variant.title,
    }
}

pub fn convert_sku_variant(variant: variants_by_sku::Variant) -> SkuVariant {
    let item = variant.inventory_item;

    SkuVariant {
        id: variant.id,
        title: variant.title,
        sku: variant.sku,
        price: variant.price,
        barcode: variant.barcode,
        product: ProductRef {
            id: variant.product.id,
            title: variant.product.title,
            handle: variant.product.handle,
        },
        inventory_item_id: item.id,
        unit_cost: item.unit_cost,
        levels: item
            .inventory_levels
            .edges
            .into_iter()
            .map(|e| convert_inventory_level(e.node))
            .collect(),
    }
}

fn convert_inventory_level(level: variants_by_sku::InventoryLevel) -> InventoryLevel {
    let available = level
        .quantities
        .iter()
        .find(|q| q.name == AVAILABLE)
        .map_or(0, |q| q.quantity);

    InventoryLevel {
        id: level.id,
        location_id: level.location.id,
        available,
    }
}

pub fn convert_adjustment_group(
    group: inventory_adjust_quantities::AdjustmentGroup,
) -> InventoryAdjustment {
    InventoryAdjustment {
        group_id: group.id,
        reason: group.reason,
        changes: group
            .changes
            .into_iter()
            .map(|c| InventoryChange {
                name: c.name,
                delta: c.delta,
            })
            .collect(),
    }
}
