//! Create draft products, with media and one variant per size, from a
//! supplier catalog.
//!
//! Per row: create the product, wait briefly so Shopify finishes setting
//! it up, attach the images, then bulk-create the variants replacing the
//! default standalone one. A failure after the product exists leaves the
//! product in place and names it in the row's error.

use std::time::Duration;

use catalog_sync_core::{
    InventoryPolicy, LocationId, ProductId, ProductStatus, Row, SkipReason, Sku, parse_amount,
};
use catalog_sync_shopify::{
    MediaImage, Metafield, NewProduct, NewVariant, ProductOption, VariantCreateStrategy,
};
use tracing::{debug, info, warn};

use crate::api::CatalogApi;
use crate::driver::{RowHandler, RowResult};
use crate::error::SyncError;

pub const TITLE_COLUMN: &str = "Product Title";
pub const IMAGES_COLUMN: &str = "Clean Images";
pub const SIZE_COLUMN: &str = "Size";
pub const QTY_COLUMN: &str = "Qty";
pub const BARCODE_COLUMN: &str = "Barcode";
pub const INVENTORY_COLUMN: &str = "Inventory";

/// `Inventory` value marking a product the supplier cannot ship.
pub const OUT_OF_STOCK: &str = "OUT OF STOCK";

/// Product option every variant is keyed on.
pub const SIZE_OPTION: &str = "Size";

/// Description used when the row has none.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// Metafield sources: `(namespace, key, column, multi-line)`.
const METAFIELD_COLUMNS: [(&str, &str, &str, bool); 15] = [
    ("category", "details", "Material", true),
    ("custom", "made_in", "Country", false),
    ("custom", "color", "Color detail", false),
    ("custom", "color_detail", "Color Supplier", false),
    ("custom", "season", "Season", false),
    ("custom", "dimensions", "Dimensions", false),
    ("custom", "year", "Year", false),
    ("custom", "bag_length", "Bag length", false),
    ("custom", "bag_height", "Bag height", false),
    ("custom", "bag_width", "Bag width", false),
    ("custom", "accessory_height", "Accessory height", false),
    ("custom", "accessory_length", "Accessory length", false),
    ("custom", "heel_height", "Heel height", false),
    ("custom", "fit", "Fit", false),
    ("custom", "size_info", "Sizing Standard", false),
];

/// What a successful row created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedListing {
    /// The new product.
    pub product_id: ProductId,
    /// Its handle.
    pub handle: String,
    /// Images attached.
    pub media: usize,
    /// Variants created.
    pub variants: usize,
}

/// The create-products job.
pub struct CreateProducts<'a, A> {
    api: &'a A,
    location_id: LocationId,
    post_create_pause: Duration,
}

impl<'a, A: CatalogApi> CreateProducts<'a, A> {
    /// Create the job. Initial quantities are placed at `location_id`.
    pub const fn new(api: &'a A, location_id: LocationId, post_create_pause: Duration) -> Self {
        Self {
            api,
            location_id,
            post_create_pause,
        }
    }
}

impl<A: CatalogApi> RowHandler for CreateProducts<'_, A> {
    type Record = CreatedListing;

    fn name(&self) -> &'static str {
        "create-products"
    }

    fn key(&self, row: &Row) -> String {
        row.get_any(&["SKU", TITLE_COLUMN])
            .unwrap_or_default()
            .to_string()
    }

    async fn handle(&self, row: &Row) -> Result<RowResult<CreatedListing>, SyncError> {
        let key = self.key(row);

        let Some(raw_title) = row.get(TITLE_COLUMN) else {
            return Ok(RowResult::missing(key, TITLE_COLUMN));
        };
        let images = image_urls(row);
        if images.is_empty() {
            return Ok(RowResult::missing(key, IMAGES_COLUMN));
        }
        if row.get(INVENTORY_COLUMN) == Some(OUT_OF_STOCK) {
            return Ok(RowResult::skipped(key, SkipReason::OutOfStock));
        }
        let sizes = row.list(SIZE_COLUMN, ',');
        if sizes.iter().all(|s| s.is_empty()) {
            return Ok(RowResult::missing(key, SIZE_COLUMN));
        }

        let title = format_title(raw_title);
        let product = build_product(row, &title, &sizes);
        let variants = build_variants(row, &sizes);
        let media: Vec<MediaImage> = images
            .into_iter()
            .map(|url| MediaImage {
                alt: title.clone(),
                source_url: url.to_string(),
            })
            .collect();

        debug!(key = %key, title = %title, sizes = sizes.len(), "Creating product");
        let created = self.api.create_product(product).await?;
        info!(product_id = %created.id, handle = %created.handle, "Product created");

        tokio::time::sleep(self.post_create_pause).await;

        // Variants are created even when the media upload failed
        let media_count = media.len();
        let media_result = self.api.create_product_media(&created.id, media).await;
        if let Err(err) = &media_result {
            warn!(product_id = %created.id, error = %err, "Media upload failed, creating variants anyway");
        }

        let variants = self
            .api
            .create_variants(
                &created.id,
                variants,
                &self.location_id,
                VariantCreateStrategy::RemoveStandaloneVariant,
            )
            .await
            .map_err(|source| SyncError::PartialCreate {
                product_id: created.id.clone(),
                step: "variants",
                source,
            })?;

        media_result.map_err(|source| SyncError::PartialCreate {
            product_id: created.id.clone(),
            step: "media",
            source,
        })?;

        Ok(RowResult::success(
            key,
            CreatedListing {
                product_id: created.id,
                handle: created.handle,
                media: media_count,
                variants: variants.len(),
            },
        ))
    }
}

/// Strip quotes and capitalize every space-separated word.
///
/// The first character of each word is upper-cased and the rest lower-cased;
/// runs of spaces are kept as they are.
#[must_use]
pub fn format_title(raw: &str) -> String {
    raw.replace(['\'', '"'], "")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// URL handle: the lower-cased title with every whitespace run turned into `-`.
#[must_use]
pub fn handle_for(title: &str) -> String {
    let mut handle = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                handle.push('-');
            }
            in_space = true;
        } else {
            handle.extend(c.to_lowercase());
            in_space = false;
        }
    }
    handle
}

/// Metafields for the row's non-empty attribute columns.
///
/// Values that are blank, `0` or `-` are dropped.
#[must_use]
pub fn metafields_for(row: &Row) -> Vec<Metafield> {
    METAFIELD_COLUMNS
        .iter()
        .filter_map(|&(namespace, key, column, multi_line)| {
            let value = row.get(column).filter(|v| !matches!(*v, "0" | "-"))?;
            Some(if multi_line {
                Metafield::multi_line(namespace, key, value)
            } else {
                Metafield::single_line(namespace, key, value)
            })
        })
        .collect()
}

fn image_urls(row: &Row) -> Vec<&str> {
    row.list(IMAGES_COLUMN, ',')
        .into_iter()
        .filter(|url| !url.is_empty())
        .collect()
}

fn build_product(row: &Row, title: &str, sizes: &[&str]) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        handle: Some(handle_for(title)),
        description_html: Some(row.get("Description").unwrap_or(DEFAULT_DESCRIPTION).to_string()),
        product_type: row.get("Tags").map(String::from),
        vendor: row.get("Vendor").map(String::from),
        tags: row
            .list("Tags", ',')
            .into_iter()
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        status: ProductStatus::Draft,
        metafields: metafields_for(row),
        options: vec![ProductOption {
            name: SIZE_OPTION.to_string(),
            values: sizes.iter().map(|s| (*s).to_string()).collect(),
        }],
    }
}

/// One variant per size, with positional quantity and barcode.
///
/// A missing or non-integer quantity reads as 0; a missing barcode as empty.
#[must_use]
pub fn build_variants(row: &Row, sizes: &[&str]) -> Vec<NewVariant> {
    let quantities = row.list(QTY_COLUMN, ',');
    let barcodes = row.list(BARCODE_COLUMN, ',');
    let amount = |column: &str| row.get(column).and_then(|v| parse_amount(v).ok());
    let price = amount("Retail Price");
    let compare_at_price = amount("Compare To Price");
    let cost = amount("Unit Cost");
    let sku = row.get("SKU").and_then(Sku::parse);

    sizes
        .iter()
        .enumerate()
        .map(|(i, size)| NewVariant {
            option_name: SIZE_OPTION.to_string(),
            option_value: (*size).to_string(),
            sku: sku.clone(),
            price,
            compare_at_price,
            cost,
            barcode: barcodes.get(i).map(|b| (*b).to_string()),
            inventory_quantity: quantities
                .get(i)
                .and_then(|q| q.parse().ok())
                .unwrap_or(0),
            taxable: true,
            requires_shipping: true,
            tracked: true,
            inventory_policy: InventoryPolicy::Deny,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_sync_core::Outcome;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::fake::{Call, FakeCatalog};
    use crate::driver::{FailurePolicy, drive};
    use crate::sink::VecSink;

    fn job(api: &FakeCatalog) -> CreateProducts<'_, FakeCatalog> {
        CreateProducts::new(api, LocationId::from_numeric(5), Duration::from_secs(1))
    }

    fn xyz_row() -> Row {
        Row::from_pairs(
            1,
            [
                ("Product Title", "leather 'tote' BAG"),
                ("Clean Images", "https://cdn.example.com/a.jpg, https://cdn.example.com/b.jpg"),
                ("SKU", "XYZ"),
                ("Size", "M,L"),
                ("Qty", "3,0"),
                ("Barcode", " 111 ,222"),
                ("Retail Price", "120.00"),
                ("Compare To Price", ""),
                ("Unit Cost", "45.50"),
                ("Tags", "Bags,Leather"),
                ("Vendor", "Acme"),
                ("Country", "Italy"),
                ("Year", "0"),
                ("Fit", "-"),
                ("Material", "Calf leather\nCotton lining"),
            ],
        )
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title("leather 'tote' BAG"), "Leather Tote Bag");
        assert_eq!(format_title("\"MINI\"  bag"), "Mini  Bag");
    }

    #[test]
    fn test_handle_collapses_whitespace() {
        assert_eq!(handle_for("Leather Tote Bag"), "leather-tote-bag");
        assert_eq!(handle_for("Mini  Bag"), "mini-bag");
    }

    #[test]
    fn test_metafields_drop_placeholder_values() {
        let fields = metafields_for(&xyz_row());
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["details", "made_in"]);
        assert_eq!(fields.first().unwrap().kind, "multi_line_text_field");
    }

    #[test]
    fn test_variants_follow_sizes_positionally() {
        let row = xyz_row();
        let variants = build_variants(&row, &["M", "L", "XL"]);
        let quantities: Vec<_> = variants.iter().map(|v| v.inventory_quantity).collect();
        assert_eq!(quantities, vec![3, 0, 0]);
        let barcodes: Vec<_> = variants.iter().map(|v| v.barcode.as_deref()).collect();
        assert_eq!(barcodes, vec![Some("111"), Some("222"), None]);
        let first = variants.first().unwrap();
        assert_eq!(first.price, Some(Decimal::new(12000, 2)));
        assert_eq!(first.compare_at_price, None);
        assert_eq!(first.cost, Some(Decimal::new(4550, 2)));
        assert_eq!(first.inventory_policy, InventoryPolicy::Deny);
    }

    #[tokio::test(start_paused = true)]
    async fn test_creates_product_media_then_two_variants() {
        let api = FakeCatalog::default();
        let rows = vec![xyz_row()];
        let mut sink = VecSink::default();

        let summary = drive(&rows, &job(&api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 1);

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        let Some(Call::CreateProduct(product)) = calls.first() else {
            panic!("expected product creation first, got {calls:?}");
        };
        assert_eq!(product.title, "Leather Tote Bag");
        assert_eq!(product.handle.as_deref(), Some("leather-tote-bag"));
        assert_eq!(product.status, ProductStatus::Draft);
        assert_eq!(product.description_html.as_deref(), Some(DEFAULT_DESCRIPTION));
        assert_eq!(product.tags, vec!["Bags", "Leather"]);
        assert_eq!(product.options.first().unwrap().values, vec!["M", "L"]);

        let Some(Call::CreateMedia(_, images)) = calls.get(1) else {
            panic!("expected media second, got {calls:?}");
        };
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|i| i.alt == "Leather Tote Bag"));

        let Some(Call::CreateVariants {
            variants,
            location_id,
            strategy,
            ..
        }) = calls.get(2)
        else {
            panic!("expected variants third, got {calls:?}");
        };
        assert_eq!(*strategy, VariantCreateStrategy::RemoveStandaloneVariant);
        assert_eq!(*location_id, LocationId::from_numeric(5));
        let entries: Vec<_> = variants
            .iter()
            .map(|v| (v.option_value.as_str(), v.inventory_quantity))
            .collect();
        assert_eq!(entries, vec![("M", 3), ("L", 0)]);

        let (_, result) = sink.results.first().unwrap();
        assert_eq!(result.key, "XYZ");
        assert_eq!(result.record.as_ref().map(|r| r.variants), Some(2));
    }

    #[tokio::test]
    async fn test_missing_title_or_images_makes_no_calls() {
        let api = FakeCatalog::default();
        let rows = vec![
            Row::from_pairs(1, [("Product Title", ""), ("Clean Images", "https://x/a.jpg"), ("SKU", "A")]),
            Row::from_pairs(2, [("Product Title", "Bag"), ("Clean Images", " "), ("SKU", "B")]),
            Row::from_pairs(
                3,
                [
                    ("Product Title", "Bag"),
                    ("Clean Images", "https://x/a.jpg"),
                    ("SKU", "C"),
                    ("Inventory", "OUT OF STOCK"),
                ],
            ),
        ];
        let mut sink = VecSink::default();

        let summary = drive(&rows, &job(&api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();

        assert!(api.calls().is_empty());
        assert_eq!(summary.skipped, 3);
        let outcomes: Vec<_> = sink.results.iter().map(|(_, r)| r.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Skipped(SkipReason::MissingField(TITLE_COLUMN.to_string())),
                Outcome::Skipped(SkipReason::MissingField(IMAGES_COLUMN.to_string())),
                Outcome::Skipped(SkipReason::OutOfStock),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_failure_names_created_product() {
        let api = FakeCatalog {
            media_error: Some("media.0.originalSource: Invalid URL".to_string()),
            ..FakeCatalog::default()
        };
        let rows = vec![xyz_row()];
        let mut sink = VecSink::default();

        let summary = drive(&rows, &job(&api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        let Some(Call::CreateVariants { variants, .. }) = calls.get(2) else {
            panic!("expected variants after failed media, got {calls:?}");
        };
        assert_eq!(variants.len(), 2);
        let (_, result) = sink.results.first().unwrap();
        let Outcome::Error(message) = &result.outcome else {
            panic!("expected error, got {:?}", result.outcome);
        };
        assert!(message.contains("gid://shopify/Product/77"));
        assert!(message.contains("media failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_variant_failure_outranks_media_failure() {
        let api = FakeCatalog {
            media_error: Some("media.0.originalSource: Invalid URL".to_string()),
            variants_error: Some("variants.0.price: must be positive".to_string()),
            ..FakeCatalog::default()
        };
        let rows = vec![xyz_row()];
        let mut sink = VecSink::default();

        drive(&rows, &job(&api), &mut sink, FailurePolicy::Continue)
            .await
            .unwrap();

        let (_, result) = sink.results.first().unwrap();
        let Outcome::Error(message) = &result.outcome else {
            panic!("expected error, got {:?}", result.outcome);
        };
        assert!(message.contains("variants failed"));
        assert!(message.contains("must be positive"));
    }
}
