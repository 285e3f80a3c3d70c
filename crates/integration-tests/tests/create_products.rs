//! create-products end to end: CSV file to mutation bodies.

use std::time::Duration;

use catalog_sync::jobs::CreateProducts;
use catalog_sync::{CsvStatusSink, FailurePolicy, drive, load_table};
use catalog_sync_core::LocationId;
use catalog_sync_integration_tests::{bodies_for, client_for, data, fast_retry, operation};
use serde_json::{Value, json};
use wiremock::MockServer;

const CATALOG: &str = "\
Product Title,Clean Images,SKU,Size,Qty,Barcode,Retail Price,Compare To Price,Unit Cost,Tags,Vendor,Country,Year
leather 'tote' BAG,\"https://cdn.example.com/a.jpg,https://cdn.example.com/b.jpg\",XYZ,\"M,L\",\"3,0\",\"111,\",120.00,,45.50,\"Bags,Leather\",Acme,Italy,0
,https://cdn.example.com/c.jpg,NOTITLE,OS,1,,10,,5,,,,
Plain Cap,,NOIMG,OS,1,,10,,5,,,,
";

async fn mount_product_create(server: &MockServer) {
    operation("ProductCreate")
        .respond_with(data(json!({
            "productCreate": {
                "product": {
                    "id": "gid://shopify/Product/500",
                    "title": "Leather Tote Bag",
                    "handle": "leather-tote-bag"
                },
                "userErrors": []
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn catalog_file() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    std::fs::write(file.path(), CATALOG).expect("write catalog");
    file
}

fn pointer<'a>(body: &'a Value, path: &str) -> &'a Value {
    body.pointer(path).unwrap_or(&Value::Null)
}

#[tokio::test]
async fn test_creates_product_media_and_variants_in_order() {
    let server = MockServer::start().await;
    mount_product_create(&server).await;
    operation("ProductCreateMedia")
        .respond_with(data(json!({
            "productCreateMedia": {
                "media": [
                    { "alt": "Leather Tote Bag", "status": "UPLOADED" },
                    { "alt": "Leather Tote Bag", "status": "UPLOADED" }
                ],
                "mediaUserErrors": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    operation("ProductVariantsBulkCreate")
        .respond_with(data(json!({
            "productVariantsBulkCreate": {
                "productVariants": [
                    { "id": "gid://shopify/ProductVariant/1", "title": "M" },
                    { "id": "gid://shopify/ProductVariant/2", "title": "L" }
                ],
                "userErrors": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = catalog_file();
    let table = load_table(file.path()).expect("catalog should load");
    let client = client_for(&server, fast_retry(2));
    let job = CreateProducts::new(&client, LocationId::from_numeric(1), Duration::ZERO);
    let mut sink = CsvStatusSink::new(Vec::new()).expect("header should write");

    let summary = drive(table.rows(), &job, &mut sink, FailurePolicy::Continue)
        .await
        .expect("run should complete");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.skipped, 2);
    let report = String::from_utf8(sink.into_inner().expect("flush")).expect("UTF-8");
    assert!(report.contains("2,NOTITLE,skipped,missing Product Title"));
    assert!(report.contains("3,NOIMG,skipped,missing Clean Images"));

    let order: Vec<String> = server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter_map(|r| r.body_json::<Value>().ok())
        .filter_map(|b| b.get("operationName").and_then(Value::as_str).map(String::from))
        .collect();
    assert_eq!(
        order,
        vec!["ProductCreate", "ProductCreateMedia", "ProductVariantsBulkCreate"]
    );

    let product = bodies_for(&server, "ProductCreate").await;
    let product = product.first().expect("one product body");
    assert_eq!(pointer(product, "/variables/product/title"), "Leather Tote Bag");
    assert_eq!(pointer(product, "/variables/product/handle"), "leather-tote-bag");
    assert_eq!(pointer(product, "/variables/product/status"), "DRAFT");
    assert_eq!(pointer(product, "/variables/product/productType"), "Bags,Leather");
    assert_eq!(
        pointer(product, "/variables/product/descriptionHtml"),
        "No description available."
    );
    assert_eq!(
        pointer(product, "/variables/product/metafields"),
        &json!([{
            "namespace": "custom",
            "key": "made_in",
            "value": "Italy",
            "type": "single_line_text_field"
        }])
    );
    assert_eq!(
        pointer(product, "/variables/product/productOptions/0/values"),
        &json!([{ "name": "M" }, { "name": "L" }])
    );

    let media = bodies_for(&server, "ProductCreateMedia").await;
    let media = media.first().expect("one media body");
    assert_eq!(pointer(media, "/variables/productId"), "gid://shopify/Product/500");
    assert_eq!(pointer(media, "/variables/media/1/originalSource"), "https://cdn.example.com/b.jpg");
    assert_eq!(pointer(media, "/variables/media/0/mediaContentType"), "IMAGE");
    assert_eq!(pointer(media, "/variables/media/0/alt"), "Leather Tote Bag");

    let variants = bodies_for(&server, "ProductVariantsBulkCreate").await;
    let variants = variants.first().expect("one variants body");
    assert_eq!(pointer(variants, "/variables/strategy"), "REMOVE_STANDALONE_VARIANT");
    assert_eq!(pointer(variants, "/variables/variants/0/optionValues/0/name"), "M");
    assert_eq!(
        pointer(variants, "/variables/variants/0/inventoryQuantities/0"),
        &json!({ "locationId": "gid://shopify/Location/1", "availableQuantity": 3 })
    );
    assert_eq!(
        pointer(variants, "/variables/variants/1/inventoryQuantities/0/availableQuantity"),
        0
    );
    assert_eq!(pointer(variants, "/variables/variants/0/barcode"), "111");
    assert_eq!(pointer(variants, "/variables/variants/1/barcode"), &Value::Null);
    assert_eq!(pointer(variants, "/variables/variants/0/inventoryPolicy"), "DENY");
    assert_eq!(pointer(variants, "/variables/variants/0/inventoryItem/sku"), "XYZ");
    assert_eq!(pointer(variants, "/variables/variants/0/inventoryItem/tracked"), true);
}

#[tokio::test]
async fn test_media_failure_still_creates_variants() {
    let server = MockServer::start().await;
    mount_product_create(&server).await;
    operation("ProductCreateMedia")
        .respond_with(data(json!({
            "productCreateMedia": {
                "media": null,
                "mediaUserErrors": [{ "field": ["media", "0", "originalSource"], "message": "Image URL is invalid" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    operation("ProductVariantsBulkCreate")
        .respond_with(data(json!({
            "productVariantsBulkCreate": {
                "productVariants": [{ "id": "gid://shopify/ProductVariant/1", "title": "M" }],
                "userErrors": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = catalog_file();
    let table = load_table(file.path()).expect("catalog should load");
    let rows = table.rows().get(..1).expect("first row");
    let client = client_for(&server, fast_retry(2));
    let job = CreateProducts::new(&client, LocationId::from_numeric(1), Duration::ZERO);
    let mut sink = CsvStatusSink::new(Vec::new()).expect("header should write");

    let summary = drive(rows, &job, &mut sink, FailurePolicy::Continue)
        .await
        .expect("run should complete");

    assert_eq!(summary.failed, 1);
    let report = String::from_utf8(sink.into_inner().expect("flush")).expect("UTF-8");
    assert!(report.contains("product gid://shopify/Product/500 created but media failed"));
    assert!(report.contains("media.0.originalSource: Image URL is invalid"));
}
