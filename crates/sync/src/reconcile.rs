//! Offline reconciliation of a supplier catalog against a store snapshot.
//!
//! Works entirely on files in one folder: the supplier catalog, the
//! running SKU list (`all_skus.csv`) and the find-products outputs
//! (`shopify_data.csv`, `to_add.csv`). Produces the input files for the
//! next create/update/zero runs. No remote calls are made.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use catalog_sync_core::{Row, parse_amount};
use tracing::{info, warn};

use crate::error::{ReconcileError, SinkError};
use crate::sink::{SNAPSHOT_FILE, SNAPSHOT_HEADER, SNAPSHOT_LIST_SEPARATOR, TO_ADD_FILE};
use crate::source::load_table;

pub const ALL_SKUS_FILE: &str = "all_skus.csv";
pub const OS_ADD_FILE: &str = "os_add_products.csv";
pub const OTHERS_ADD_FILE: &str = "others_add_products.csv";
pub const ZERO_INVENTORY_FILE: &str = "zero_inventory_shopify.csv";
pub const QTY_UPDATE_FILE: &str = "os_update_products.csv";
pub const COST_DIFF_FILE: &str = "different_costs.csv";

/// Size value of one-size products.
pub const ONE_SIZE: &str = "OS";

const SKU: &str = "SKU";
const SIZE: &str = "Size";
const QTY: &str = "Qty";
const UNIT_COST: &str = "Unit Cost";

/// Separator of the supplier's size and quantity lists.
const SUPPLIER_LIST_SEPARATOR: char = ',';

/// Header of the quantity update list.
pub const QTY_UPDATE_HEADER: [&str; 4] = ["SKU", "Size", "Qty_shopify", "Qty_supplier"];

/// Header of the cost difference list.
pub const COST_DIFF_HEADER: [&str; 3] = ["SKU", "Unit Cost_shopify", "Unit Cost_supplier"];

/// Record counts of each output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub os_add: usize,
    pub others_add: usize,
    pub all_skus: usize,
    pub zero_inventory: usize,
    pub quantity_updates: usize,
    pub cost_updates: usize,
}

/// A size whose store quantity differs from the supplier's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDiff {
    pub sku: String,
    pub size: String,
    pub shopify: String,
    pub supplier: String,
}

/// A SKU whose store unit cost differs from the supplier's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostDiff {
    pub sku: String,
    pub shopify: String,
    pub supplier: String,
}

/// Reconcile the files in `folder`.
///
/// `clean_file` is the supplier catalog, resolved relative to `folder`.
/// A missing `all_skus.csv` is treated as an empty SKU list; every other
/// input must exist.
///
/// # Errors
///
/// Returns `ReconcileError::Source` if an input cannot be loaded or lacks a
/// required column, and `ReconcileError::Sink` if an output cannot be
/// written.
pub fn reconcile(folder: &Path, clean_file: &Path) -> Result<ReconcileSummary, ReconcileError> {
    let supplier = load_table(&folder.join(clean_file))?;
    supplier.require_columns(&[SKU, SIZE, QTY, UNIT_COST])?;

    let snapshot = load_table(&folder.join(SNAPSHOT_FILE))?;
    snapshot.require_columns(&SNAPSHOT_HEADER)?;

    let to_add_table = load_table(&folder.join(TO_ADD_FILE))?;
    to_add_table.require_columns(&[SKU])?;
    let to_add = sku_column(to_add_table.rows());

    let all_skus_path = folder.join(ALL_SKUS_FILE);
    let previous = if all_skus_path.exists() {
        let table = load_table(&all_skus_path)?;
        table.require_columns(&[SKU])?;
        sku_column(table.rows())
    } else {
        warn!(path = %all_skus_path.display(), "No previous SKU list, starting empty");
        Vec::new()
    };

    let mut summary = ReconcileSummary::default();

    let (one_size, others) = new_products(supplier.rows(), &to_add);
    summary.os_add = write_rows(&folder.join(OS_ADD_FILE), supplier.headers(), &one_size)?;
    summary.others_add = write_rows(&folder.join(OTHERS_ADD_FILE), supplier.headers(), &others)?;

    let merged = merge_skus(&previous, &to_add);
    summary.all_skus = write_skus(&all_skus_path, &merged)?;

    let zero = absent_from(&previous, supplier.rows());
    summary.zero_inventory = write_skus(&folder.join(ZERO_INVENTORY_FILE), &zero)?;

    let quantities = quantity_diffs(snapshot.rows(), supplier.rows());
    summary.quantity_updates = write_records(
        &folder.join(QTY_UPDATE_FILE),
        &QTY_UPDATE_HEADER,
        quantities
            .iter()
            .map(|d| [d.sku.as_str(), d.size.as_str(), d.shopify.as_str(), d.supplier.as_str()]),
    )?;

    let costs = cost_diffs(snapshot.rows(), supplier.rows());
    summary.cost_updates = write_records(
        &folder.join(COST_DIFF_FILE),
        &COST_DIFF_HEADER,
        costs
            .iter()
            .map(|d| [d.sku.as_str(), d.shopify.as_str(), d.supplier.as_str()]),
    )?;

    info!(
        folder = %folder.display(),
        os_add = summary.os_add,
        others_add = summary.others_add,
        all_skus = summary.all_skus,
        zero_inventory = summary.zero_inventory,
        quantity_updates = summary.quantity_updates,
        cost_updates = summary.cost_updates,
        "Reconcile complete"
    );
    Ok(summary)
}

fn sku_column(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(SKU))
        .map(String::from)
        .collect()
}

/// Supplier rows whose SKU is in `to_add`, exact duplicates removed, split
/// into one-size and sized products.
fn new_products<'a>(supplier: &'a [Row], to_add: &[String]) -> (Vec<&'a Row>, Vec<&'a Row>) {
    let wanted: HashSet<&str> = to_add.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    supplier
        .iter()
        .filter(|row| row.get(SKU).is_some_and(|sku| wanted.contains(sku)))
        .filter(|row| seen.insert(row.values()))
        .partition(|row| row.get(SIZE) == Some(ONE_SIZE))
}

/// `previous` followed by `added`, first occurrence kept.
fn merge_skus(previous: &[String], added: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    previous
        .iter()
        .chain(added)
        .filter(|sku| seen.insert(sku.as_str()))
        .cloned()
        .collect()
}

/// SKUs of `previous` the supplier no longer lists.
fn absent_from(previous: &[String], supplier: &[Row]) -> Vec<String> {
    let listed: HashSet<&str> = supplier.iter().filter_map(|row| row.get(SKU)).collect();
    previous
        .iter()
        .filter(|sku| !listed.contains(sku.as_str()))
        .cloned()
        .collect()
}

/// `(sku, size, qty)` triples from parallel size and quantity lists.
///
/// Lists of different lengths are paired up to the shorter one.
fn explode<'a>(
    row: &'a Row,
    size_column: &str,
    qty_column: &str,
    separator: char,
) -> Vec<(&'a str, &'a str, &'a str)> {
    let Some(sku) = row.get(SKU) else {
        return Vec::new();
    };
    let sizes = row.list(size_column, separator);
    let quantities = row.list(qty_column, separator);
    if sizes.len() != quantities.len() {
        warn!(
            sku,
            line = row.line(),
            sizes = sizes.len(),
            quantities = quantities.len(),
            "Size and quantity lists differ in length"
        );
    }
    sizes
        .into_iter()
        .zip(quantities)
        .map(|(size, qty)| (sku, size, qty))
        .collect()
}

fn quantities_equal(a: &str, b: &str) -> bool {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn costs_equal(a: &str, b: &str) -> bool {
    match (parse_amount(a), parse_amount(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim() == b.trim(),
    }
}

/// Sizes present in both the snapshot and the supplier catalog whose
/// quantities differ, in snapshot order.
fn quantity_diffs(snapshot: &[Row], supplier: &[Row]) -> Vec<QuantityDiff> {
    let [_, sizes, quantities, _] = SNAPSHOT_HEADER;
    let separator = SNAPSHOT_LIST_SEPARATOR.chars().next().unwrap_or(';');
    let mut supplier_qty: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
    for (sku, size, qty) in supplier
        .iter()
        .flat_map(|row| explode(row, SIZE, QTY, SUPPLIER_LIST_SEPARATOR))
    {
        supplier_qty.entry((sku, size)).or_default().push(qty);
    }

    let mut diffs = Vec::new();
    for (sku, size, shopify) in snapshot
        .iter()
        .flat_map(|row| explode(row, sizes, quantities, separator))
    {
        let Some(listed) = supplier_qty.get(&(sku, size)) else {
            continue;
        };
        diffs.extend(
            listed
                .iter()
                .filter(|qty| !quantities_equal(shopify, qty))
                .map(|qty| QuantityDiff {
                    sku: sku.to_string(),
                    size: size.to_string(),
                    shopify: shopify.to_string(),
                    supplier: (*qty).to_string(),
                }),
        );
    }
    diffs
}

/// SKUs present in both files whose unit costs differ, in snapshot order.
fn cost_diffs(snapshot: &[Row], supplier: &[Row]) -> Vec<CostDiff> {
    let cost = |row: &Row| row.get(UNIT_COST).unwrap_or_default().to_string();
    let mut supplier_cost: HashMap<&str, Vec<String>> = HashMap::new();
    for row in supplier {
        if let Some(sku) = row.get(SKU) {
            supplier_cost.entry(sku).or_default().push(cost(row));
        }
    }

    let mut diffs = Vec::new();
    for row in snapshot {
        let Some(sku) = row.get(SKU) else {
            continue;
        };
        let Some(listed) = supplier_cost.get(sku) else {
            continue;
        };
        let shopify = cost(row);
        diffs.extend(
            listed
                .iter()
                .filter(|supplier| !costs_equal(&shopify, supplier))
                .map(|supplier| CostDiff {
                    sku: sku.to_string(),
                    shopify: shopify.clone(),
                    supplier: supplier.clone(),
                }),
        );
    }
    diffs
}

fn write_records<I, F>(path: &Path, header: &[&str], records: I) -> Result<usize, SinkError>
where
    I: IntoIterator<Item = F>,
    F: IntoIterator,
    F::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;
    let mut count = 0;
    for record in records {
        writer.write_record(record)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

fn write_rows(path: &Path, headers: &[String], rows: &[&Row]) -> Result<usize, SinkError> {
    write_records(
        path,
        &headers.iter().map(String::as_str).collect::<Vec<_>>(),
        rows.iter().map(|row| row.iter().map(|(_, value)| value)),
    )
}

fn write_skus(path: &Path, skus: &[String]) -> Result<usize, SinkError> {
    write_records(path, &[SKU], skus.iter().map(|sku| [sku.as_str()]))
}
