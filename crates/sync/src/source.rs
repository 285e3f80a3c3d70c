//! CSV input loading.
//!
//! Files are read completely before any row is processed. A file that
//! cannot be opened or parsed fails the run instead of yielding zero rows.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalog_sync_core::Row;
use tracing::{debug, info};

use crate::error::SourceError;

/// A loaded CSV file: its header row and data rows in file order.
#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    headers: Arc<[String]>,
    rows: Vec<Row>,
}

impl CsvTable {
    /// Source path (or label for in-memory input).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names from the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the table, keeping only its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Check that every named column is present in the header row.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::MissingColumn` for the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), SourceError> {
        for column in columns {
            if !self.headers.iter().any(|h| h == column) {
                return Err(SourceError::MissingColumn {
                    path: self.path.clone(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check that at least one of several alternative columns is present.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::MissingColumn` naming the first alternative.
    pub fn require_any_column(&self, columns: &[&str]) -> Result<(), SourceError> {
        if columns
            .iter()
            .any(|column| self.headers.iter().any(|h| h == column))
        {
            return Ok(());
        }
        Err(SourceError::MissingColumn {
            path: self.path.clone(),
            column: columns.first().copied().unwrap_or_default().to_string(),
        })
    }
}

/// Load a CSV file with a header row.
///
/// # Errors
///
/// Returns `SourceError::Open` if the file cannot be opened and
/// `SourceError::Csv` if any record fails to parse.
pub fn load_table(path: &Path) -> Result<CsvTable, SourceError> {
    let file = std::fs::File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, path)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        "Loaded CSV"
    );
    Ok(table)
}

/// Load only the data rows of a CSV file.
///
/// # Errors
///
/// See [`load_table`].
pub fn load_rows(path: &Path) -> Result<Vec<Row>, SourceError> {
    load_table(path).map(CsvTable::into_rows)
}

/// Parse CSV from any reader. `path` labels errors.
///
/// Records may be shorter or longer than the header; missing cells read
/// as empty and extra cells are kept but unnamed.
///
/// # Errors
///
/// Returns `SourceError::Csv` if the header or any record fails to parse.
pub fn read_table<R: Read>(reader: R, path: &Path) -> Result<CsvTable, SourceError> {
    let csv_error = |source| SourceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Arc<[String]> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>()
        .into();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let values = record.iter().map(str::to_string).collect();
        rows.push(Row::new(index + 1, Arc::clone(&headers), values));
    }

    debug!(path = %path.display(), columns = headers.len(), "Parsed CSV header");

    Ok(CsvTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_table_preserves_order_and_lines() {
        let input = "SKU,Size,Qty\nABC123,M,5\nXYZ,\"M,L\",\"3,0\"\n";
        let table = read_table(input.as_bytes(), Path::new("inline.csv")).unwrap();

        assert_eq!(table.headers(), ["SKU", "Size", "Qty"]);
        let skus: Vec<_> = table.rows().iter().map(|r| r.get("SKU")).collect();
        assert_eq!(skus, vec![Some("ABC123"), Some("XYZ")]);
        assert_eq!(table.rows().get(1).map(Row::line), Some(2));
        assert_eq!(table.rows().get(1).unwrap().list("Qty", ','), vec!["3", "0"]);
    }

    #[test]
    fn test_short_records_are_accepted() {
        let input = "SKU,Size,Qty\nABC123\n";
        let table = read_table(input.as_bytes(), Path::new("inline.csv")).unwrap();
        let row = table.rows().first().unwrap();
        assert_eq!(row.get("Qty"), None);
    }

    #[test]
    fn test_missing_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rows(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SKU").unwrap();
        writeln!(file, "A1").unwrap();
        writeln!(file, "B2").unwrap();

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_require_columns() {
        let table = read_table("SKU,Qty\n".as_bytes(), Path::new("t.csv")).unwrap();
        assert!(table.require_columns(&["SKU", "Qty"]).is_ok());
        assert!(table.require_any_column(&["Qty_supplier", "Qty"]).is_ok());
        let err = table.require_columns(&["Size"]).unwrap_err();
        assert_eq!(err.to_string(), "t.csv has no \"Size\" column");
    }
}
