//! A single CSV record keyed by column name.

use std::sync::Arc;

/// One parsed CSV record.
///
/// Column names are shared between all rows of a file. Values are kept
/// exactly as read; the accessor methods do the trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: usize,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Create a row from shared headers and its values.
    ///
    /// `line` is the 1-based data line (the header is line 0). Missing
    /// trailing values read as empty.
    #[must_use]
    pub const fn new(line: usize, headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self {
            line,
            headers,
            values,
        }
    }

    /// Build a row from `(column, value)` pairs. Mostly useful in tests.
    #[must_use]
    pub fn from_pairs<K, V>(line: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (headers, values): (Vec<String>, Vec<String>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).unzip();
        Self::new(line, headers.into(), values)
    }

    /// 1-based data line number in the source file.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Column names, in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw values, in file order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Raw value of a column, untrimmed.
    #[must_use]
    pub fn raw(&self, column: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h == column)?;
        Some(self.values.get(index).map_or("", String::as_str))
    }

    /// Trimmed value of a column; `None` if the column is absent or blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.raw(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// First non-blank value among several candidate columns.
    #[must_use]
    pub fn get_any(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|column| self.get(column))
    }

    /// Split a column on `separator`, trimming each item.
    ///
    /// Positions are preserved (empty items stay in place) so that parallel
    /// lists such as sizes and quantities line up. A blank column yields an
    /// empty list.
    #[must_use]
    pub fn list(&self, column: &str, separator: char) -> Vec<&str> {
        self.get(column)
            .map(|value| value.split(separator).map(str::trim).collect())
            .unwrap_or_default()
    }

    /// Iterate `(column, raw value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), self.values.get(i).map_or("", String::as_str)))
    }
}
