//! Outcome sinks.
//!
//! A sink receives one call per processed row, in processing order, and is
//! finished exactly once after the last row. Sinks are append-only.

use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use catalog_sync_core::{Outcome, Row};
use tracing::{info, warn};

use crate::driver::RowResult;
use crate::error::SinkError;
use crate::jobs::find_products::SnapshotRecord;

/// Header of the CSV status report.
pub const STATUS_HEADER: [&str; 4] = ["line", "key", "outcome", "detail"];

/// Destination for per-row results.
pub trait Sink<R> {
    /// Record the result of one row.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the result cannot be written.
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError>;

    /// Flush and close. Called once, after the last row.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if buffered output cannot be flushed.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Writes both sinks, first `A` then `B`.
impl<R, A: Sink<R>, B: Sink<R>> Sink<R> for (A, B) {
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError> {
        self.0.record(row, result)?;
        self.1.record(row, result)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.0.finish()?;
        self.1.finish()
    }
}

/// Discards everything.
impl<R> Sink<R> for () {
    fn record(&mut self, _row: &Row, _result: &RowResult<R>) -> Result<(), SinkError> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// An optional sink; `None` discards everything.
impl<R, S: Sink<R>> Sink<R> for Option<S> {
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError> {
        self.as_mut().map_or(Ok(()), |sink| sink.record(row, result))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.as_mut().map_or(Ok(()), Sink::finish)
    }
}

// =============================================================================
// Log sink
// =============================================================================

/// Emits one `tracing` event per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink {
    job: &'static str,
}

impl LogSink {
    /// Create a log sink that tags events with the job name.
    #[must_use]
    pub const fn new(job: &'static str) -> Self {
        Self { job }
    }
}

impl<R: Debug> Sink<R> for LogSink {
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError> {
        let line = row.line();
        let key = result.key.as_str();
        match &result.outcome {
            Outcome::Success => {
                info!(job = self.job, line, key, record = ?result.record, "Row succeeded");
            }
            Outcome::Skipped(reason) => {
                info!(job = self.job, line, key, reason = %reason, "Row skipped");
            }
            Outcome::NotFound => {
                warn!(job = self.job, line, key, "SKU not found in store");
            }
            // The driver already logged the failure at error level
            Outcome::Error(message) => {
                warn!(job = self.job, line, key, error = %message, "Row recorded as error");
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

// =============================================================================
// CSV status sink
// =============================================================================

/// CSV report with one `line,key,outcome,detail` record per row.
pub struct CsvStatusSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvStatusSink<File> {
    /// Create (or truncate) a status report file.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the file cannot be created or the header
    /// cannot be written.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvStatusSink<W> {
    /// Wrap a writer and write the header row.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Csv` if the header cannot be written.
    pub fn new(writer: W) -> Result<Self, SinkError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(STATUS_HEADER)?;
        Ok(Self { writer })
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Io` if the flush fails.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<R, W: Write> Sink<R> for CsvStatusSink<W> {
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError> {
        let line = row.line().to_string();
        let detail = result.outcome.detail();
        self.writer.write_record([
            line.as_str(),
            result.key.as_str(),
            result.outcome.kind().as_str(),
            detail.as_str(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// Snapshot sink
// =============================================================================

/// File name of the catalog snapshot.
pub const SNAPSHOT_FILE: &str = "shopify_data.csv";
/// File name of the list of SKUs missing from the store.
pub const TO_ADD_FILE: &str = "to_add.csv";

/// Header of the catalog snapshot.
pub const SNAPSHOT_HEADER: [&str; 4] = ["SKU", "Sizes", "Quantities", "Unit Cost"];

/// Separator joining sizes and quantities inside one snapshot cell.
pub const SNAPSHOT_LIST_SEPARATOR: &str = ";";

/// Two-file output of the find-products job.
///
/// Found SKUs go to the snapshot (`SKU,Sizes,Quantities,Unit Cost`), SKUs
/// the store does not have go to the to-add list (`SKU`). Other outcomes
/// are not written.
pub struct SnapshotSink<W: Write> {
    data: csv::Writer<W>,
    to_add: csv::Writer<W>,
}

impl SnapshotSink<File> {
    /// Create `shopify_data.csv` and `to_add.csv` in `folder`.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if either file cannot be created.
    pub fn create(folder: &Path) -> Result<Self, SinkError> {
        std::fs::create_dir_all(folder)?;
        Self::new(
            File::create(folder.join(SNAPSHOT_FILE))?,
            File::create(folder.join(TO_ADD_FILE))?,
        )
    }
}

impl<W: Write> SnapshotSink<W> {
    /// Wrap two writers and write both header rows.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Csv` if a header cannot be written.
    pub fn new(data: W, to_add: W) -> Result<Self, SinkError> {
        let mut data = csv::Writer::from_writer(data);
        data.write_record(SNAPSHOT_HEADER)?;
        let mut to_add = csv::Writer::from_writer(to_add);
        to_add.write_record(["SKU"])?;
        Ok(Self { data, to_add })
    }

    /// Flush and return the snapshot and to-add writers.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Io` if a flush fails.
    pub fn into_inner(self) -> Result<(W, W), SinkError> {
        let data = self
            .data
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))?;
        let to_add = self
            .to_add
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))?;
        Ok((data, to_add))
    }
}

impl<W: Write> Sink<SnapshotRecord> for SnapshotSink<W> {
    fn record(
        &mut self,
        _row: &Row,
        result: &RowResult<SnapshotRecord>,
    ) -> Result<(), SinkError> {
        match (&result.outcome, &result.record) {
            (Outcome::Success, Some(record)) => {
                let sizes = record.sizes.join(SNAPSHOT_LIST_SEPARATOR);
                let quantities = record
                    .quantities
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(SNAPSHOT_LIST_SEPARATOR);
                let cost = record
                    .unit_cost
                    .map(|c| c.normalize().to_string())
                    .unwrap_or_default();
                self.data.write_record([
                    result.key.as_str(),
                    sizes.as_str(),
                    quantities.as_str(),
                    cost.as_str(),
                ])?;
            }
            (Outcome::NotFound, _) => {
                self.to_add.write_record([result.key.as_str()])?;
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.data.flush()?;
        self.to_add.flush()?;
        Ok(())
    }
}

// =============================================================================
// Test sink
// =============================================================================

/// Collects results in memory.
#[cfg(test)]
#[derive(Debug)]
pub struct VecSink<R> {
    pub results: Vec<(usize, RowResult<R>)>,
    pub finished: bool,
}

#[cfg(test)]
impl<R> Default for VecSink<R> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            finished: false,
        }
    }
}

#[cfg(test)]
impl<R: Clone> Sink<R> for VecSink<R> {
    fn record(&mut self, row: &Row, result: &RowResult<R>) -> Result<(), SinkError> {
        self.results.push((row.line(), result.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_sync_core::SkipReason;
    use rust_decimal::Decimal;

    use super::*;

    fn row(line: usize, sku: &str) -> Row {
        Row::from_pairs(line, [("SKU", sku)])
    }

    #[test]
    fn test_status_sink_writes_one_line_per_row() {
        let mut sink = CsvStatusSink::new(Vec::new()).unwrap();
        let results: [RowResult<()>; 3] = [
            RowResult {
                key: "A1".to_string(),
                outcome: Outcome::Success,
                record: Some(()),
            },
            RowResult::skipped("B2", SkipReason::NoUpdateNeeded),
            RowResult::error("C3", "User error: cost: invalid, too high"),
        ];
        for (i, result) in results.iter().enumerate() {
            sink.record(&row(i + 1, &result.key), result).unwrap();
        }
        Sink::<()>::finish(&mut sink).unwrap();

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "line,key,outcome,detail\n\
             1,A1,success,\n\
             2,B2,skipped,no update needed\n\
             3,C3,error,\"User error: cost: invalid, too high\"\n"
        );
    }

    #[test]
    fn test_snapshot_sink_splits_found_and_missing() {
        let mut sink = SnapshotSink::new(Vec::new(), Vec::new()).unwrap();

        let found = RowResult::success(
            "ABC123",
            SnapshotRecord {
                sizes: vec!["M".to_string(), "L".to_string()],
                quantities: vec![3, 0],
                unit_cost: Some(Decimal::new(4550, 2)),
            },
        );
        sink.record(&row(1, "ABC123"), &found).unwrap();
        sink.record(&row(2, "NOPE"), &RowResult::not_found("NOPE"))
            .unwrap();
        sink.record(&row(3, ""), &RowResult::missing("", "SKU"))
            .unwrap();
        sink.finish().unwrap();

        let (data, to_add) = sink.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "SKU,Sizes,Quantities,Unit Cost\nABC123,M;L,3;0,45.5\n"
        );
        assert_eq!(String::from_utf8(to_add).unwrap(), "SKU\nNOPE\n");
    }

    #[test]
    fn test_snapshot_files_created_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("out");
        let mut sink = SnapshotSink::create(&folder).unwrap();
        sink.finish().unwrap();

        assert!(folder.join(SNAPSHOT_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(folder.join(TO_ADD_FILE)).unwrap(),
            "SKU\n"
        );
    }

    #[test]
    fn test_optional_and_paired_sinks() {
        let mut pair: (VecSink<u8>, Option<VecSink<u8>>) = (VecSink::default(), None);
        pair.record(&row(1, "A"), &RowResult::success("A", 1)).unwrap();
        pair.finish().unwrap();
        assert_eq!(pair.0.results.len(), 1);
        assert!(pair.0.finished);
    }
}
