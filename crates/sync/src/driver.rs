//! Sequential row driver.
//!
//! Rows are processed strictly one at a time, in file order. Each row's
//! handler runs to completion (including any throttle backoff inside the
//! client) before the next row starts.

use std::time::{Duration, Instant};

use catalog_sync_core::{Outcome, OutcomeKind, Row, SkipReason};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::sink::Sink;

/// What to do after a row ends in an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the error and move on to the next row.
    #[default]
    Continue,
    /// Record the error and stop the run.
    Abort,
}

/// Result of handling one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult<R> {
    /// Identifies the row in reports (usually the SKU).
    pub key: String,
    /// What happened.
    pub outcome: Outcome,
    /// Data derived from the row, present on success for jobs that produce any.
    pub record: Option<R>,
}

impl<R> RowResult<R> {
    /// Successful row with a derived record.
    pub fn success(key: impl Into<String>, record: R) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::Success,
            record: Some(record),
        }
    }

    /// Row that was deliberately not applied.
    pub fn skipped(key: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::Skipped(reason),
            record: None,
        }
    }

    /// Row skipped because the store already matches.
    pub fn no_update_needed(key: impl Into<String>) -> Self {
        Self::skipped(key, SkipReason::NoUpdateNeeded)
    }

    /// Row skipped because a required column is blank.
    pub fn missing(key: impl Into<String>, column: &str) -> Self {
        Self::skipped(key, SkipReason::MissingField(column.to_string()))
    }

    /// Row whose SKU is not in the store.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::NotFound,
            record: None,
        }
    }

    /// Row that failed.
    pub fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::Error(message.into()),
            record: None,
        }
    }
}

/// Per-row job logic.
#[allow(async_fn_in_trait)]
pub trait RowHandler {
    /// Data produced for successful rows.
    type Record;

    /// Job name used in logs and the run summary.
    fn name(&self) -> &'static str;

    /// Key recorded when `handle` fails before producing a result.
    fn key(&self, row: &Row) -> String {
        row.get("SKU").unwrap_or_default().to_string()
    }

    /// Process one row.
    ///
    /// Skips and not-found are reported through `Ok`; an `Err` becomes an
    /// `error` outcome for this row only.
    async fn handle(&self, row: &Row) -> Result<RowResult<Self::Record>, SyncError>;
}

/// Counts and timing for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Job name.
    pub job: &'static str,
    /// Rows in the input.
    pub total: usize,
    /// Rows processed before the run ended.
    pub processed: usize,
    /// Rows that succeeded.
    pub succeeded: usize,
    /// Rows skipped (including "no update needed").
    pub skipped: usize,
    /// Rows whose SKU was not found.
    pub not_found: usize,
    /// Rows that failed.
    pub failed: usize,
    /// Whether the run stopped early under `FailurePolicy::Abort`.
    pub aborted: bool,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock finish.
    pub finished_at: DateTime<Utc>,
    /// Monotonic elapsed time.
    pub elapsed: Duration,
}

impl RunSummary {
    fn start(job: &'static str, total: usize) -> Self {
        let now = Utc::now();
        Self {
            job,
            total,
            processed: 0,
            succeeded: 0,
            skipped: 0,
            not_found: 0,
            failed: 0,
            aborted: false,
            started_at: now,
            finished_at: now,
            elapsed: Duration::ZERO,
        }
    }

    fn count(&mut self, outcome: &Outcome) {
        self.processed += 1;
        match outcome.kind() {
            OutcomeKind::Success => self.succeeded += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::NotFound => self.not_found += 1,
            OutcomeKind::Error => self.failed += 1,
        }
    }

    /// Whether every processed row ended without error.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && !self.aborted
    }

    /// Emit the summary as a single log event.
    pub fn log(&self) {
        info!(
            job = self.job,
            total = self.total,
            processed = self.processed,
            succeeded = self.succeeded,
            skipped = self.skipped,
            not_found = self.not_found,
            failed = self.failed,
            aborted = self.aborted,
            elapsed_ms = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Run complete"
        );
    }
}

/// Run `handler` over every row, in order, recording each result in `sink`.
///
/// The sink is finished (flushed) once iteration ends, including after an
/// abort or a failed write. The first write error is the one returned.
///
/// # Errors
///
/// Returns `SyncError::Sink` if an outcome cannot be written. Row-level
/// failures never surface here; they are recorded as `error` outcomes.
pub async fn drive<H, S>(
    rows: &[Row],
    handler: &H,
    sink: &mut S,
    policy: FailurePolicy,
) -> Result<RunSummary, SyncError>
where
    H: RowHandler,
    S: Sink<H::Record> + ?Sized,
{
    let job = handler.name();
    let mut summary = RunSummary::start(job, rows.len());
    let clock = Instant::now();

    info!(job, rows = rows.len(), ?policy, "Starting run");

    let mut write_error = None;
    for row in rows {
        let result = match handler.handle(row).await {
            Ok(result) => result,
            Err(err) => {
                let key = handler.key(row);
                error!(job, line = row.line(), key = %key, error = %err, "Row failed");
                RowResult::error(key, err.to_string())
            }
        };

        summary.count(&result.outcome);
        if let Err(err) = sink.record(row, &result) {
            error!(job, line = row.line(), error = %err, "Could not record outcome, stopping");
            write_error = Some(err);
            break;
        }

        if result.outcome.is_error() && policy == FailurePolicy::Abort {
            warn!(job, line = row.line(), "Aborting run after row error");
            summary.aborted = true;
            break;
        }
    }

    let finished = sink.finish();
    if let Some(err) = write_error {
        if let Err(finish_err) = finished {
            warn!(job, error = %finish_err, "Sink also failed to finish");
        }
        return Err(err.into());
    }
    finished?;

    summary.finished_at = Utc::now();
    summary.elapsed = clock.elapsed();
    Ok(summary)
}
