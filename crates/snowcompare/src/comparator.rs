//! Table comparator: wraps the diff capability with timeout enforcement,
//! outcome classification, and entry truncation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::{ComparisonConfig, ConnectionConfig, TableSpec};
use crate::differ::{DiffEntry, DiffRequest, TableDiffer};
use crate::error::CompareError;

/// Final status of one table comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableStatus {
    /// No differences found.
    Pass,
    /// Comparison completed and found differences.
    Fail,
    /// Comparison could not complete; counts are meaningless.
    Error,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Pass => "PASS",
            TableStatus::Fail => "FAIL",
            TableStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing one table. Built once by the comparator, immutable
/// afterwards; renderers receive it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResult {
    /// Table name.
    pub table: String,

    /// Final status.
    pub status: TableStatus,

    /// Rows present only in the new store.
    pub added_rows: u64,

    /// Rows present only in the legacy store.
    pub removed_rows: u64,

    /// Rows present in both stores with differing non-key columns.
    pub changed_row_keys: u64,

    /// Key-level entries, capped at `max_diffs`; empty in summary-only mode.
    pub entries: Vec<DiffEntry>,

    /// True when actual differences exceeded the entry cap.
    pub truncated: bool,

    /// Wall-clock comparison time in milliseconds.
    pub duration_ms: u64,

    /// Human-readable cause, present only when status is ERROR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Exclusions actually applied, sorted for reproducible audit output.
    pub excluded_columns: Vec<String>,

    /// When the comparison finished.
    pub timestamp: DateTime<Utc>,
}

impl DiffResult {
    /// Total differing rows. Always zero for ERROR results.
    pub fn total_diffs(&self) -> u64 {
        self.added_rows + self.removed_rows + self.changed_row_keys
    }

    /// Build an ERROR result for a table whose comparison never completed.
    pub fn error(
        table: &str,
        excluded: &BTreeSet<String>,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            table: table.to_string(),
            status: TableStatus::Error,
            added_rows: 0,
            removed_rows: 0,
            changed_row_keys: 0,
            entries: Vec::new(),
            truncated: false,
            duration_ms,
            error_message: Some(message.into()),
            excluded_columns: excluded.iter().cloned().collect(),
            timestamp: Utc::now(),
        }
    }
}

/// Drives one table comparison through the diff capability.
pub struct TableComparator {
    differ: Arc<dyn TableDiffer>,
    legacy: ConnectionConfig,
    new: ConnectionConfig,
    options: ComparisonConfig,
}

impl TableComparator {
    pub fn new(
        differ: Arc<dyn TableDiffer>,
        legacy: ConnectionConfig,
        new: ConnectionConfig,
        options: ComparisonConfig,
    ) -> Self {
        Self {
            differ,
            legacy,
            new,
            options,
        }
    }

    /// Compare one table between the two stores.
    ///
    /// Table-scoped failures never escape: timeouts, connection drops, and
    /// diff-engine errors are folded into an ERROR result so the run can
    /// continue with the remaining tables.
    pub async fn compare(&self, spec: &TableSpec, excluded: &BTreeSet<String>) -> DiffResult {
        info!("Comparing table: {}", spec.name);
        let start = Instant::now();
        let budget = Duration::from_secs(self.options.timeout_seconds);

        let request = DiffRequest {
            table: &spec.name,
            keys: &spec.keys,
            exclude_columns: excluded,
            legacy: &self.legacy,
            new: &self.new,
            max_entries: self.options.max_diffs,
        };

        // Dropping the timed-out future abandons the underlying comparison
        // best-effort; the remote store may keep scanning.
        let outcome = match tokio::time::timeout(budget, self.differ.diff_table(&request)).await {
            Ok(result) => result,
            Err(_) => Err(CompareError::Timeout {
                table: spec.name.clone(),
                seconds: self.options.timeout_seconds,
            }),
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(raw) => {
                let total = raw.total();
                let status = if total == 0 {
                    TableStatus::Pass
                } else {
                    TableStatus::Fail
                };
                let truncated = total > self.options.max_diffs as u64;

                let mut entries = raw.entries;
                entries.truncate(self.options.max_diffs);
                // Summary-only suppresses materialized entries, never counts.
                if self.options.summary_only {
                    entries.clear();
                }

                match status {
                    TableStatus::Pass => {
                        info!("✓ {}: PASSED - no differences found", spec.name)
                    }
                    _ => warn!("✗ {}: FAILED - {} differences found", spec.name, total),
                }

                DiffResult {
                    table: spec.name.clone(),
                    status,
                    added_rows: raw.added_rows,
                    removed_rows: raw.removed_rows,
                    changed_row_keys: raw.changed_row_keys,
                    entries,
                    truncated,
                    duration_ms,
                    error_message: None,
                    excluded_columns: excluded.iter().cloned().collect(),
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                error!("✗ {}: ERROR - {}", spec.name, e);
                DiffResult::error(&spec.name, excluded, e.to_string(), duration_ms)
            }
        }
    }

    /// Result recorded for a table the run was cancelled before resolving.
    pub fn cancelled_result(&self, spec: &TableSpec, excluded: &BTreeSet<String>) -> DiffResult {
        warn!("✗ {}: cancelled before completion", spec.name);
        DiffResult::error(
            &spec.name,
            excluded,
            "run cancelled before this table's comparison completed",
            0,
        )
    }
}
