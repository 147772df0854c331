//! The external row-level diff capability.
//!
//! The actual diffing algorithm (checksum-based divide and conquer over key
//! ranges) is a mature external concern. This module defines the capability
//! contract the orchestration core drives, so any engine can be plugged in
//! and stubbed for tests:
//!
//! - [`TableDiffer`]: one table comparison against two connection contexts
//! - [`ExternalCommandDiffer`]: production backend driving an external CLI

pub mod command;

pub use command::ExternalCommandDiffer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::ConnectionConfig;
use crate::error::Result;

/// One table comparison handed to the diff capability.
#[derive(Debug, Clone)]
pub struct DiffRequest<'a> {
    /// Table name, identical in both stores.
    pub table: &'a str,
    /// Key columns that uniquely identify a row.
    pub keys: &'a [String],
    /// Effective exclusion set already merged for this table.
    pub exclude_columns: &'a BTreeSet<String>,
    /// Legacy environment connection context.
    pub legacy: &'a ConnectionConfig,
    /// New environment connection context.
    pub new: &'a ConnectionConfig,
    /// Cap on materialized key-level entries. Counts are never capped.
    pub max_entries: usize,
}

/// Which side of the comparison a differing row landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present only in the new store.
    Added,
    /// Present only in the legacy store.
    Removed,
    /// Present in both with differing non-key columns.
    Changed,
}

/// One differing row, identified by its key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub kind: DiffKind,
    pub key: String,
}

impl DiffEntry {
    pub fn new(kind: DiffKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// Raw outcome of one table comparison.
///
/// Counts are exact totals; `entries` may already be capped at the requested
/// maximum by the backend.
#[derive(Debug, Clone, Default)]
pub struct RawDiff {
    pub added_rows: u64,
    pub removed_rows: u64,
    pub changed_row_keys: u64,
    pub entries: Vec<DiffEntry>,
}

impl RawDiff {
    /// Total number of differing rows across all kinds.
    pub fn total(&self) -> u64 {
        self.added_rows + self.removed_rows + self.changed_row_keys
    }
}

/// Capability interface for the row-level diff engine.
///
/// Implementations must be safe to drive concurrently: the orchestrator
/// shares one differ across all in-flight table comparisons.
#[async_trait]
pub trait TableDiffer: Send + Sync {
    /// Compare one table between the two stores.
    ///
    /// Failures here are table-scoped: the comparator folds them into an
    /// `ERROR` result and the run continues with the next table.
    async fn diff_table(&self, request: &DiffRequest<'_>) -> Result<RawDiff>;
}
