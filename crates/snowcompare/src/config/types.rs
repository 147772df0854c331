//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Legacy pipeline's store (old environment).
    pub legacy: ConnectionConfig,

    /// Modern pipeline's store (new environment).
    pub new: ConnectionConfig,

    /// Tables to compare, in declared order.
    pub tables: Vec<TableSpec>,

    /// Columns excluded from every table's comparison.
    #[serde(default)]
    pub exclusions: ExclusionsConfig,

    /// Comparison behavior configuration.
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Report output configuration.
    #[serde(default)]
    pub output: OutputConfig,

    /// External diff tool configuration.
    #[serde(default)]
    pub differ: DifferConfig,
}

/// Connection context for one environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Account identifier.
    pub account: String,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,

    /// Compute warehouse.
    pub warehouse: String,

    /// Database name.
    pub database: String,

    /// Schema name.
    pub schema: String,

    /// Role (default: "PUBLIC").
    #[serde(default = "default_role")]
    pub role: String,
}

// Manual Debug so passwords never leak into logs or error chains.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .finish()
    }
}

/// One table under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name, unique within a run.
    pub name: String,

    /// Ordered key columns that uniquely identify a row.
    pub keys: Vec<String>,

    /// Columns ignored for this table only. Matched case-sensitively.
    #[serde(default)]
    pub exclude_columns: BTreeSet<String>,
}

/// Run-wide column exclusions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionsConfig {
    /// Columns excluded from every table in the run.
    #[serde(default)]
    pub columns: BTreeSet<String>,
}

/// Comparison behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Cap on materialized row-level diff entries per table (default: 1000).
    /// Diff counts always reflect true totals regardless of this cap.
    #[serde(default = "default_max_diffs")]
    pub max_diffs: usize,

    /// Per-table comparison timeout in seconds (default: 3600).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Keep only counts, suppressing row-level diff entries (default: false).
    #[serde(default)]
    pub summary_only: bool,

    /// Number of tables compared concurrently (default: 4).
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_diffs: default_max_diffs(),
            timeout_seconds: default_timeout_seconds(),
            summary_only: false,
            workers: default_workers(),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for report files (default: "outputs").
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Enabled export targets (default: csv + json).
    #[serde(default = "default_export_targets")]
    pub export: BTreeSet<ExportTarget>,

    /// Remote validation table name for the snowflake_table target.
    #[serde(default = "default_validation_table")]
    pub validation_table: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            export: default_export_targets(),
            validation_table: default_validation_table(),
        }
    }
}

/// Export target for run results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    /// One row per table, spreadsheet-ready.
    Csv,
    /// Full structured run summary including captured diff entries.
    Json,
    /// Append-only validation history rows for a remote table.
    SnowflakeTable,
}

/// External diff tool configuration.
///
/// The tool must accept two connection URLs and table names plus repeated
/// `--key-columns` / `--exclude-columns` flags, and print one `+` or `-`
/// prefixed line per differing row key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferConfig {
    /// Diff command to invoke (default: "data-diff").
    #[serde(default = "default_differ_command")]
    pub command: String,

    /// Extra arguments appended to every invocation.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            command: default_differ_command(),
            extra_args: Vec::new(),
        }
    }
}

// Default value functions for serde

fn default_role() -> String {
    "PUBLIC".to_string()
}

fn default_max_diffs() -> usize {
    1000
}

fn default_timeout_seconds() -> u64 {
    3600
}

fn default_workers() -> usize {
    4
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_export_targets() -> BTreeSet<ExportTarget> {
    [ExportTarget::Csv, ExportTarget::Json].into_iter().collect()
}

fn default_validation_table() -> String {
    "VALIDATION_RESULTS".to_string()
}

fn default_differ_command() -> String {
    "data-diff".to_string()
}
