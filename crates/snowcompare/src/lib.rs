//! # snowcompare
//!
//! Comparison orchestration for certifying data parity between two
//! independently hosted stores: a legacy pipeline's output and a modern
//! pipeline's output, table by table.
//!
//! The library drives one row-level comparison per configured table through
//! an external diff capability, with:
//!
//! - **Exclusion merging** of global and per-table ignored columns
//! - **Bounded concurrency** with order-preserving result collection
//! - **Partial-failure isolation**: one bad table never halts the run
//! - **Per-table timeouts** with best-effort cancellation
//! - **Consistent multi-format reports** (markdown, JSON, CSV, SQL history)
//!
//! The row-level diff algorithm itself is out of scope: it is modeled as the
//! [`TableDiffer`] capability, with [`ExternalCommandDiffer`] driving a
//! mature external CLI in production and stubs standing in for tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use snowcompare::{Config, ExternalCommandDiffer, Orchestrator};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> snowcompare::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let differ = Arc::new(ExternalCommandDiffer::new(config.differ.clone()));
//!     let orchestrator = Orchestrator::new(config, differ)?;
//!     let summary = orchestrator.run(CancellationToken::new()).await?;
//!     println!("{}/{} tables passed", summary.passed_tables, summary.total_tables);
//!     std::process::exit(snowcompare::verdict::exit_code(&summary) as i32);
//! }
//! ```

pub mod comparator;
pub mod config;
pub mod differ;
pub mod error;
pub mod exclusions;
pub mod orchestrator;
pub mod report;
pub mod verdict;

// Re-exports for convenient access
pub use comparator::{DiffResult, TableComparator, TableStatus};
pub use config::{Config, ConnectionConfig, ExportTarget, TableSpec};
pub use differ::{DiffEntry, DiffKind, DiffRequest, ExternalCommandDiffer, RawDiff, TableDiffer};
pub use error::{CompareError, Result};
pub use orchestrator::{Orchestrator, RunSummary};
