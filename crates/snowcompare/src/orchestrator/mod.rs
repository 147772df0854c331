//! Run orchestrator - drives one comparison per configured table and
//! aggregates the outcomes into a run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::comparator::{DiffResult, TableComparator, TableStatus};
use crate::config::Config;
use crate::differ::TableDiffer;
use crate::error::Result;
use crate::exclusions;

/// Comparison run orchestrator.
///
/// Owns the configuration and the diff capability; each `run` produces an
/// independent, immutable [`RunSummary`].
pub struct Orchestrator {
    config: Config,
    differ: Arc<dyn TableDiffer>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Aggregate outcome of one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run identifier.
    pub run_id: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,

    /// Legacy environment label (account).
    pub legacy_environment: String,

    /// New environment label (account).
    pub new_environment: String,

    /// Per-table results, in configured table order.
    pub results: Vec<DiffResult>,

    /// Total tables compared.
    pub total_tables: usize,

    /// Tables with no differences.
    pub passed_tables: usize,

    /// Tables with differences.
    pub failed_tables: usize,

    /// Tables whose comparison could not complete.
    pub errored_tables: usize,

    /// Differing rows across all non-errored tables.
    pub total_diffs: u64,
}

impl RunSummary {
    /// Build a summary from ordered per-table results, deriving the counts.
    pub fn from_results(
        run_id: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        legacy_environment: String,
        new_environment: String,
        results: Vec<DiffResult>,
    ) -> Self {
        let mut passed_tables = 0;
        let mut failed_tables = 0;
        let mut errored_tables = 0;
        let mut total_diffs = 0;

        for result in &results {
            match result.status {
                TableStatus::Pass => passed_tables += 1,
                TableStatus::Fail => {
                    failed_tables += 1;
                    total_diffs += result.total_diffs();
                }
                TableStatus::Error => errored_tables += 1,
            }
        }

        Self {
            run_id,
            started_at,
            finished_at,
            legacy_environment,
            new_environment,
            total_tables: results.len(),
            passed_tables,
            failed_tables,
            errored_tables,
            total_diffs,
            results,
        }
    }

    /// Share of tables that passed, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_tables == 0 {
            return 0.0;
        }
        self.passed_tables as f64 / self.total_tables as f64 * 100.0
    }

    /// Convert to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Orchestrator {
    /// Create a new orchestrator.
    ///
    /// Re-validates the configuration so programmatic overrides applied after
    /// loading still abort before any comparison starts.
    pub fn new(config: Config, differ: Arc<dyn TableDiffer>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, differ })
    }

    /// Run the comparison for every configured table.
    ///
    /// Tables are compared concurrently up to the configured worker count.
    /// Results keep the configured table order regardless of completion
    /// order. One table's failure never halts the run; only the pre-flight
    /// configuration checks can abort it.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!("Starting comparison run: {}", run_id);

        // Resolve every table's exclusions up front so a bad spec aborts the
        // run before any comparison is attempted.
        let mut resolved = Vec::with_capacity(self.config.tables.len());
        for table in &self.config.tables {
            resolved.push(exclusions::resolve(&self.config.exclusions.columns, table)?);
        }

        let comparator = Arc::new(TableComparator::new(
            self.differ.clone(),
            self.config.legacy.clone(),
            self.config.new.clone(),
            self.config.comparison.clone(),
        ));

        let workers = self.config.comparison.workers;
        let semaphore = Arc::new(Semaphore::new(workers));
        info!(
            "Comparing {} tables with {} workers",
            self.config.tables.len(),
            workers
        );

        let mut handles = Vec::with_capacity(self.config.tables.len());
        for (idx, (table, excluded)) in self.config.tables.iter().zip(&resolved).enumerate() {
            let semaphore = semaphore.clone();
            let comparator = comparator.clone();
            let cancel = cancel.clone();
            let table = table.clone();
            let excluded = excluded.clone();

            let handle = tokio::spawn(async move {
                // A cancelled run records the table as ERROR, never drops it.
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => comparator.cancelled_result(&table, &excluded),
                    permit = semaphore.acquire_owned() => {
                        let _permit = permit.expect("semaphore never closed");
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => comparator.cancelled_result(&table, &excluded),
                            result = comparator.compare(&table, &excluded) => result,
                        }
                    }
                };
                (idx, result)
            });
            handles.push(handle);
        }

        // Results land at their configured index, so concurrent completion
        // order never reorders the summary.
        let mut slots: Vec<Option<DiffResult>> = vec![None; self.config.tables.len()];
        for handle in handles {
            match handle.await {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => warn!("comparison task panicked: {}", e),
            }
        }

        let results: Vec<DiffResult> = slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.unwrap_or_else(|| {
                    DiffResult::error(
                        &self.config.tables[idx].name,
                        &resolved[idx],
                        "comparison task panicked",
                        0,
                    )
                })
            })
            .collect();

        let finished_at = Utc::now();
        let summary = RunSummary::from_results(
            run_id,
            started_at,
            finished_at,
            self.config.legacy.account.clone(),
            self.config.new.account.clone(),
            results,
        );

        info!(
            "Run {}: {} tables - {} passed, {} failed, {} errored ({} diffs) in {:.1}s",
            summary.run_id,
            summary.total_tables,
            summary.passed_tables,
            summary.failed_tables,
            summary.errored_tables,
            summary.total_diffs,
            (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0
        );

        Ok(summary)
    }
}
