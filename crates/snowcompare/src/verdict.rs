//! Process exit-code policy.

use crate::orchestrator::RunSummary;

/// All tables passed.
pub const EXIT_CLEAN: u8 = 0;
/// Differences found, or one or more tables errored during comparison.
pub const EXIT_DIFFERENCES: u8 = 1;
/// Fatal run-wide condition (bad configuration, no connection at start).
/// Produced only via [`crate::CompareError::exit_code`], never from
/// per-table outcomes.
pub const EXIT_FATAL: u8 = 2;

/// Derive the process exit code from a completed run.
///
/// Technical errors during a table's comparison rank the same as found
/// differences at the process level: both mean the migration is not
/// certified.
pub fn exit_code(summary: &RunSummary) -> u8 {
    if summary.failed_tables > 0 || summary.errored_tables > 0 {
        EXIT_DIFFERENCES
    } else {
        EXIT_CLEAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{DiffResult, TableStatus};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn result(table: &str, status: TableStatus) -> DiffResult {
        match status {
            TableStatus::Error => DiffResult::error(table, &BTreeSet::new(), "boom", 0),
            _ => DiffResult {
                table: table.to_string(),
                status,
                added_rows: if status == TableStatus::Fail { 1 } else { 0 },
                removed_rows: 0,
                changed_row_keys: 0,
                entries: Vec::new(),
                truncated: false,
                duration_ms: 0,
                error_message: None,
                excluded_columns: Vec::new(),
                timestamp: Utc::now(),
            },
        }
    }

    fn summary(statuses: &[TableStatus]) -> RunSummary {
        let results = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| result(&format!("T{i}"), *status))
            .collect();
        RunSummary::from_results(
            "run".to_string(),
            Utc::now(),
            Utc::now(),
            "legacy-acct".to_string(),
            "new-acct".to_string(),
            results,
        )
    }

    #[test]
    fn all_pass_is_clean() {
        use TableStatus::*;
        assert_eq!(exit_code(&summary(&[Pass, Pass, Pass])), EXIT_CLEAN);
    }

    #[test]
    fn any_failure_is_nonzero() {
        use TableStatus::*;
        assert_eq!(exit_code(&summary(&[Pass, Pass, Fail])), EXIT_DIFFERENCES);
    }

    #[test]
    fn any_error_is_nonzero() {
        use TableStatus::*;
        assert_eq!(exit_code(&summary(&[Pass, Pass, Error])), EXIT_DIFFERENCES);
    }

    #[test]
    fn empty_run_is_clean() {
        assert_eq!(exit_code(&summary(&[])), EXIT_CLEAN);
    }
}
