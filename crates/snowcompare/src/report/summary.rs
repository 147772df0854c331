//! Human-readable markdown summary report.

use crate::comparator::TableStatus;
use crate::orchestrator::RunSummary;

/// Render the run summary as a markdown report: a run-level totals block
/// plus one row per table in configured order.
pub fn render(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("# Data Comparison Report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Run ID: {}\n", summary.run_id));
    out.push_str(&format!(
        "Environments: {} (legacy) vs {} (new)\n\n",
        summary.legacy_environment, summary.new_environment
    ));

    out.push_str("## Summary\n");
    out.push_str("| Metric | Value |\n|---|---|\n");
    out.push_str(&format!("| Total Tables | {} |\n", summary.total_tables));
    out.push_str(&format!("| Passed | {} |\n", summary.passed_tables));
    out.push_str(&format!("| Failed | {} |\n", summary.failed_tables));
    out.push_str(&format!("| Errored | {} |\n", summary.errored_tables));
    out.push_str(&format!("| Total Diffs | {} |\n", summary.total_diffs));
    out.push_str(&format!(
        "| Success Rate | {:.1}% |\n\n",
        summary.success_rate()
    ));

    out.push_str("## Table Details\n");
    out.push_str("| Table | Status | Total Diffs | Added | Removed | Changed | Duration |\n");
    out.push_str("|---|---|---|---|---|---|---|\n");

    for result in &summary.results {
        if result.status == TableStatus::Error {
            out.push_str(&format!(
                "| {} | ERROR | N/A | N/A | N/A | N/A | {} |\n",
                escape_md(&result.table),
                format_duration(result.duration_ms)
            ));
        } else {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                escape_md(&result.table),
                result.status,
                result.total_diffs(),
                result.added_rows,
                result.removed_rows,
                result.changed_row_keys,
                format_duration(result.duration_ms)
            ));
        }
    }

    let errors: Vec<_> = summary
        .results
        .iter()
        .filter(|r| r.status == TableStatus::Error)
        .collect();
    if !errors.is_empty() {
        out.push_str("\n## Errors\n");
        for result in errors {
            out.push_str(&format!(
                "- {}: {}\n",
                escape_md(&result.table),
                escape_md(result.error_message.as_deref().unwrap_or("unknown error"))
            ));
        }
    }

    let truncated: Vec<_> = summary.results.iter().filter(|r| r.truncated).collect();
    if !truncated.is_empty() {
        out.push('\n');
        for result in truncated {
            out.push_str(&format!(
                "**Note:** {} diff entries truncated (counts reflect true totals).\n",
                escape_md(&result.table)
            ));
        }
    }

    out
}

fn format_duration(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::DiffResult;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn failing(table: &str, added: u64, removed: u64) -> DiffResult {
        DiffResult {
            table: table.to_string(),
            status: TableStatus::Fail,
            added_rows: added,
            removed_rows: removed,
            changed_row_keys: 0,
            entries: Vec::new(),
            truncated: false,
            duration_ms: 1234,
            error_message: None,
            excluded_columns: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    fn passing(table: &str) -> DiffResult {
        DiffResult {
            status: TableStatus::Pass,
            added_rows: 0,
            removed_rows: 0,
            ..failing(table, 0, 0)
        }
    }

    fn summary_of(results: Vec<DiffResult>) -> RunSummary {
        RunSummary::from_results(
            "run-1".to_string(),
            Utc::now(),
            Utc::now(),
            "legacy-acct".to_string(),
            "new-acct".to_string(),
            results,
        )
    }

    #[test]
    fn renders_one_row_per_table_plus_totals() {
        let summary = summary_of(vec![passing("ORDERS"), failing("CUSTOMERS", 5, 2)]);
        let md = render(&summary);

        assert!(md.contains("| Total Tables | 2 |"));
        assert!(md.contains("| Total Diffs | 7 |"));
        assert!(md.contains("| ORDERS | PASS | 0 | 0 | 0 | 0 |"));
        assert!(md.contains("| CUSTOMERS | FAIL | 7 | 5 | 2 | 0 |"));
        assert!(md.contains("| Success Rate | 50.0% |"));
    }

    #[test]
    fn errored_tables_render_na_counts_and_an_errors_section() {
        let error = DiffResult::error("BROKEN", &BTreeSet::new(), "connection refused", 10);
        let summary = summary_of(vec![passing("ORDERS"), error]);
        let md = render(&summary);

        assert!(md.contains("| BROKEN | ERROR | N/A | N/A | N/A | N/A |"));
        assert!(md.contains("## Errors"));
        assert!(md.contains("- BROKEN: connection refused"));
    }

    #[test]
    fn truncated_tables_are_flagged() {
        let mut result = failing("BIG", 1500, 0);
        result.truncated = true;
        let md = render(&summary_of(vec![result]));
        assert!(md.contains("BIG diff entries truncated"));
    }
}
