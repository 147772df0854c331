//! Tabular CSV export, one row per table (RFC 4180 escaping).

use crate::comparator::DiffResult;
use crate::orchestrator::RunSummary;

/// CSV header row.
const CSV_HEADER: &str =
    "table,status,total_diffs,added_rows,removed_rows,changed_row_keys,duration_ms,timestamp,error";

/// Render the run summary as CSV, one data row per table in configured order.
pub fn render(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for result in &summary.results {
        out.push_str(&render_row(result));
    }

    out
}

fn render_row(result: &DiffResult) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}\n",
        escape_csv(&result.table),
        result.status,
        result.total_diffs(),
        result.added_rows,
        result.removed_rows,
        result.changed_row_keys,
        result.duration_ms,
        result.timestamp.to_rfc3339(),
        escape_csv(result.error_message.as_deref().unwrap_or(""))
    )
}

/// Quote a field when it contains a comma, quote, or newline; embedded
/// quotes are doubled.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
