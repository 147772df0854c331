//! Remote validation-table export.
//!
//! Renders one append-only history row per table as SQL, accumulating
//! validation results across runs. The physical write is an operator
//! concern; this module only produces the statements.

use serde::{Deserialize, Serialize};

use crate::orchestrator::RunSummary;

/// One validation history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub run_id: String,
    pub table_name: String,
    pub comparison_status: String,
    pub total_diffs: u64,
    pub added_rows: u64,
    pub removed_rows: u64,
    pub changed_row_keys: u64,
    pub duration_ms: u64,
    pub error_message: Option<String>,
    pub comparison_timestamp: String,
    pub legacy_environment: String,
    pub new_environment: String,
}

/// Build one record per table, in configured order.
pub fn records(summary: &RunSummary) -> Vec<ValidationRecord> {
    summary
        .results
        .iter()
        .map(|result| ValidationRecord {
            run_id: summary.run_id.clone(),
            table_name: result.table.clone(),
            comparison_status: result.status.to_string(),
            total_diffs: result.total_diffs(),
            added_rows: result.added_rows,
            removed_rows: result.removed_rows,
            changed_row_keys: result.changed_row_keys,
            duration_ms: result.duration_ms,
            error_message: result.error_message.clone(),
            comparison_timestamp: result.timestamp.to_rfc3339(),
            legacy_environment: summary.legacy_environment.clone(),
            new_environment: summary.new_environment.clone(),
        })
        .collect()
}

/// DDL for the validation table. Append-only; existing history is never
/// overwritten.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n\
         \x20   RUN_ID VARCHAR(50),\n\
         \x20   TABLE_NAME VARCHAR(100),\n\
         \x20   COMPARISON_STATUS VARCHAR(20),\n\
         \x20   TOTAL_DIFFS INTEGER,\n\
         \x20   ADDED_ROWS INTEGER,\n\
         \x20   REMOVED_ROWS INTEGER,\n\
         \x20   CHANGED_ROW_KEYS INTEGER,\n\
         \x20   DURATION_MS INTEGER,\n\
         \x20   ERROR_MESSAGE TEXT,\n\
         \x20   COMPARISON_TIMESTAMP TIMESTAMP_LTZ,\n\
         \x20   LEGACY_ENVIRONMENT VARCHAR(200),\n\
         \x20   NEW_ENVIRONMENT VARCHAR(200),\n\
         \x20   CREATED_AT TIMESTAMP_LTZ DEFAULT CURRENT_TIMESTAMP()\n\
         );"
    )
}

/// INSERT statement for one record.
pub fn insert_sql(table: &str, record: &ValidationRecord) -> String {
    let error = match &record.error_message {
        Some(message) => format!("'{}'", sql_quote(message)),
        None => "NULL".to_string(),
    };
    format!(
        "INSERT INTO {table} (RUN_ID, TABLE_NAME, COMPARISON_STATUS, TOTAL_DIFFS, \
         ADDED_ROWS, REMOVED_ROWS, CHANGED_ROW_KEYS, DURATION_MS, ERROR_MESSAGE, \
         COMPARISON_TIMESTAMP, LEGACY_ENVIRONMENT, NEW_ENVIRONMENT) VALUES \
         ('{}', '{}', '{}', {}, {}, {}, {}, {}, {}, '{}', '{}', '{}');",
        sql_quote(&record.run_id),
        sql_quote(&record.table_name),
        sql_quote(&record.comparison_status),
        record.total_diffs,
        record.added_rows,
        record.removed_rows,
        record.changed_row_keys,
        record.duration_ms,
        error,
        sql_quote(&record.comparison_timestamp),
        sql_quote(&record.legacy_environment),
        sql_quote(&record.new_environment),
    )
}

/// Full export script: DDL plus one INSERT per table.
pub fn render_script(table: &str, summary: &RunSummary) -> String {
    let mut out = create_table_sql(table);
    out.push('\n');
    for record in records(summary) {
        out.push('\n');
        out.push_str(&insert_sql(table, &record));
    }
    out.push('\n');
    out
}

fn sql_quote(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{DiffResult, TableStatus};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn summary() -> RunSummary {
        let pass = DiffResult {
            table: "ORDERS".to_string(),
            status: TableStatus::Pass,
            added_rows: 0,
            removed_rows: 0,
            changed_row_keys: 0,
            entries: Vec::new(),
            truncated: false,
            duration_ms: 42,
            error_message: None,
            excluded_columns: Vec::new(),
            timestamp: Utc::now(),
        };
        let error = DiffResult::error("BROKEN", &BTreeSet::new(), "can't connect", 5);
        RunSummary::from_results(
            "run-1".to_string(),
            Utc::now(),
            Utc::now(),
            "legacy-acct".to_string(),
            "new-acct".to_string(),
            vec![pass, error],
        )
    }

    #[test]
    fn one_record_per_table_in_order() {
        let records = records(&summary());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].table_name, "ORDERS");
        assert_eq!(records[0].comparison_status, "PASS");
        assert_eq!(records[1].table_name, "BROKEN");
        assert_eq!(records[1].comparison_status, "ERROR");
        assert_eq!(records[1].error_message.as_deref(), Some("can't connect"));
    }

    #[test]
    fn script_has_ddl_and_escaped_inserts() {
        let script = render_script("VALIDATION_RESULTS", &summary());
        assert!(script.starts_with("CREATE TABLE IF NOT EXISTS VALIDATION_RESULTS"));
        assert_eq!(script.matches("INSERT INTO VALIDATION_RESULTS").count(), 2);
        // Single quote in the error message is doubled.
        assert!(script.contains("can''t connect"));
    }
}
