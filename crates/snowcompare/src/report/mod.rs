//! Report renderers.
//!
//! Every renderer consumes the same read-only [`RunSummary`]; renderers are
//! independently invocable and mutually consistent: the per-table statuses
//! and numeric totals they report are identical across formats. Which
//! renderers run is driven by the configured [`ExportTarget`] set through a
//! fixed dispatch table, not scattered conditionals.

pub mod csv;
pub mod json;
pub mod snowflake;
pub mod summary;

pub use snowflake::ValidationRecord;

use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::{ExportTarget, OutputConfig};
use crate::error::Result;
use crate::orchestrator::RunSummary;

/// Render the export payload for one target.
pub fn render(target: ExportTarget, summary: &RunSummary, validation_table: &str) -> Result<String> {
    match target {
        ExportTarget::Csv => Ok(csv::render(summary)),
        ExportTarget::Json => json::render(summary),
        ExportTarget::SnowflakeTable => Ok(snowflake::render_script(validation_table, summary)),
    }
}

fn file_name(target: ExportTarget, timestamp: &str) -> String {
    match target {
        ExportTarget::Csv => format!("table_comparison_{timestamp}.csv"),
        ExportTarget::Json => format!("detailed_results_{timestamp}.json"),
        ExportTarget::SnowflakeTable => format!("validation_inserts_{timestamp}.sql"),
    }
}

/// Write the markdown summary plus every enabled export into the output
/// directory. Returns the written paths.
pub fn write_reports(summary: &RunSummary, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&output.dir)?;
    let timestamp = summary.started_at.format("%Y%m%d_%H%M%S").to_string();
    let mut written = Vec::new();

    let summary_path = output.dir.join(format!("summary_{timestamp}.md"));
    fs::write(&summary_path, summary::render(summary))?;
    info!("Summary report saved to: {}", summary_path.display());
    written.push(summary_path);

    for target in &output.export {
        let path = output.dir.join(file_name(*target, &timestamp));
        fs::write(&path, render(*target, summary, &output.validation_table)?)?;
        info!("{:?} export saved to: {}", target, path.display());
        written.push(path);
    }

    Ok(written)
}
