//! Detailed structured export: the full run summary as pretty JSON,
//! including captured row-level diff entries (absent in summary-only runs).

use crate::error::Result;
use crate::orchestrator::RunSummary;

pub fn render(summary: &RunSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
