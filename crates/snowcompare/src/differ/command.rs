//! Differ backend that shells out to an external diff tool.
//!
//! The configured command is invoked once per table with both connection
//! URLs, the schema-qualified table names, and repeated `--key-columns` /
//! `--exclude-columns` flags. It is expected to print one line per differing
//! row: `+ (key)` for rows only in the new store, `- (key)` for rows only in
//! the legacy store. Anything else on stdout is tool chatter and ignored.
//!
//! The child process is spawned with `kill_on_drop`, so a timed-out or
//! cancelled comparison abandons it best-effort without blocking the run.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::{DiffEntry, DiffKind, DiffRequest, RawDiff, TableDiffer};
use crate::config::DifferConfig;
use crate::error::{CompareError, Result};

/// Production diff backend driving an external CLI (data-diff by default).
pub struct ExternalCommandDiffer {
    config: DifferConfig,
}

impl ExternalCommandDiffer {
    pub fn new(config: DifferConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, request: &DiffRequest<'_>) -> Vec<String> {
        let mut args = vec![
            request.legacy.connection_string(),
            request.legacy.qualified_table(request.table),
            request.new.connection_string(),
            request.new.qualified_table(request.table),
        ];
        for key in request.keys {
            args.push("--key-columns".to_string());
            args.push(key.clone());
        }
        for column in request.exclude_columns {
            args.push("--exclude-columns".to_string());
            args.push(column.clone());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl TableDiffer for ExternalCommandDiffer {
    async fn diff_table(&self, request: &DiffRequest<'_>) -> Result<RawDiff> {
        let args = self.build_args(request);
        debug!(
            table = request.table,
            command = %self.config.command,
            "spawning external differ"
        );

        let output = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                CompareError::comparison(
                    request.table,
                    format!("failed to run differ '{}': {}", self.config.command, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompareError::comparison(
                request.table,
                format!("differ exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_diff_lines(&stdout, request.max_entries))
    }
}

/// Parse `+`/`-` prefixed diff lines into counts and capped entries.
fn parse_diff_lines(stdout: &str, max_entries: usize) -> RawDiff {
    let mut diff = RawDiff::default();

    for line in stdout.lines() {
        let line = line.trim();
        let (kind, key) = if let Some(rest) = line.strip_prefix('+') {
            (DiffKind::Added, rest)
        } else if let Some(rest) = line.strip_prefix('-') {
            (DiffKind::Removed, rest)
        } else {
            continue;
        };

        match kind {
            DiffKind::Added => diff.added_rows += 1,
            DiffKind::Removed => diff.removed_rows += 1,
            DiffKind::Changed => unreachable!(),
        }

        if diff.entries.len() < max_entries {
            diff.entries.push(DiffEntry::new(kind, key.trim()));
        }
    }

    diff
}
