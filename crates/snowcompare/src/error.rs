//! Error types for the comparison library.

use thiserror::Error;

/// Main error type for comparison operations.
///
/// Only configuration and run-wide connection failures are allowed to
/// propagate out of the orchestrator; table-scoped errors (timeouts,
/// comparison failures, transient connection drops) are caught and folded
/// into a `DiffResult` with `ERROR` status so the run continues.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Configuration error (invalid YAML, duplicate table, excluded key, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store was unreachable or unauthenticated.
    #[error("Connection error ({context}): {message}")]
    Connection { context: String, message: String },

    /// A single table's comparison exceeded its budget.
    #[error("Comparison of table {table} timed out after {seconds}s")]
    Timeout { table: String, seconds: u64 },

    /// Failure surfaced by the underlying diff capability.
    #[error("Comparison failed for table {table}: {message}")]
    Comparison { table: String, message: String },

    /// Run was cancelled (SIGINT, etc.)
    #[error("Run cancelled")]
    Cancelled,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompareError {
    /// Create a Connection error with context about which store failed.
    pub fn connection(context: impl Into<String>, message: impl Into<String>) -> Self {
        CompareError::Connection {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a Comparison error scoped to one table.
    pub fn comparison(table: impl Into<String>, message: impl Into<String>) -> Self {
        CompareError::Comparison {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Process exit code for an error that escaped the orchestrator.
    ///
    /// Per-table outcomes never reach this path; anything fatal enough to
    /// abort the whole run maps to the reserved code 2.
    pub fn exit_code(&self) -> u8 {
        2
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_map_to_reserved_exit_code() {
        assert_eq!(CompareError::Config("bad".into()).exit_code(), 2);
        assert_eq!(CompareError::connection("legacy", "refused").exit_code(), 2);
    }

    #[test]
    fn comparison_error_names_the_table() {
        let err = CompareError::comparison("ORDERS", "permission denied");
        assert!(err.to_string().contains("ORDERS"));
        assert!(err.to_string().contains("permission denied"));
    }
}
