//! Merging of global and per-table column exclusions.

use std::collections::BTreeSet;

use crate::config::TableSpec;
use crate::error::{CompareError, Result};

/// Resolve the effective exclusion set for one table: the deduplicated union
/// of the run-wide exclusions and the table's own `exclude_columns`.
///
/// Column names are matched case-sensitively. The returned set iterates in
/// sorted order, so logs and reports that render it are reproducible.
///
/// Fails with a configuration error if any key column ends up excluded; a
/// comparison keyed on an ignored column is meaningless.
pub fn resolve(global: &BTreeSet<String>, table: &TableSpec) -> Result<BTreeSet<String>> {
    let mut effective = global.clone();
    effective.extend(table.exclude_columns.iter().cloned());

    for key in &table.keys {
        if effective.contains(key) {
            return Err(CompareError::Config(format!(
                "table {}: key column '{}' is present in the exclusion set",
                table.name, key
            )));
        }
    }

    Ok(effective)
}
