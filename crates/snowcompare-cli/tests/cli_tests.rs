//! CLI integration tests for snowcompare.
//!
//! These tests verify argument parsing, exit codes, and the end-to-end run
//! path with a scripted stand-in for the external diff tool.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Get a command for the snowcompare binary.
fn cmd() -> Command {
    Command::cargo_bin("snowcompare").unwrap()
}

fn write_config(dir: &Path, differ_command: &str) -> PathBuf {
    let out_dir = dir.join("outputs");
    let config = format!(
        r#"
legacy:
  account: legacy-acct
  user: etl
  password: pw
  warehouse: WH
  database: ANALYTICS
  schema: SSIS
new:
  account: new-acct
  user: etl
  password: pw
  warehouse: WH
  database: ANALYTICS
  schema: DBT
tables:
  - name: ORDERS
    keys: [ID]
  - name: CUSTOMERS
    keys: [CUSTOMER_ID]
exclusions:
  columns: [ETL_LOADED_AT]
output:
  dir: {}
differ:
  command: {}
"#,
        out_dir.display(),
        differ_command
    );
    let path = dir.join("config.yaml");
    fs::write(&path, config).unwrap();
    path
}

#[cfg(unix)]
fn write_differ_script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("differ.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn test_run_subcommand_help() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--summary-only"))
        .stdout(predicate::str::contains("--max-diffs"))
        .stdout(predicate::str::contains("--workers"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snowcompare"));
}

// =============================================================================
// Configuration Error Tests (exit code 2)
// =============================================================================

#[test]
fn test_missing_config_file_is_fatal() {
    cmd()
        .args(["--config", "/nonexistent/config.yaml", "check-config"])
        .assert()
        .code(2);
}

#[test]
fn test_check_config_accepts_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "data-diff");

    cmd()
        .args(["--config", config.to_str().unwrap(), "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK: 2 tables"));
}

#[test]
fn test_check_config_rejects_excluded_key_column() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "data-diff");
    let content = fs::read_to_string(&config).unwrap();
    fs::write(
        &config,
        content.replace("columns: [ETL_LOADED_AT]", "columns: [ID]"),
    )
    .unwrap();

    cmd()
        .args(["--config", config.to_str().unwrap(), "check-config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("key column 'ID'"));
}

#[test]
fn test_run_with_zero_workers_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "data-diff");

    cmd()
        .args(["--config", config.to_str().unwrap(), "run", "--workers", "0"])
        .assert()
        .code(2);
}

// =============================================================================
// End-to-End Run Tests (scripted differ)
// =============================================================================

#[cfg(unix)]
#[test]
fn test_run_all_tables_match_exits_clean() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_differ_script(dir.path(), "exit 0");
    let config = write_config(dir.path(), script.to_str().unwrap());

    cmd()
        .args(["--config", config.to_str().unwrap(), "run"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("✓ All tables match"));

    // Summary report plus default csv + json exports.
    let outputs: Vec<_> = fs::read_dir(dir.path().join("outputs"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_str().unwrap().to_string())
        .collect();
    assert!(outputs.iter().any(|n| n.starts_with("summary_")));
    assert!(outputs.iter().any(|n| n.starts_with("table_comparison_")));
    assert!(outputs.iter().any(|n| n.starts_with("detailed_results_")));
}

#[cfg(unix)]
#[test]
fn test_run_with_differences_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_differ_script(dir.path(), "printf '+ (1001)\\n- (1002)\\n'");
    let config = write_config(dir.path(), script.to_str().unwrap());

    cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-json",
            "run",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"FAIL\""))
        .stdout(predicate::str::contains("\"total_diffs\": 4"));
}

#[cfg(unix)]
#[test]
fn test_run_with_broken_differ_exits_one_with_error_results() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_differ_script(dir.path(), "echo 'cannot connect' >&2; exit 3");
    let config = write_config(dir.path(), script.to_str().unwrap());

    cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-json",
            "run",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"ERROR\""))
        .stdout(predicate::str::contains("cannot connect"));
}

#[cfg(unix)]
#[test]
fn test_summary_only_keeps_counts_but_drops_entries() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_differ_script(dir.path(), "printf '+ (1)\\n+ (2)\\n'");
    let config = write_config(dir.path(), script.to_str().unwrap());

    cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-json",
            "run",
            "--summary-only",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"added_rows\": 2"))
        .stdout(predicate::str::contains("\"entries\": []"));
}
