//! snowcompare CLI - data parity validation between legacy and new pipelines.

use clap::{Parser, Subcommand};
use snowcompare::{report, verdict, CompareError, Config, ExternalCommandDiffer, Orchestrator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "snowcompare")]
#[command(about = "Compare data between legacy and new pipeline outputs, table by table")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output directory for reports (overrides config)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the run summary as JSON to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every configured table and write reports
    Run {
        /// Keep only counts, skip materializing row-level diff entries
        #[arg(long)]
        summary_only: bool,

        /// Override the row-level diff entry cap
        #[arg(long)]
        max_diffs: Option<usize>,

        /// Override the number of concurrent table comparisons
        #[arg(long)]
        workers: Option<usize>,

        /// Override the per-table timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Validate the configuration file and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<u8, CompareError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(CompareError::Config)?;

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::CheckConfig => {
            println!(
                "Configuration OK: {} tables, {} workers",
                config.tables.len(),
                config.comparison.workers
            );
            Ok(verdict::EXIT_CLEAN)
        }

        Commands::Run {
            summary_only,
            max_diffs,
            workers,
            timeout,
        } => {
            // Apply overrides
            if summary_only {
                config.comparison.summary_only = true;
            }
            if let Some(v) = max_diffs {
                config.comparison.max_diffs = v;
            }
            if let Some(v) = workers {
                config.comparison.workers = v;
            }
            if let Some(v) = timeout {
                config.comparison.timeout_seconds = v;
            }
            if let Some(out) = cli.out {
                config.output.dir = out;
            }

            let cancel = setup_signal_handler()?;

            let differ = Arc::new(ExternalCommandDiffer::new(config.differ.clone()));
            let orchestrator = Orchestrator::new(config.clone(), differ)?;
            let summary = orchestrator.run(cancel).await?;

            report::write_reports(&summary, &config.output)?;

            if cli.output_json {
                println!("{}", summary.to_json()?);
            } else {
                println!("\n{}", "=".repeat(60));
                println!("FINAL SUMMARY");
                println!("{}", "=".repeat(60));
                println!("Total Tables: {}", summary.total_tables);
                println!("Passed: {}", summary.passed_tables);
                println!("Failed: {}", summary.failed_tables);
                println!("Errored: {}", summary.errored_tables);
                println!("Total Diffs: {}", summary.total_diffs);

                if summary.failed_tables > 0 || summary.errored_tables > 0 {
                    println!(
                        "\n✗ {} table(s) have differences or errors",
                        summary.failed_tables + summary.errored_tables
                    );
                } else {
                    println!("\n✓ All tables match");
                }
            }

            Ok(verdict::exit_code(&summary))
        }
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Setup signal handlers for graceful shutdown.
/// Handles both SIGINT (Ctrl-C) and SIGTERM (scheduler shutdown).
/// Returns a CancellationToken that fires when a signal is received;
/// unresolved tables are then recorded as ERROR rather than dropped.
#[cfg(unix)]
fn setup_signal_handler() -> Result<CancellationToken, CompareError> {
    let cancel_token = CancellationToken::new();

    let token_int = cancel_token.clone();
    let token_term = cancel_token.clone();

    tokio::spawn(async move {
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");
        sigint.recv().await;
        eprintln!("\nReceived SIGINT. Recording unfinished tables and shutting down...");
        token_int.cancel();
    });

    tokio::spawn(async move {
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        sigterm.recv().await;
        eprintln!("\nReceived SIGTERM. Recording unfinished tables and shutting down...");
        token_term.cancel();
    });

    Ok(cancel_token)
}

/// Setup signal handler for Windows (only SIGINT/Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> Result<CancellationToken, CompareError> {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to setup Ctrl-C handler");
        eprintln!("\nReceived Ctrl-C. Recording unfinished tables and shutting down...");
        token.cancel();
    });

    Ok(cancel_token)
}
