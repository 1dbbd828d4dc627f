//! CLI entry point for the bat/rat exploratory analysis.
//!
//! Provides one subcommand per pipeline: `preprocess` merges the two raw
//! datasets into a cleaned CSV, `analyze` compares bat landings with rat
//! arrivals across risk groups.

use anyhow::Result;
use bat_rat_eda::config::{AnalysisConfig, PreprocessConfig};
use bat_rat_eda::output::{format_analysis_report, format_preprocess_report, print_json};
use bat_rat_eda::{analyzers, preprocess};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bat_rat_eda")]
#[command(about = "Exploratory analysis of bat landings and rat arrivals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge dataset1 with dataset2 by 30-minute bucket and write a cleaned CSV
    Preprocess(PreprocessConfig),
    /// Compare bat landings and rat arrivals across risk groups
    Analyze(AnalysisConfig),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bat_rat_eda.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bat_rat_eda.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess(config) => {
            let report = preprocess::run(&config)?;
            print!("{}", format_preprocess_report(&report)?);
        }
        Commands::Analyze(config) => {
            let report = analyzers::analyzer::run(&config)?;
            print_json(&report)?;
            print!("{}", format_analysis_report(&report)?);
            if !config.no_plots {
                info!(dir = %config.plot_dir.display(), "Charts saved");
            }
        }
    }

    Ok(())
}
