//! Fixed file names, column names and the per-pipeline settings.
//!
//! Every CLI option defaults to one of the constants below, so running a
//! subcommand without arguments uses the standard file layout.

use clap::Args;
use std::path::PathBuf;

pub const DATASET1_PATH: &str = "dataset1.csv";
pub const DATASET2_PATH: &str = "dataset2.csv";
pub const CLEANED_OUTPUT_PATH: &str = "cleaned_merged_dataset.csv";
pub const PLOT_DIR: &str = "plots";

/// Bucket width used to align observations with arrival slots.
pub const BUCKET_MINUTES: i64 = 30;
/// Rows kept from each raw dataset before the analysis join.
pub const ANALYSIS_ROW_LIMIT: usize = 200;
pub const HISTOGRAM_BINS: usize = 6;

pub const DATASET1_TIME_COLUMNS: &[&str] =
    &["start_time", "rat_period_start", "rat_period_end", "sunset_time"];
pub const DATASET2_TIME_COLUMNS: &[&str] = &["time"];

pub const START_TIME_COLUMN: &str = "start_time";
pub const ARRIVAL_TIME_COLUMN: &str = "time";
pub const BUCKET_COLUMN: &str = "time_30min";
pub const RAT_MINUTES_COLUMN: &str = "rat_minutes";
pub const RAT_PRESENT_COLUMN: &str = "rat_present";

/// A missing value in these columns means nothing was observed.
pub const ZERO_FILL_COLUMNS: &[&str] = &["rat_minutes", "bat_landing_number", "food_availability"];
pub const UNKNOWN_FILL_COLUMNS: &[&str] = &["season", "month"];
pub const UNKNOWN_LABEL: &str = "Unknown";

pub const JOIN_COLUMN: &str = "month";
pub const RISK_COLUMN: &str = "risk";
pub const BAT_LANDINGS_COLUMN: &str = "bat_landing_number";
pub const RAT_ARRIVALS_COLUMN: &str = "rat_arrival_number";

/// Suffixes given to overlapping column names by a join.
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings for the `preprocess` subcommand.
#[derive(Debug, Clone, Args)]
pub struct PreprocessConfig {
    /// Observation dataset (one row per observation window)
    #[arg(long, default_value = DATASET1_PATH)]
    pub dataset1: PathBuf,

    /// Arrival dataset (one row per 30-minute slot)
    #[arg(long, default_value = DATASET2_PATH)]
    pub dataset2: PathBuf,

    /// Where the cleaned, merged CSV is written
    #[arg(short, long, default_value = CLEANED_OUTPUT_PATH)]
    pub output: PathBuf,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            dataset1: DATASET1_PATH.into(),
            dataset2: DATASET2_PATH.into(),
            output: CLEANED_OUTPUT_PATH.into(),
        }
    }
}

/// Settings for the `analyze` subcommand.
#[derive(Debug, Clone, Args)]
pub struct AnalysisConfig {
    #[arg(long, default_value = DATASET1_PATH)]
    pub dataset1: PathBuf,

    #[arg(long, default_value = DATASET2_PATH)]
    pub dataset2: PathBuf,

    /// Rows taken from the top of each dataset before joining
    #[arg(long, default_value_t = ANALYSIS_ROW_LIMIT)]
    pub row_limit: usize,

    /// Histogram bin count
    #[arg(long, default_value_t = HISTOGRAM_BINS)]
    pub bins: usize,

    /// Directory the SVG charts are written to
    #[arg(long, default_value = PLOT_DIR)]
    pub plot_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    pub no_plots: bool,

    /// Optional: write the full analysis report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset1: DATASET1_PATH.into(),
            dataset2: DATASET2_PATH.into(),
            row_limit: ANALYSIS_ROW_LIMIT,
            bins: HISTOGRAM_BINS,
            plot_dir: PLOT_DIR.into(),
            no_plots: false,
            report_json: None,
        }
    }
}
