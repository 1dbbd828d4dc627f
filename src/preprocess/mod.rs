//! Observation/arrival merge and cleaning.
//!
//! Each observation's start time is floored to its 30-minute bucket and
//! left-joined against the arrival slot with that exact timestamp. A
//! `rat_present` flag is derived, missing values are filled by column
//! meaning, and the result is written out as CSV.

pub mod bucket;
pub mod clean;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{
    ARRIVAL_TIME_COLUMN, BUCKET_COLUMN, BUCKET_MINUTES, DATASET1_TIME_COLUMNS,
    DATASET2_TIME_COLUMNS, PreprocessConfig, START_TIME_COLUMN,
};
use crate::join::{JoinKind, join};
use crate::output::write_table;
use crate::parser::load_dataset;
use crate::table::Table;

pub use bucket::{add_bucket_column, floor_to_interval};
pub use clean::{derive_rat_present, fill_missing, is_rat_present};

/// What the preprocessing run produced, for console reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessReport {
    pub shape: (usize, usize),
    pub missing: Vec<(String, usize)>,
    /// Unparseable timestamps found while loading, per column.
    pub unparseable: Vec<(String, usize)>,
    pub output: PathBuf,
}

/// Buckets `observations` by start time and left-joins `arrivals` on the
/// bucket. Every observation row is kept.
pub fn merge_by_bucket(observations: Table, arrivals: &Table, minutes: i64) -> Result<Table> {
    let expected_rows = observations.height();
    let bucketed = add_bucket_column(observations, START_TIME_COLUMN, BUCKET_COLUMN, minutes)?;
    let merged = join(
        &bucketed,
        arrivals,
        BUCKET_COLUMN,
        ARRIVAL_TIME_COLUMN,
        JoinKind::Left,
    )?;

    if merged.height() != expected_rows {
        warn!(
            observations = expected_rows,
            merged = merged.height(),
            "Some buckets matched more than one arrival slot"
        );
    }

    Ok(merged)
}

/// Runs merge, presence flag and fills over already-normalized tables.
pub fn preprocess(observations: Table, arrivals: &Table) -> Result<Table> {
    let merged = merge_by_bucket(observations, arrivals, BUCKET_MINUTES)?;
    let flagged = derive_rat_present(merged)?;
    fill_missing(flagged)
}

/// Loads both datasets, preprocesses them and writes the cleaned CSV.
#[tracing::instrument(skip(config), fields(output = %config.output.display()))]
pub fn run(config: &PreprocessConfig) -> Result<PreprocessReport> {
    let (observations, mut unparseable) = load_dataset(&config.dataset1, DATASET1_TIME_COLUMNS)?;
    let (arrivals, arrival_unparseable) = load_dataset(&config.dataset2, DATASET2_TIME_COLUMNS)?;
    unparseable.extend(arrival_unparseable);

    info!(
        observations = observations.height(),
        arrivals = arrivals.height(),
        "Datasets loaded"
    );

    let cleaned = preprocess(observations, &arrivals).context("preprocessing failed")?;

    write_table(&config.output, &cleaned)?;
    info!(rows = cleaned.height(), "Cleaned dataset written");

    Ok(PreprocessReport {
        shape: cleaned.shape(),
        missing: cleaned.missing_counts(),
        unparseable,
        output: config.output.clone(),
    })
}
