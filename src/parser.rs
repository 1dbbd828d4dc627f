//! CSV loading and timestamp normalization shared by both pipelines.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

use crate::table::{Table, Value};

/// Formats tried in order for date-time values. Day-first slashes match the
/// field logs; ISO forms match exported data.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Reads a headed CSV file into a [`Table`].
///
/// # Errors
///
/// Fails if the file cannot be opened, a record has the wrong number of
/// fields, or the file has no header row. The message names the file.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open dataset `{}`", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header of `{}`", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.iter().all(String::is_empty) {
        bail!("dataset `{}` has no header row", path.display());
    }

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record =
            record.with_context(|| format!("malformed CSV record in `{}`", path.display()))?;
        table.push_row(record.iter().map(Value::from_raw).collect())?;
    }

    debug!(path = %path.display(), rows = table.height(), cols = table.width(), "Loaded dataset");
    Ok(table)
}

/// Parses a timestamp in any of the supported layouts. Returns `None` for
/// anything unrecognised; callers treat that as an unknown time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Converts the named columns to [`Value::Time`]. Values that cannot be
/// parsed become [`Value::Missing`] and are never fabricated.
///
/// Returns the converted table and the number of unparseable, non-missing
/// values per column.
///
/// # Errors
///
/// Fails if one of `columns` is absent.
pub fn normalize_timestamps(mut table: Table, columns: &[&str]) -> Result<(Table, Vec<(String, usize)>)> {
    let mut unparseable = Vec::with_capacity(columns.len());

    for &name in columns {
        let mut failures = 0usize;
        table = table.map_column(name, |cell| match cell {
            Value::Time(t) => Value::Time(t),
            Value::Missing => Value::Missing,
            other => match parse_timestamp(&other.to_string()) {
                Some(t) => Value::Time(t),
                None => {
                    failures += 1;
                    Value::Missing
                }
            },
        })?;

        if failures > 0 {
            warn!(column = name, count = failures, "Unparseable timestamps treated as unknown");
        }
        unparseable.push((name.to_string(), failures));
    }

    Ok((table, unparseable))
}

/// Loads a dataset and normalizes its timestamp columns in one step.
pub fn load_dataset(
    path: impl AsRef<Path>,
    time_columns: &[&str],
) -> Result<(Table, Vec<(String, usize)>)> {
    let path = path.as_ref();
    let table = load_table(path)?;
    normalize_timestamps(table, time_columns)
        .with_context(|| format!("while normalizing timestamps in `{}`", path.display()))
}
