//! Output formatting and persistence.
//!
//! Writes tables as CSV and renders the console reports for both pipelines.

use anyhow::{Context, Result};
use csv::Writer;
use std::fmt::{self, Write as _};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{AnalysisReport, Regression, Summary};
use crate::preprocess::PreprocessReport;
use crate::table::Table;

const RULE: &str = "------------------------------------------------";

/// Writes `table` to `path` as CSV with a header row. Missing cells are
/// written as empty fields.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = table.height(), "Writing CSV");

    let mut writer = Writer::from_path(path)
        .with_context(|| format!("failed to create `{}`", path.display()))?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    Ok(())
}

/// Shape, remaining missing values per column and the save location.
pub fn format_preprocess_report(report: &PreprocessReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let (rows, cols) = report.shape;
    writeln!(out, "Cleaned dataframe shape: ({rows}, {cols})")?;

    let width = report
        .missing
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    writeln!(out, "\nMissing values per column:")?;
    for (name, count) in &report.missing {
        writeln!(out, "{name:<width$}  {count}")?;
    }

    let unparseable: usize = report.unparseable.iter().map(|(_, n)| n).sum();
    if unparseable > 0 {
        writeln!(out, "\nUnparseable timestamps kept as unknown:")?;
        for (name, count) in report.unparseable.iter().filter(|(_, n)| *n > 0) {
            writeln!(out, "{name:<width$}  {count}")?;
        }
    }

    writeln!(
        out,
        "\nCleaned dataset saved as '{}'",
        report.output.display()
    )?;
    Ok(out)
}

/// One labelled block of descriptive statistics.
pub fn format_summary(label: &str, s: &Summary) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\nStatistics for {label}:")?;
    writeln!(out, "  Average: {}", s.mean)?;
    writeln!(out, "  Median: {}", s.median)?;
    writeln!(out, "  Mode: {}", s.mode)?;
    writeln!(out, "  Std Dev: {}", s.std_dev)?;
    writeln!(out, "  25% Quartile: {}", s.q1)?;
    writeln!(out, "  50% Quartile: {}", s.q2)?;
    writeln!(out, "  75% Quartile: {}", s.q3)?;
    writeln!(out, "  IQR: {}", s.iqr)?;
    writeln!(out, "{RULE}")?;
    Ok(out)
}

pub fn format_regression(label: &str, r: &Regression) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\nRegression for {label} (n = {}):", r.n)?;
    writeln!(out, "  Slope: {}", r.slope)?;
    writeln!(out, "  Intercept: {}", r.intercept)?;
    writeln!(out, "  r: {}", r.r_value)?;
    writeln!(out, "  p-value: {}", r.p_value)?;
    writeln!(out, "  Std Err: {}", r.std_err)?;
    writeln!(out, "{RULE}")?;
    Ok(out)
}

/// The four statistics blocks (bat then rat, no-risk group first), the two
/// regressions and the excluded-row count.
pub fn format_analysis_report(report: &AnalysisReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for group in &report.groups {
        out.push_str(&format_summary(
            &format!("Bat Landings ({})", group.risk),
            &group.bat_landings,
        )?);
        out.push_str(&format_summary(
            &format!("Rat Arrivals ({})", group.risk),
            &group.rat_arrivals,
        )?);
    }
    for group in &report.groups {
        out.push_str(&format_regression(&group.risk.to_string(), &group.regression)?);
    }
    writeln!(
        out,
        "\nJoined rows: {} ({} excluded: risk not 0 or 1)",
        report.joined_rows, report.excluded_rows
    )?;
    Ok(out)
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &AnalysisReport) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
