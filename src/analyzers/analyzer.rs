use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

use crate::analyzers::describe::describe;
use crate::analyzers::grouping::{prepare, split_by_risk};
use crate::analyzers::histogram::histogram;
use crate::analyzers::regression::linregress;
use crate::analyzers::types::{AnalysisReport, GroupAnalysis, RiskGroup, RiskLevel};
use crate::config::AnalysisConfig;
use crate::parser::load_table;
use crate::plot::render_all;
use crate::table::Table;

/// Computes statistics, histograms and the regression for one risk group.
///
/// Any undefined statistic (empty group, constant bat counts) is an error
/// that names the series.
pub fn analyze_group(group: &RiskGroup, bins: usize) -> Result<GroupAnalysis> {
    let bat_label = format!("Bat Landings ({})", group.risk);
    let rat_label = format!("Rat Arrivals ({})", group.risk);

    let bat_landings = describe(&group.bat_landings)
        .with_context(|| format!("describing {bat_label}"))?;
    let rat_arrivals = describe(&group.rat_arrivals)
        .with_context(|| format!("describing {rat_label}"))?;

    let bat_histogram = histogram(&group.bat_landings, bins)
        .with_context(|| format!("binning {bat_label}"))?;
    let rat_histogram = histogram(&group.rat_arrivals, bins)
        .with_context(|| format!("binning {rat_label}"))?;

    let regression = linregress(&group.bat_landings, &group.rat_arrivals)
        .with_context(|| format!("regressing rat arrivals on bat landings ({})", group.risk))?;
    let predictions = regression.predict(&group.bat_landings);

    Ok(GroupAnalysis {
        risk: group.risk,
        rows: group.len(),
        bat_landings,
        rat_arrivals,
        bat_histogram,
        rat_histogram,
        regression,
        predictions,
        observed: group.clone(),
    })
}

/// Joins the raw datasets, splits by risk and analyzes both groups.
pub fn analyze(
    observations: Table,
    arrivals: Table,
    row_limit: usize,
    bins: usize,
) -> Result<AnalysisReport> {
    let joined = prepare(observations, arrivals, row_limit)?;
    let split = split_by_risk(&joined)?;

    info!(
        joined = joined.height(),
        no_risk = split.no_risk.len(),
        risk_present = split.risk_present.len(),
        excluded = split.excluded,
        "Risk groups formed"
    );

    let groups = RiskLevel::ALL
        .iter()
        .map(|&risk| analyze_group(split.group(risk), bins))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisReport {
        joined_rows: joined.height(),
        excluded_rows: split.excluded,
        groups,
    })
}

/// Loads both raw datasets, analyzes them, renders charts and optionally
/// writes the JSON report.
#[tracing::instrument(skip(config), fields(row_limit = config.row_limit, bins = config.bins))]
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let observations = load_table(&config.dataset1)?;
    let arrivals = load_table(&config.dataset2)?;

    let report = analyze(observations, arrivals, config.row_limit, config.bins)?;

    if config.no_plots {
        info!("Chart rendering skipped");
    } else {
        render_all(&config.plot_dir, &report)?;
    }

    if let Some(path) = &config.report_json {
        let file = File::create(path)
            .with_context(|| format!("failed to create report `{}`", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report)
            .with_context(|| format!("failed to write report `{}`", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to write report `{}`", path.display()))?;
        info!(path = %path.display(), "Analysis report written");
    }

    Ok(report)
}
