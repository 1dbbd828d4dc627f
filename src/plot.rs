//! SVG charts for the analysis: one histogram per series and one
//! scatter-plus-fit chart per risk group.

use anyhow::{Context, Result, bail};
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::{AnalysisReport, GroupAnalysis, Histogram, RiskLevel};

const CHART_SIZE: (u32, u32) = (800, 600);

const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const SALMON: RGBColor = RGBColor(250, 128, 114);
const LIME_GREEN: RGBColor = RGBColor(50, 205, 50);
const GOLD: RGBColor = RGBColor(255, 215, 0);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

struct GroupStyle {
    bat_title: &'static str,
    bat_fill: RGBColor,
    rat_title: &'static str,
    rat_fill: RGBColor,
    regression_title: &'static str,
    points: RGBColor,
    line: RGBColor,
}

fn style_for(risk: RiskLevel) -> GroupStyle {
    match risk {
        RiskLevel::NoRisk => GroupStyle {
            bat_title: "Distribution of Bat Activity (No Risk)",
            bat_fill: LIGHT_BLUE,
            rat_title: "Rat Arrival Spread (No Risk)",
            rat_fill: LIME_GREEN,
            regression_title: "Bat vs Rat Relationship (No Risk Condition)",
            points: BLUE,
            line: RED,
        },
        RiskLevel::RiskPresent => GroupStyle {
            bat_title: "Distribution of Bat Activity (Risk Present)",
            bat_fill: SALMON,
            rat_title: "Rat Arrival Spread (Risk Present)",
            rat_fill: GOLD,
            regression_title: "Bat vs Rat Relationship (Risk Condition)",
            points: GREEN,
            line: ORANGE,
        },
    }
}

/// Renders all six charts into `dir`, creating it if needed. Returns the
/// written paths.
#[tracing::instrument(skip(report), fields(dir = %dir.display()))]
pub fn render_all(dir: &Path, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create plot directory `{}`", dir.display()))?;

    let mut written = Vec::new();
    for group in &report.groups {
        let style = style_for(group.risk);
        let slug = group.risk.slug();

        let path = dir.join(format!("bat_landings_{slug}.svg"));
        render_histogram(&path, style.bat_title, "Bat Landings", &group.bat_histogram, style.bat_fill)?;
        written.push(path);

        let path = dir.join(format!("rat_arrivals_{slug}.svg"));
        render_histogram(&path, style.rat_title, "Rat Arrivals", &group.rat_histogram, style.rat_fill)?;
        written.push(path);

        let path = dir.join(format!("regression_{slug}.svg"));
        render_regression(&path, style.regression_title, group, style.points, style.line)?;
        written.push(path);
    }

    info!(charts = written.len(), "Charts rendered");
    Ok(written)
}

/// Draws one bar per bin, spanning exactly the bin edges.
pub fn render_histogram(
    path: &Path,
    title: &str,
    x_label: &str,
    hist: &Histogram,
    fill: RGBColor,
) -> Result<()> {
    let (Some(&lo), Some(&hi)) = (hist.edges.first(), hist.edges.last()) else {
        bail!("histogram for `{title}` has no bin edges");
    };
    let tallest = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(lo..hi, 0.0..tallest * 1.1)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .draw()?;

    let bars: Vec<(f64, f64, f64)> = hist
        .edges
        .windows(2)
        .zip(&hist.counts)
        .map(|(edge, &count)| (edge[0], edge[1], count as f64))
        .collect();

    chart.draw_series(
        bars.iter()
            .map(|&(x0, x1, count)| Rectangle::new([(x0, 0.0), (x1, count)], fill.filled())),
    )?;
    chart.draw_series(
        bars.iter()
            .map(|&(x0, x1, count)| Rectangle::new([(x0, 0.0), (x1, count)], BLACK.stroke_width(1))),
    )?;

    root.present()
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    debug!(path = %path.display(), "Histogram written");
    Ok(())
}

/// Scatter of the observed pairs with the fitted line drawn across them.
pub fn render_regression(
    path: &Path,
    title: &str,
    group: &GroupAnalysis,
    points: RGBColor,
    line: RGBColor,
) -> Result<()> {
    let observed = &group.observed;
    let x_range = padded_range(observed.bat_landings.iter().copied());
    let y_range = padded_range(
        observed
            .rat_arrivals
            .iter()
            .chain(&group.predictions)
            .copied(),
    );

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Bat Landings")
        .y_desc("Rat Arrivals")
        .draw()?;

    chart
        .draw_series(
            observed
                .bat_landings
                .iter()
                .zip(&observed.rat_arrivals)
                .map(|(&x, &y)| Circle::new((x, y), 4, points.filled())),
        )?
        .label("Observed")
        .legend(move |(x, y)| Circle::new((x, y), 4, points.filled()));

    // the fit is a straight line, so drawing it in x order matches the
    // input-ordered predictions exactly
    let mut fitted: Vec<(f64, f64)> = observed
        .bat_landings
        .iter()
        .copied()
        .zip(group.predictions.iter().copied())
        .collect();
    fitted.sort_by(|a, b| a.0.total_cmp(&b.0));

    chart
        .draw_series(LineSeries::new(fitted, line.stroke_width(2)))?
        .label("Regression")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    debug!(path = %path.display(), "Regression chart written");
    Ok(())
}

/// Axis range covering `values` with a 5% margin on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad)..(hi + pad)
}
