//! Data types used by the analysis pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a statistic could not be computed. Degenerate inputs are reported
/// through this instead of producing NaN.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("cannot compute {0} of an empty series")]
    EmptySeries(&'static str),
    #[error("series contains a non-finite value")]
    NonFinite,
    #[error("regression needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("paired series differ in length ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },
    #[error("regression is undefined: x has zero variance")]
    ZeroVariance,
    #[error("histogram needs at least one bin")]
    NoBins,
    #[error("t-distribution unavailable: {0}")]
    Distribution(String),
}

/// The binary `risk` indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    NoRisk,
    RiskPresent,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 2] = [RiskLevel::NoRisk, RiskLevel::RiskPresent];

    /// Only exact 0 and 1 are recognised.
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 0.0 {
            Some(RiskLevel::NoRisk)
        } else if code == 1.0 {
            Some(RiskLevel::RiskPresent)
        } else {
            None
        }
    }

    /// File-name friendly form.
    pub fn slug(self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "no_risk",
            RiskLevel::RiskPresent => "risk_present",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::NoRisk => write!(f, "No Risk"),
            RiskLevel::RiskPresent => write!(f, "Risk Present"),
        }
    }
}

/// Descriptive statistics of one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; ties go to the value seen first.
    pub mode: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regression {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis `slope == 0`.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    pub intercept_stderr: f64,
}

/// Equal-width bins. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Paired bat/rat observations for one risk level, in joined-row order.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskGroup {
    pub risk: RiskLevel,
    pub bat_landings: Vec<f64>,
    pub rat_arrivals: Vec<f64>,
}

impl RiskGroup {
    pub fn len(&self) -> usize {
        self.bat_landings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bat_landings.is_empty()
    }
}

/// Everything computed for one risk level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAnalysis {
    pub risk: RiskLevel,
    pub rows: usize,
    pub bat_landings: Summary,
    pub rat_arrivals: Summary,
    pub bat_histogram: Histogram,
    pub rat_histogram: Histogram,
    pub regression: Regression,
    /// Fitted value for each observed bat count, in input order.
    pub predictions: Vec<f64>,
    #[serde(skip)]
    pub observed: RiskGroup,
}

/// Result of a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub joined_rows: usize,
    /// Joined rows whose `risk` was neither 0 nor 1.
    pub excluded_rows: usize,
    pub groups: Vec<GroupAnalysis>,
}
