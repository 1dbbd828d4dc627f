//! Row selection, joining and the risk split.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::analyzers::types::{RiskGroup, RiskLevel};
use crate::config::{BAT_LANDINGS_COLUMN, JOIN_COLUMN, RAT_ARRIVALS_COLUMN, RISK_COLUMN};
use crate::join::{JoinKind, join};
use crate::table::Table;

/// Truncates each dataset to `row_limit` rows, drops incomplete rows,
/// inner-joins on `month` and drops incomplete rows again.
pub fn prepare(observations: Table, arrivals: Table, row_limit: usize) -> Result<Table> {
    let observations = observations.head(row_limit).drop_missing();
    let arrivals = arrivals.head(row_limit).drop_missing();
    debug!(
        observations = observations.height(),
        arrivals = arrivals.height(),
        "Complete rows kept before join"
    );

    let joined = join(
        &observations,
        &arrivals,
        JOIN_COLUMN,
        JOIN_COLUMN,
        JoinKind::Inner,
    )
    .context("joining datasets on month")?;

    Ok(joined.drop_missing())
}

/// Both risk groups plus the number of rows that belonged to neither.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSplit {
    pub no_risk: RiskGroup,
    pub risk_present: RiskGroup,
    pub excluded: usize,
}

impl RiskSplit {
    pub fn group(&self, risk: RiskLevel) -> &RiskGroup {
        match risk {
            RiskLevel::NoRisk => &self.no_risk,
            RiskLevel::RiskPresent => &self.risk_present,
        }
    }
}

/// Partitions joined rows by `risk`. Rows whose risk is not exactly 0 or 1
/// are counted in [`RiskSplit::excluded`] and logged, not silently lost.
///
/// # Errors
///
/// Fails if `risk`, `bat_landing_number` or `rat_arrival_number` is absent
/// or not numeric.
pub fn split_by_risk(joined: &Table) -> Result<RiskSplit> {
    let risk_idx = joined.require_column(RISK_COLUMN)?;
    let bats = joined.numeric_column(BAT_LANDINGS_COLUMN)?;
    let rats = joined.numeric_column(RAT_ARRIVALS_COLUMN)?;

    let empty = |risk| RiskGroup {
        risk,
        bat_landings: Vec::new(),
        rat_arrivals: Vec::new(),
    };
    let mut split = RiskSplit {
        no_risk: empty(RiskLevel::NoRisk),
        risk_present: empty(RiskLevel::RiskPresent),
        excluded: 0,
    };

    for (row, (bat, rat)) in joined.rows().iter().zip(bats.into_iter().zip(rats)) {
        let group = match row[risk_idx].as_f64().and_then(RiskLevel::from_code) {
            Some(RiskLevel::NoRisk) => &mut split.no_risk,
            Some(RiskLevel::RiskPresent) => &mut split.risk_present,
            None => {
                split.excluded += 1;
                continue;
            }
        };
        group.bat_landings.push(bat);
        group.rat_arrivals.push(rat);
    }

    if split.excluded > 0 {
        warn!(
            excluded = split.excluded,
            "Rows with a risk value other than 0 or 1 left out of both groups"
        );
    }

    Ok(split)
}
