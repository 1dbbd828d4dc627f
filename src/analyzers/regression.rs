//! Ordinary least-squares line fit with significance testing.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::analyzers::types::{Regression, StatsError};
use crate::analyzers::utility::mean;

/// Keeps the t statistic finite when |r| is exactly 1.
const TINY: f64 = 1e-20;

/// Fits `y = slope * x + intercept` by least squares.
///
/// The p-value is two-sided for `slope == 0` against a Student t with
/// `n - 2` degrees of freedom. With exactly two points the line is exact:
/// standard errors are 0 and p is 0 (1 if both y are equal).
///
/// # Errors
///
/// Fails for mismatched lengths, fewer than two points, non-finite input,
/// or when every x is identical.
pub fn linregress(x: &[f64], y: &[f64]) -> Result<Regression, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(StatsError::TooFewPoints(n));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }
    // Compared before any sums: a constant x can still leave rounding residue
    // in the centred sum of squares.
    if x.iter().all(|&v| v == x[0]) {
        return Err(StatsError::ZeroVariance);
    }

    let x_mean = mean(x).ok_or(StatsError::EmptySeries("mean"))?;
    let y_mean = mean(y).ok_or(StatsError::EmptySeries("mean"))?;

    let (mut ss_x, mut ss_y, mut ss_xy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }
    let n_f = n as f64;
    let (ss_x, ss_y, ss_xy) = (ss_x / n_f, ss_y / n_f, ss_xy / n_f);

    let r_value = if ss_y == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0)
    };
    let slope = ss_xy / ss_x;
    let intercept = y_mean - slope * x_mean;

    if n == 2 {
        return Ok(Regression {
            n,
            slope,
            intercept,
            r_value,
            p_value: if y[0] == y[1] { 1.0 } else { 0.0 },
            std_err: 0.0,
            intercept_stderr: 0.0,
        });
    }

    let df = (n - 2) as f64;
    let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.cdf(-t.abs())).min(1.0);

    let std_err = ((1.0 - r_value * r_value) * ss_y / ss_x / df).sqrt();
    let intercept_stderr = std_err * (ss_x + x_mean * x_mean).sqrt();

    Ok(Regression {
        n,
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
        intercept_stderr,
    })
}

impl Regression {
    /// Fitted value for each `x`, in the same order.
    pub fn predict(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&xi| self.slope * xi + self.intercept).collect()
    }
}
