//! Descriptive statistics for a single series.

use crate::analyzers::types::{StatsError, Summary};
use crate::analyzers::utility::{mean, mode, percentile_sorted, sorted, stddev};

/// Computes mean, median, mode, population standard deviation, quartiles
/// and IQR of `values`.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] for an empty slice and
/// [`StatsError::NonFinite`] if any value is NaN or infinite.
pub fn describe(values: &[f64]) -> Result<Summary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySeries("descriptive statistics"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }

    let ordered = sorted(values);
    let quartile = |q: f64| {
        percentile_sorted(&ordered, q).ok_or(StatsError::EmptySeries("percentile"))
    };

    let avg = mean(values).ok_or(StatsError::EmptySeries("mean"))?;
    let q1 = quartile(25.0)?;
    let q2 = quartile(50.0)?;
    let q3 = quartile(75.0)?;

    Ok(Summary {
        count: values.len(),
        mean: avg,
        median: q2,
        mode: mode(values).ok_or(StatsError::EmptySeries("mode"))?,
        std_dev: stddev(values, avg).ok_or(StatsError::EmptySeries("standard deviation"))?,
        q1,
        q2,
        q3,
        iqr: q3 - q1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_series() {
        let s = describe(&[4.0, 1.0, 2.0, 2.0, 6.0]).unwrap();

        assert_eq!(s.count, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.mode, 2.0);
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.iqr, 2.0);
        assert!((s.std_dev - 1.7888543819998317).abs() < 1e-12);
    }

    #[test]
    fn test_describe_single_value() {
        let s = describe(&[7.0]).unwrap();
        assert_eq!(s.mean, 7.0);
        assert_eq!(s.median, 7.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.iqr, 0.0);
    }

    #[test]
    fn test_describe_quartile_ordering_holds() {
        let values: Vec<f64> = (0..37).map(|i| ((i * 7919) % 101) as f64 / 3.0).collect();
        let s = describe(&values).unwrap();

        assert!(s.q1 <= s.median && s.median <= s.q3);
        assert!(s.iqr >= 0.0);
        assert!((s.iqr - (s.q3 - s.q1)).abs() < 1e-12);
        let expected_mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((s.mean - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn test_describe_empty_fails() {
        assert_eq!(
            describe(&[]),
            Err(StatsError::EmptySeries("descriptive statistics"))
        );
    }

    #[test]
    fn test_describe_rejects_nan() {
        assert_eq!(describe(&[1.0, f64::NAN]), Err(StatsError::NonFinite));
    }
}
