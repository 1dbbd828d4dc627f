//! Equal-width binning for the distribution charts.

use crate::analyzers::types::{Histogram, StatsError};

/// Splits `[min, max]` of `values` into `bins` equal-width bins. Every bin
/// is half-open except the last, which also holds `max`. A constant series
/// is binned over `[v - 0.5, v + 0.5]`.
///
/// # Errors
///
/// Fails for an empty or non-finite series, or when `bins` is zero.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram, StatsError> {
    if bins == 0 {
        return Err(StatsError::NoBins);
    }
    if values.is_empty() {
        return Err(StatsError::EmptySeries("histogram"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut idx = (((v - lo) / width) as usize).min(bins - 1);
        // float division can land one bin off near an edge
        if v < edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_and_edges() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        assert_eq!(h.edges, vec![0.0, 2.0, 4.0, 6.0]);
        // last bin is closed on the right
        assert_eq!(h.counts, vec![2, 2, 3]);
    }

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let h = histogram(&values, 6).unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), values.len());
        assert_eq!(h.edges.len(), 7);
    }

    #[test]
    fn test_histogram_constant_series() {
        let h = histogram(&[3.0, 3.0], 2).unwrap();
        assert_eq!(h.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(h.counts, vec![0, 2]);
    }

    #[test]
    fn test_histogram_rejects_bad_input() {
        assert_eq!(histogram(&[1.0], 0), Err(StatsError::NoBins));
        assert_eq!(histogram(&[], 6), Err(StatsError::EmptySeries("histogram")));
    }
}
