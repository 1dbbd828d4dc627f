use std::collections::HashMap;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns `None` for empty input.
pub fn stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    Some(variance.sqrt())
}

/// Linearly interpolated percentile (`q` in 0..=100) of an ascending slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Most frequent value. When several values share the highest count the
/// one that appears first in `values` wins.
pub fn mode(values: &[f64]) -> Option<f64> {
    // bits of the value -> (first index, count)
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (idx, v) in values.iter().enumerate() {
        let normalized = if *v == 0.0 { 0.0f64 } else { *v };
        counts.entry(normalized.to_bits()).or_insert((idx, 0)).1 += 1;
    }

    counts
        .values()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|&(first, _)| values[first])
}

/// Sorts a copy of `values` ascending. Callers reject NaN beforehand.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values).unwrap();
        assert_eq!(m, 5.0);
        assert_eq!(stddev(&values, m).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_inputs_have_no_result() {
        assert_eq!(mean(&[]), None);
        assert_eq!(stddev(&[], 0.0), None);
        assert_eq!(percentile_sorted(&[], 50.0), None);
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_percentile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_sorted(&values, 25.0), Some(1.75));
        assert_eq!(percentile_sorted(&values, 50.0), Some(2.5));
        assert_eq!(percentile_sorted(&values, 75.0), Some(3.25));
        assert_eq!(percentile_sorted(&values, 0.0), Some(1.0));
        assert_eq!(percentile_sorted(&values, 100.0), Some(4.0));
    }

    #[test]
    fn test_mode_prefers_highest_count() {
        assert_eq!(mode(&[1.0, 3.0, 3.0, 2.0]), Some(3.0));
    }

    #[test]
    fn test_mode_ties_go_to_first_seen() {
        assert_eq!(mode(&[5.0, 2.0, 2.0, 5.0]), Some(5.0));
        // no repeats: every value ties, so the first one wins
        assert_eq!(mode(&[0.3, 0.1, 0.2]), Some(0.3));
    }

    #[test]
    fn test_sorted_orders_ascending() {
        assert_eq!(sorted(&[3.0, -1.0, 2.0]), vec![-1.0, 2.0, 3.0]);
    }
}
