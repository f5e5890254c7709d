//! Metric analyzers - independent single-pass statistics over the catalog

pub mod classifier_readiness;
pub mod code_distribution;
pub mod completeness;
pub mod description_quality;

pub use classifier_readiness::ClassifierReadinessAnalyzer;
pub use code_distribution::CodeDistributionAnalyzer;
pub use completeness::CompletenessAnalyzer;
pub use description_quality::DescriptionQualityAnalyzer;

/// Normalized Shannon entropy of a value-frequency distribution.
///
/// Raw entropy is divided by log2(unique count) to bound the result to
/// [0, 1]; 1.0 means all values are equally frequent. Defined as 1.0 when
/// there are fewer than two distinct values, so degenerate distributions
/// never produce NaN.
pub fn normalized_entropy(counts: &[usize]) -> f64 {
    if counts.len() <= 1 {
        return 1.0;
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 1.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    let max_entropy = (counts.len() as f64).log2();
    (entropy / max_entropy).clamp(0.0, 1.0)
}

/// Round to two decimals for reporting
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sample standard deviation (0.0 when fewer than two values)
pub(crate) fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() as f64 - 1.0);
    variance.sqrt()
}

/// Median of a sorted slice (0.0 when empty)
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_entropy_uniform_is_one() {
        assert!((normalized_entropy(&[25, 25, 25, 25]) - 1.0).abs() < 1e-12);
        assert!((normalized_entropy(&[7, 7]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_degenerate_is_one_not_nan() {
        assert_eq!(normalized_entropy(&[]), 1.0);
        assert_eq!(normalized_entropy(&[100]), 1.0);
        assert_eq!(normalized_entropy(&[0, 0]), 1.0);
    }

    #[test]
    fn test_entropy_skew_below_one() {
        let skewed = normalized_entropy(&[97, 1, 1, 1]);
        assert!(skewed > 0.0 && skewed < 0.5);
    }

    #[test]
    fn test_entropy_ignores_zero_counts() {
        // A zero count contributes nothing to H but raises the divisor
        let e = normalized_entropy(&[50, 50, 0]);
        assert!(e < 1.0);
        assert!(e > 0.0);
    }

    #[test]
    fn test_stdev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let sd = sample_stdev(&values, mean);
        assert!((sd - 2.138).abs() < 0.01);
        assert_eq!(sample_stdev(&[3.0], 3.0), 0.0);
        assert_eq!(sample_stdev(&[], 0.0), 0.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median_sorted(&[]), 0.0);
        assert_eq!(median_sorted(&[5.0]), 5.0);
        assert_eq!(median_sorted(&[1.0, 3.0]), 2.0);
        assert_eq!(median_sorted(&[1.0, 2.0, 10.0]), 2.0);
    }

    proptest! {
        #[test]
        fn prop_entropy_bounded(counts in proptest::collection::vec(0usize..10_000, 0..50)) {
            let e = normalized_entropy(&counts);
            prop_assert!((0.0..=1.0).contains(&e));
            prop_assert!(!e.is_nan());
        }

        #[test]
        fn prop_uniform_entropy_is_max(count in 1usize..5_000, unique in 2usize..40) {
            let counts = vec![count; unique];
            let e = normalized_entropy(&counts);
            prop_assert!((e - 1.0).abs() < 1e-9);
        }
    }
}
