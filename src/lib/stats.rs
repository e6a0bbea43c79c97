//! Summary statistics for cohort allele-fraction lists.
//!
//! All functions return `None` for empty input rather than NaN so that an
//! empty cohort surfaces as an explicit insufficient-data result downstream.

/// Median of `values`, interpolating between the two middle elements for
/// even-length input.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Population standard deviation of `values` (divisor N, not N-1).
#[must_use]
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Percentile rank of `score` within `values`, averaging the strict and
/// inclusive ranks so that ties split the rank between them:
/// `100 * (count_below + count_below_or_equal) / (2 * N)`.
///
/// For a single-element list containing only `score` itself this is 50.
#[must_use]
pub fn percentile_of_score(values: &[f64], score: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let below = values.iter().filter(|&&v| v < score).count();
    let below_or_equal = values.iter().filter(|&&v| v <= score).count();
    Some(100.0 * (below + below_or_equal) as f64 / (2.0 * values.len() as f64))
}
