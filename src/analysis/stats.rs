//! Statistics engine.
//!
//! Order statistics, mean and trimmed mean over the kept prices.

use crate::types::{PriceSummary, ScoutError};

/// Default fraction dropped from each end for the trimmed mean.
pub const DEFAULT_TRIM_FRACTION: f64 = 0.2;

/// Below this many prices the trimmed mean is just the mean.
pub const MIN_TRIM_SAMPLE: usize = 10;

/// Summarize a non-empty set of prices.
///
/// Input order does not matter; values are sorted ascending first.
/// Quartiles are read positionally at `n / 4` and `3n / 4` with no
/// interpolation. `trim_fraction` controls how many values
/// (`floor(n * trim_fraction)` per side) are dropped for the trimmed mean.
pub fn summarize(prices: &[f64], trim_fraction: f64) -> Result<PriceSummary, ScoutError> {
    if prices.is_empty() {
        return Err(ScoutError::EmptyInput);
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = mean(&sorted);

    Ok(PriceSummary {
        count: n,
        min: sorted[0],
        q1: sorted[n / 4],
        median: median(&sorted),
        q3: sorted[(3 * n) / 4],
        max: sorted[n - 1],
        mean,
        trimmed_mean: trimmed_mean(&sorted, trim_fraction).unwrap_or(mean),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an ascending, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Mean of an ascending slice after dropping `k` values from each end.
/// `None` when the sample is too small, `k` is zero, or nothing would remain.
fn trimmed_mean(sorted: &[f64], trim_fraction: f64) -> Option<f64> {
    let n = sorted.len();
    if n < MIN_TRIM_SAMPLE {
        return None;
    }
    // NaN and negative fractions saturate to 0 here.
    let k = (n as f64 * trim_fraction).floor() as usize;
    if k == 0 || 2 * k >= n {
        return None;
    }
    Some(mean(&sorted[k..n - k]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
