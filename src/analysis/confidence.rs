//! Confidence estimation.
//!
//! Maps sample size and relative spread (IQR / median) of a price summary
//! to a coarse High / Medium / Low label.

use tracing::debug;

use crate::types::{ConfidenceLabel, PriceSummary};

// ---------------------------------------------------------------------------
// Configuration (defaults, overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Thresholds for each confidence band. A band requires at least
/// `*_min_count` samples and a spread ratio no greater than `*_max_spread`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceConfig {
    pub high_min_count: usize,
    pub high_max_spread: f64,
    pub medium_min_count: usize,
    pub medium_max_spread: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_min_count: 30,
            high_max_spread: 0.35,
            medium_min_count: 10,
            medium_max_spread: 0.70,
        }
    }
}

/// `(Q3 - Q1) / median`, or `None` when the median is exactly zero.
pub fn spread_ratio(summary: &PriceSummary) -> Option<f64> {
    if summary.median == 0.0 {
        return None;
    }
    Some(summary.iqr() / summary.median)
}

/// Label a summary. Total over every valid summary.
pub fn estimate_confidence(summary: &PriceSummary, config: &ConfidenceConfig) -> ConfidenceLabel {
    let Some(spread) = spread_ratio(summary) else {
        return ConfidenceLabel::Low;
    };

    let label = if summary.count >= config.high_min_count && spread <= config.high_max_spread {
        ConfidenceLabel::High
    } else if summary.count >= config.medium_min_count && spread <= config.medium_max_spread {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    };

    debug!(
        count = summary.count,
        spread = %format!("{spread:.3}"),
        label = %label,
        "Confidence estimated"
    );

    label
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
