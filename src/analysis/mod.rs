//! Market-value analysis.
//!
//! Filtering of raw search results, descriptive statistics over the kept
//! prices, the confidence heuristic, and profit evaluation.

pub mod confidence;
pub mod filter;
pub mod profit;
pub mod stats;

pub use confidence::{estimate_confidence, spread_ratio, ConfidenceConfig};
pub use filter::{classify, filter_listings, FilterReport};
pub use profit::{naive_profit, sort_by_profit, total_cost};
pub use stats::summarize;
