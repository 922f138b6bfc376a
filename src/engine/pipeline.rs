//! Market estimate and profit pipelines.
//!
//! Live: keyword → search → filter → summarize → confidence.
//! Mock: catalogue → rank by profit → display rows.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use crate::analysis::confidence::estimate_confidence;
use crate::analysis::filter::FilterReport;
use crate::analysis::profit::{naive_profit, sort_by_profit, total_cost};
use crate::analysis::stats::summarize;
use crate::config::AnalysisConfig;
use crate::data::fetch_mock_listings;
use crate::pricing::{search_filtered, PriceSource};
use crate::types::{ConfidenceLabel, PriceSummary, ProfitEvaluation};

// ---------------------------------------------------------------------------
// Live market estimate
// ---------------------------------------------------------------------------

/// Everything learned about one keyword from a single search.
#[derive(Debug, Clone)]
pub struct MarketEstimate {
    pub keyword: String,
    pub report: FilterReport,
    pub summary: PriceSummary,
    pub confidence: ConfidenceLabel,
}

impl MarketEstimate {
    /// The median of kept prices, used as market value.
    pub fn market_value(&self) -> f64 {
        self.summary.median
    }

    /// Compare an acquisition cost against this estimate.
    pub fn evaluate(&self, bid: Option<Decimal>, shipping: Option<Decimal>) -> ProfitEvaluation {
        ProfitEvaluation::from_estimate(self.market_value(), bid, shipping)
    }
}

/// Search `keyword`, filter the results and summarize the kept prices.
///
/// Fails with `ScoutError::EmptyInput` when nothing survives filtering.
pub async fn estimate_market_value(
    source: &dyn PriceSource,
    keyword: &str,
    limit: u32,
    analysis: &AnalysisConfig,
) -> Result<MarketEstimate> {
    let report = search_filtered(source, keyword, limit, true).await?;
    let summary = summarize(&report.prices(), analysis.trim_fraction)?;
    let confidence = estimate_confidence(&summary, &analysis.confidence());

    info!(
        source = source.name(),
        keyword,
        kept = report.kept.len(),
        excluded = report.excluded.len(),
        median = %format!("${:.2}", summary.median),
        confidence = %confidence,
        "Market estimate ready"
    );

    Ok(MarketEstimate {
        keyword: keyword.to_string(),
        report,
        summary,
        confidence,
    })
}

// ---------------------------------------------------------------------------
// Mock pipeline
// ---------------------------------------------------------------------------

/// One display row of the mock pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRow {
    pub title: String,
    pub market_value: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

/// Fetch the mock catalogue, rank it by profit and flatten it into rows.
pub fn run_mock_pipeline() -> Vec<PipelineRow> {
    let ranked = sort_by_profit(&fetch_mock_listings());

    ranked
        .iter()
        .map(|item| PipelineRow {
            title: item.title.clone(),
            market_value: item.price,
            total_cost: total_cost(item),
            profit: naive_profit(item),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
