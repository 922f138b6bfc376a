//! Interactive menu.
//!
//! A numbered menu read line by line from any `BufRead` and rendered to any
//! `Write`. Every operation error is reported inline and the loop keeps
//! going; only Exit or end of input stops it.

pub mod format;

use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::analysis::profit::{naive_profit, sort_by_profit, total_cost};
use crate::config::AppConfig;
use crate::data::fetch_mock_listings;
use crate::engine::images::{median_neighbourhood, ImageDownloader};
use crate::engine::pipeline::{estimate_market_value, run_mock_pipeline, MarketEstimate};
use crate::pricing::probe::probe;
use crate::pricing::PriceSource;
use crate::types::ExclusionReason;
use format::{format_currency, render_table, MetricRow, NeighbourRow, ProfitRow, ReasonRow};

const MENU: &[&str] = &[
    "1. Test internet connection",
    "2. Exit",
    "3. Fetch mock listings",
    "4. Analyze mock listings",
    "5. Sort mock listings by profit",
    "6. Run full mock pipeline",
    "7. Estimate market price for a keyword",
    "8. Evaluate a candidate auction against market prices",
    "9. Show listings nearest the median (with images)",
];

/// Longest title shown in table cells.
const MAX_TITLE_CHARS: usize = 48;

fn money(d: Decimal) -> String {
    format_currency(d.to_f64().unwrap_or(0.0))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Parse an optional non-negative amount. Blank input means "not given".
pub fn parse_amount(input: &str) -> Result<Option<Decimal>> {
    let input = input.trim().trim_start_matches('$');
    if input.is_empty() {
        return Ok(None);
    }
    let value = Decimal::from_str(input)
        .with_context(|| format!("'{input}' is not a numeric amount"))?;
    if value.is_sign_negative() && !value.is_zero() {
        anyhow::bail!("Amounts cannot be negative (got {value})");
    }
    Ok(Some(value))
}

/// The interactive application.
pub struct App<R, W> {
    config: AppConfig,
    source: Box<dyn PriceSource>,
    downloader: ImageDownloader,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        config: AppConfig,
        source: Box<dyn PriceSource>,
        downloader: ImageDownloader,
        input: R,
        out: W,
    ) -> Self {
        Self {
            config,
            source,
            downloader,
            input,
            out,
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the menu loop until Exit or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("Choose an option (1-9): ")? else {
                writeln!(self.out, "\nGoodbye.")?;
                break;
            };

            let result = match choice.as_str() {
                "1" => self.test_connection().await,
                "2" => {
                    writeln!(self.out, "Goodbye.")?;
                    break;
                }
                "3" => self.list_mock(),
                "4" => self.analyze_mock(),
                "5" => self.rank_mock(),
                "6" => self.mock_pipeline(),
                "7" => self.market_estimate().await,
                "8" => self.evaluate_candidate().await,
                "9" => self.median_listings().await,
                other => {
                    warn!(choice = other, "Invalid menu choice");
                    writeln!(self.out, "Invalid option. Please choose 1-9.\n").map_err(Into::into)
                }
            };

            if let Err(e) = result {
                writeln!(self.out, "Error: {e:#}\n")?;
            }
        }
        Ok(())
    }

    // -- I/O helpers -----------------------------------------------------

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.out, "=== {} ===", self.config.app.name)?;
        for line in MENU {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// Print `message` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{message}")?;
        self.out.flush()?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("Failed to read input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a keyword; prints a notice and returns `None` when blank.
    fn prompt_keyword(&mut self, message: &str) -> Result<Option<String>> {
        match self.prompt(message)? {
            Some(k) if !k.is_empty() => Ok(Some(k)),
            _ => {
                writeln!(self.out, "Keyword cannot be empty.\n")?;
                Ok(None)
            }
        }
    }

    async fn estimate(&self, keyword: &str) -> Result<MarketEstimate> {
        estimate_market_value(
            self.source.as_ref(),
            keyword,
            self.config.pricing.search_limit,
            &self.config.analysis,
        )
        .await
    }

    // -- Menu actions ----------------------------------------------------

    async fn test_connection(&mut self) -> Result<()> {
        let url = self.config.pricing.probe_url.clone();
        let report = probe(&url, Duration::from_secs(self.config.pricing.timeout_secs)).await?;

        if report.is_ok() {
            writeln!(self.out, "Connection to {url} works. Status code: {}", report.status)?;
            writeln!(self.out, "Response JSON keys:")?;
            for key in &report.keys {
                writeln!(self.out, "   - {key}")?;
            }
        } else {
            writeln!(self.out, "Unexpected status from {url}. Status code: {}", report.status)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn list_mock(&mut self) -> Result<()> {
        writeln!(self.out, "\nMock listings:\n")?;
        for item in fetch_mock_listings() {
            writeln!(self.out, "{item}")?;
            writeln!(self.out, "{}", "-".repeat(40))?;
        }
        Ok(())
    }

    fn analyze_mock(&mut self) -> Result<()> {
        writeln!(self.out, "\nAnalysis of mock listings:\n")?;
        for item in fetch_mock_listings() {
            writeln!(self.out, "Title: {}", item.title)?;
            writeln!(self.out, "  Market value (price): {}", money(item.price))?;
            writeln!(self.out, "  Total cost (bid+shipping): {}", money(total_cost(&item)))?;
            writeln!(self.out, "  Estimated profit: {}", money(naive_profit(&item)))?;
            writeln!(self.out, "{}", "-".repeat(50))?;
        }
        Ok(())
    }

    fn rank_mock(&mut self) -> Result<()> {
        writeln!(self.out, "\nMock listings ranked by estimated profit:\n")?;
        for item in sort_by_profit(&fetch_mock_listings()) {
            writeln!(self.out, "Title: {}", item.title)?;
            writeln!(self.out, "  Total cost: {}", money(total_cost(&item)))?;
            writeln!(self.out, "  Market value: {}", money(item.price))?;
            writeln!(self.out, "  Estimated profit: {}", money(naive_profit(&item)))?;
            writeln!(self.out, "{}", "-".repeat(50))?;
        }
        Ok(())
    }

    fn mock_pipeline(&mut self) -> Result<()> {
        let rows = run_mock_pipeline().into_iter().map(|r| ProfitRow {
            title: r.title,
            market_value: money(r.market_value),
            total_cost: money(r.total_cost),
            profit: money(r.profit),
        });

        writeln!(self.out, "\nFull pipeline results:\n")?;
        writeln!(self.out, "{}\n", render_table(rows))?;
        Ok(())
    }

    async fn market_estimate(&mut self) -> Result<()> {
        let Some(keyword) =
            self.prompt_keyword("Enter a keyword to search (e.g., 'Nintendo DS Lite'): ")?
        else {
            return Ok(());
        };

        let est = self.estimate(&keyword).await?;
        let s = &est.summary;

        writeln!(
            self.out,
            "\nFound {} usable listings for: {} ({} excluded)\n",
            s.count,
            keyword,
            est.report.excluded.len()
        )?;

        let rows = vec![
            MetricRow::new("Min", format_currency(s.min)),
            MetricRow::new("Q1", format_currency(s.q1)),
            MetricRow::new("Median", format_currency(s.median)),
            MetricRow::new("Mean", format_currency(s.mean)),
            MetricRow::new("Trimmed mean", format_currency(s.trimmed_mean)),
            MetricRow::new("Q3", format_currency(s.q3)),
            MetricRow::new("Max", format_currency(s.max)),
            MetricRow::new("Confidence", est.confidence.to_string()),
        ];
        writeln!(self.out, "{}", render_table(rows))?;

        if !est.report.excluded.is_empty() {
            let reasons = [
                ExclusionReason::MissingPrice,
                ExclusionReason::SuspiciousTitle,
                ExclusionReason::InvalidPriceFormat,
            ];
            let rows = reasons
                .iter()
                .map(|r| ReasonRow {
                    reason: r.code(),
                    count: est.report.excluded_count(*r),
                })
                .filter(|row| row.count > 0);
            writeln!(self.out, "\nExcluded listings:")?;
            writeln!(self.out, "{}", render_table(rows))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    async fn evaluate_candidate(&mut self) -> Result<()> {
        let Some(keyword) =
            self.prompt_keyword("Enter a keyword describing the item (e.g., 'Nintendo DS Lite'): ")?
        else {
            return Ok(());
        };

        let bid_text = self
            .prompt("Enter the current bid amount (e.g., 35.50): ")?
            .unwrap_or_default();
        let ship_text = self
            .prompt("Enter the shipping cost (e.g., 9.99): ")?
            .unwrap_or_default();
        let (bid, shipping) = match (parse_amount(&bid_text), parse_amount(&ship_text)) {
            (Ok(b), Ok(s)) => (b, s),
            (Err(e), _) | (_, Err(e)) => {
                writeln!(self.out, "Bid and shipping must be non-negative numbers: {e}\n")?;
                return Ok(());
            }
        };

        let est = self.estimate(&keyword).await?;
        let eval = est.evaluate(bid, shipping);
        let s = &est.summary;

        info!(
            keyword = %keyword,
            market_value = %eval.market_value,
            total_cost = %eval.total_cost,
            profit = %eval.profit,
            "Candidate evaluated"
        );

        let rows = vec![
            MetricRow::new("Keyword", keyword.clone()),
            MetricRow::new("Market min", format_currency(s.min)),
            MetricRow::new("Market Q1", format_currency(s.q1)),
            MetricRow::new("Market median (used as market value)", format_currency(s.median)),
            MetricRow::new("Market mean", format_currency(s.mean)),
            MetricRow::new("Market trimmed mean", format_currency(s.trimmed_mean)),
            MetricRow::new("Market Q3", format_currency(s.q3)),
            MetricRow::new("Market max", format_currency(s.max)),
            MetricRow::new("Confidence", format!("{} (n={})", est.confidence, s.count)),
            MetricRow::new("Your bid", money(eval.bid)),
            MetricRow::new("Shipping", money(eval.shipping)),
            MetricRow::new("Total cost (bid + shipping)", money(eval.total_cost)),
            MetricRow::new("Estimated profit (median - total)", money(eval.profit)),
        ];

        writeln!(self.out, "\nAuction evaluation:\n")?;
        writeln!(self.out, "{}\n", render_table(rows))?;
        Ok(())
    }

    async fn median_listings(&mut self) -> Result<()> {
        let Some(keyword) =
            self.prompt_keyword("Enter a keyword to search (e.g., 'Nintendo DS Lite'): ")?
        else {
            return Ok(());
        };

        let est = self.estimate(&keyword).await?;
        let nearest = median_neighbourhood(
            &est.report.kept,
            est.summary.median,
            self.config.images.top_n,
        );
        let dir = Path::new(&self.config.images.output_dir);
        let results = self.downloader.fetch_all(&nearest, &keyword, dir).await?;

        let rows: Vec<NeighbourRow> = results
            .iter()
            .map(|r| NeighbourRow {
                rank: r.rank,
                title: truncate(&r.listing.title, MAX_TITLE_CHARS),
                price: format_currency(r.listing.price),
                condition: r
                    .listing
                    .detail
                    .as_ref()
                    .map(|d| d.condition.clone())
                    .unwrap_or_default(),
                image: r.outcome.to_string(),
            })
            .collect();

        writeln!(
            self.out,
            "\nListings nearest the median ({}) for: {}\n",
            format_currency(est.summary.median),
            keyword
        )?;
        writeln!(
            self.out,
            "{}",
            render_table(rows)
        )?;
        for r in &results {
            if let Some(url) = r.listing.detail.as_ref().and_then(|d| d.item_url.as_deref()) {
                writeln!(self.out, "  {}. {url}", r.rank)?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
