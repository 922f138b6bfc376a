//! Shared types for Resell Scout.
//!
//! These types form the data model used across all modules: raw search
//! results, filter verdicts, price summaries, confidence labels and profit
//! evaluations. All of them are ephemeral and live for one query.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Raw search results
// ---------------------------------------------------------------------------

/// One item summary as returned by the price-search endpoint, before any
/// filtering. `price` keeps the raw payload text so malformed values can be
/// classified instead of rejected at parse time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    /// Free-text condition ("Used", "New", ...). Empty when not provided.
    pub condition: String,
    /// Raw price value, `None` when the price object or its value is absent.
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub item_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Filter verdicts
// ---------------------------------------------------------------------------

/// Why a search result was dropped. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    MissingPrice,
    SuspiciousTitle,
    InvalidPriceFormat,
}

impl ExclusionReason {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ExclusionReason::MissingPrice => "missing-price",
            ExclusionReason::SuspiciousTitle => "suspicious-title",
            ExclusionReason::InvalidPriceFormat => "invalid-price-format",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Display/download detail carried by a kept listing when requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingDetail {
    pub condition: String,
    pub image_url: Option<String>,
    pub item_url: Option<String>,
}

/// A search result that passed every filter check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeptListing {
    pub title: String,
    pub price: f64,
    pub detail: Option<ListingDetail>,
}

/// A search result removed from consideration, with exactly one reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedListing {
    pub title: String,
    pub reason: ExclusionReason,
}

/// Outcome of classifying a single [`RawListing`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterVerdict {
    Kept(KeptListing),
    Excluded(ExcludedListing),
}

impl FilterVerdict {
    pub fn is_kept(&self) -> bool {
        matches!(self, FilterVerdict::Kept(_))
    }

    /// The exclusion reason, if any.
    pub fn reason(&self) -> Option<ExclusionReason> {
        match self {
            FilterVerdict::Kept(_) => None,
            FilterVerdict::Excluded(e) => Some(e.reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics over the kept prices for one keyword.
///
/// Quartiles are positional (`sorted[n / 4]`, `sorted[3n / 4]`), not
/// interpolated. All fields come from the same sorted sequence, so
/// `min <= q1 <= median <= q3 <= max` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub trimmed_mean: f64,
}

impl PriceSummary {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} | min ${:.2} | Q1 ${:.2} | median ${:.2} | Q3 ${:.2} | max ${:.2} | mean ${:.2} | trimmed ${:.2}",
            self.count,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
            self.mean,
            self.trimmed_mean,
        )
    }
}

/// Coarse reliability label for a [`PriceSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLabel::High => write!(f, "High"),
            ConfidenceLabel::Medium => write!(f, "Medium"),
            ConfidenceLabel::Low => write!(f, "Low"),
        }
    }
}

// ---------------------------------------------------------------------------
// Listings & profit
// ---------------------------------------------------------------------------

/// A marketplace item under consideration for purchase.
///
/// `price` is the estimated market (resale) value; `current_bid` and
/// `shipping_cost` are what acquiring it would cost right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub price: Decimal,
    pub url: String,
    pub source: String,
    pub image_urls: Vec<String>,
    pub current_bid: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl Listing {
    /// A listing with only the required fields; source is "Unknown".
    pub fn new(title: impl Into<String>, price: Decimal, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            url: url.into(),
            source: "Unknown".to_string(),
            image_urls: Vec::new(),
            current_bid: None,
            shipping_cost: None,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<Decimal>| match v {
            Some(d) => format!("${d:.2}"),
            None => "n/a".to_string(),
        };
        writeln!(f, "{} [{}]", self.title, self.source)?;
        writeln!(f, "  Price:    ${:.2}", self.price)?;
        writeln!(f, "  Bid:      {}", opt(self.current_bid))?;
        writeln!(f, "  Shipping: {}", opt(self.shipping_cost))?;
        writeln!(f, "  URL:      {}", self.url)?;
        if !self.image_urls.is_empty() {
            writeln!(f, "  Images:   {}", self.image_urls.join(", "))?;
        }
        write!(f, "  Seen:     {}", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// Acquisition cost versus market value for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitEvaluation {
    pub market_value: Decimal,
    pub bid: Decimal,
    pub shipping: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for Resell Scout.
///
/// All of them are recoverable at the menu boundary.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Price source error {status}: {excerpt}")]
    Source { status: u16, excerpt: String },

    #[error("No usable prices to summarize")]
    EmptyInput,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
