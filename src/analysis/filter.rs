//! Listing filter.
//!
//! Classifies each raw search result as kept or excluded. Checks run in a
//! fixed order and the first match wins:
//! missing price → suspicious title → unparseable price → kept.

use tracing::debug;

use crate::types::{
    ExcludedListing, ExclusionReason, FilterVerdict, KeptListing, ListingDetail, RawListing,
};

/// Lowercase phrases marking an item as non-functional or sold for parts.
pub const SUSPICIOUS_PHRASES: &[&str] = &[
    "for parts",
    "parts only",
    "parts or repair",
    "spares or repair",
    "for repair",
    "not working",
    "non working",
    "non-working",
    "nonworking",
    "doesn't work",
    "does not work",
    "broken",
    "as-is",
    "as is,",
    "sold as is",
    "faulty",
    "defective",
];

/// Kept and excluded results of one search, in search order.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub kept: Vec<KeptListing>,
    pub excluded: Vec<ExcludedListing>,
}

impl FilterReport {
    /// Prices of the kept listings, in search order.
    pub fn prices(&self) -> Vec<f64> {
        self.kept.iter().map(|k| k.price).collect()
    }

    /// Number of exclusions with the given reason.
    pub fn excluded_count(&self, reason: ExclusionReason) -> usize {
        self.excluded.iter().filter(|e| e.reason == reason).count()
    }

    pub fn total(&self) -> usize {
        self.kept.len() + self.excluded.len()
    }
}

/// Whether the title contains any suspicious phrase, ignoring case.
pub fn is_suspicious_title(title: &str) -> bool {
    let t = title.to_lowercase();
    SUSPICIOUS_PHRASES.iter().any(|p| t.contains(p))
}

/// Parse a raw price payload. Non-finite values count as unparseable.
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Classify one record. `with_detail` attaches condition and URLs to kept
/// listings for later display or download.
pub fn classify(record: &RawListing, with_detail: bool) -> FilterVerdict {
    let exclude = |reason| {
        FilterVerdict::Excluded(ExcludedListing {
            title: record.title.clone(),
            reason,
        })
    };

    let Some(raw_price) = record.price.as_deref() else {
        return exclude(ExclusionReason::MissingPrice);
    };

    if is_suspicious_title(&record.title) {
        return exclude(ExclusionReason::SuspiciousTitle);
    }

    let Some(price) = parse_price(raw_price) else {
        return exclude(ExclusionReason::InvalidPriceFormat);
    };

    let detail = with_detail.then(|| ListingDetail {
        condition: record.condition.clone(),
        image_url: record.image_url.clone(),
        item_url: record.item_url.clone(),
    });

    FilterVerdict::Kept(KeptListing {
        title: record.title.clone(),
        price,
        detail,
    })
}

/// Classify a batch of records into a [`FilterReport`].
pub fn filter_listings(records: &[RawListing], with_detail: bool) -> FilterReport {
    let mut report = FilterReport::default();

    for record in records {
        match classify(record, with_detail) {
            FilterVerdict::Kept(k) => report.kept.push(k),
            FilterVerdict::Excluded(e) => {
                debug!(title = %e.title, reason = %e.reason, "Listing excluded");
                report.excluded.push(e);
            }
        }
    }

    debug!(
        kept = report.kept.len(),
        excluded = report.excluded.len(),
        "Listings filtered"
    );

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
