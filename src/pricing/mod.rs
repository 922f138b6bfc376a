//! Price source integrations.
//!
//! Defines the `PriceSource` trait and provides:
//! - eBay Browse API item-summary search (live market prices)
//! - an unauthenticated connectivity probe

pub mod ebay;
pub mod probe;

use anyhow::Result;
use async_trait::async_trait;

use crate::analysis::filter::{filter_listings, FilterReport};
use crate::types::RawListing;

/// Abstraction over marketplace price searches.
///
/// One call to [`PriceSource::search`] is exactly one outbound request with
/// no retry; results come back unfiltered in the endpoint's own order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Search active listings for `keyword`, returning at most `limit` records.
    async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<RawListing>>;

    /// Source name for logging and identification.
    fn name(&self) -> &'static str;
}

/// Search and split the results into kept and excluded listings.
///
/// `with_detail` keeps condition and URLs on kept listings, for display and
/// image downloads.
pub async fn search_filtered(
    source: &dyn PriceSource,
    keyword: &str,
    limit: u32,
    with_detail: bool,
) -> Result<FilterReport> {
    let records = source.search(keyword, limit).await?;
    Ok(filter_listings(&records, with_detail))
}
