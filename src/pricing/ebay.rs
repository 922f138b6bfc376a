//! eBay Browse API price search.
//!
//! Queries `item_summary/search` for active listings matching a keyword and
//! returns the raw item summaries. Nothing is filtered here.
//!
//! API docs: https://developer.ebay.com/api-docs/buy/browse/resources/item_summary/methods/search
//! Auth: `Authorization: Bearer {token}` (pre-issued application token)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::PriceSource;
use crate::config::SourceConfig;
use crate::types::{RawListing, ScoutError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const SOURCE_NAME: &str = "ebay";

/// Maximum characters of an error body kept for diagnostics.
const ERROR_EXCERPT_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// API response types (eBay JSON → Rust)
// ---------------------------------------------------------------------------

/// Search response envelope. `itemSummaries` is absent when nothing matched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    item_summaries: Vec<ItemSummary>,
    #[serde(default)]
    total: Option<u64>,
}

/// `ItemSummary`: only the fields we need. A field of the wrong type reads
/// as absent, so one odd item never fails the whole response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSummary {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    condition: Option<String>,
    /// Normally `{"value": "12.34", "currency": "USD"}`; kept as raw JSON
    /// so the filter can tell missing from malformed.
    #[serde(default)]
    price: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient")]
    item_web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageRef {
    #[serde(default, deserialize_with = "lenient")]
    image_url: Option<String>,
}

/// Deserialize `T`, or `None` when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// eBay Browse API client.
pub struct EbayClient {
    http: Client,
    config: SourceConfig,
}

impl EbayClient {
    /// Create a new client. A missing token is accepted here and reported
    /// as a configuration error on the first search.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent("ResellScout/0.1.0")
            .build()
            .context("Failed to build HTTP client for eBay")?;

        Ok(Self { http, config })
    }

    // -- Internal helpers ------------------------------------------------

    fn token(&self) -> Result<&SecretString, ScoutError> {
        self.config.token.as_ref().ok_or_else(|| {
            ScoutError::Configuration(format!(
                "{} environment variable not set",
                self.config.token_env
            ))
        })
    }

    fn search_url(&self, keyword: &str, limit: u32) -> String {
        let base = &self.config.search_url;
        let sep = if base.contains('?') { '&' } else { '?' };
        format!("{base}{sep}q={}&limit={limit}", urlencoding::encode(keyword))
    }

    /// Extract the raw price text from a price payload.
    fn price_payload(price: &Value) -> Option<String> {
        match price {
            Value::Object(map) => map.get("value").and_then(Self::scalar_text),
            other => Self::scalar_text(other),
        }
    }

    fn scalar_text(v: &Value) -> Option<String> {
        match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            // Anything else is present but cannot be a price.
            other => Some(other.to_string()),
        }
    }

    fn to_raw_listing(item: ItemSummary) -> RawListing {
        RawListing {
            title: item.title.unwrap_or_default(),
            condition: item.condition.unwrap_or_default(),
            price: item.price.as_ref().and_then(Self::price_payload),
            image_url: item.image.and_then(|i| i.image_url),
            item_url: item.item_web_url,
        }
    }

    /// First characters of an error body.
    fn excerpt(body: &str) -> String {
        body.chars().take(ERROR_EXCERPT_CHARS).collect()
    }
}

// ---------------------------------------------------------------------------
// PriceSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl PriceSource for EbayClient {
    async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<RawListing>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            anyhow::bail!("Search keyword cannot be empty");
        }
        let token = self.token()?;
        let url = self.search_url(keyword, limit);

        debug!(url = %url, "Fetching eBay item summaries");

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", token.expose_secret()))
            .header("Accept", "application/json")
            .send()
            .await
            .context("eBay search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), keyword, "eBay search returned an error");
            return Err(ScoutError::Source {
                status: status.as_u16(),
                excerpt: Self::excerpt(&body),
            }
            .into());
        }

        let data: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse eBay search response")?;

        let listings: Vec<RawListing> = data
            .item_summaries
            .into_iter()
            .map(Self::to_raw_listing)
            .collect();

        info!(
            keyword,
            returned = listings.len(),
            total = ?data.total,
            "eBay search complete"
        );

        Ok(listings)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
