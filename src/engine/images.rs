//! Median-neighbourhood listings and their images.
//!
//! Picks the kept listings whose price is closest to the median and
//! downloads each one's image, one request at a time in rank order. A
//! failed or missing image is recorded inline and never stops the batch.

use anyhow::{Context, Result};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::storage;
use crate::types::KeptListing;

// ---------------------------------------------------------------------------
// Neighbourhood selection
// ---------------------------------------------------------------------------

/// The `n` kept listings nearest the median price, closest first.
/// Ties keep search order.
pub fn median_neighbourhood(kept: &[KeptListing], median: f64, n: usize) -> Vec<KeptListing> {
    let mut ranked: Vec<&KeptListing> = kept.iter().collect();
    ranked.sort_by(|a, b| (a.price - median).abs().total_cmp(&(b.price - median).abs()));
    ranked.into_iter().take(n).cloned().collect()
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Result of fetching one listing's image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Saved(PathBuf),
    NoImage,
    Failed(String),
}

impl fmt::Display for ImageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOutcome::Saved(path) => write!(f, "saved {}", path.display()),
            ImageOutcome::NoImage => write!(f, "no image"),
            ImageOutcome::Failed(reason) => write!(f, "download failed: {reason}"),
        }
    }
}

/// One ranked neighbour plus what happened to its image.
#[derive(Debug, Clone)]
pub struct NeighbourImage {
    /// 1-based.
    pub rank: usize,
    pub listing: KeptListing,
    pub outcome: ImageOutcome,
}

/// Plain HTTP image fetcher with a fixed timeout and no retry.
pub struct ImageDownloader {
    http: Client,
}

impl ImageDownloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("ResellScout/0.1.0")
            .build()
            .context("Failed to build HTTP client for image downloads")?;
        Ok(Self { http })
    }

    /// Fetch the raw bytes at `url`.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Image request to {url} failed"))?;

        if !resp.status().is_success() {
            anyhow::bail!("HTTP {}", resp.status().as_u16());
        }

        let bytes = resp.bytes().await.context("Failed to read image body")?;
        Ok(bytes.to_vec())
    }

    /// Download and save the image of each listing, in order. Ranks start
    /// at 1. Only failing to create `output_dir` aborts the batch.
    pub async fn fetch_all(
        &self,
        listings: &[KeptListing],
        keyword: &str,
        output_dir: &Path,
    ) -> Result<Vec<NeighbourImage>> {
        storage::ensure_dir(output_dir)?;

        let mut results = Vec::with_capacity(listings.len());
        for (i, listing) in listings.iter().enumerate() {
            let rank = i + 1;
            let outcome = self.fetch_one(listing, keyword, rank, output_dir).await;
            if let ImageOutcome::Failed(reason) = &outcome {
                warn!(rank, title = %listing.title, reason = %reason, "Image download failed");
            }
            results.push(NeighbourImage {
                rank,
                listing: listing.clone(),
                outcome,
            });
        }

        let saved = results
            .iter()
            .filter(|r| matches!(r.outcome, ImageOutcome::Saved(_)))
            .count();
        info!(keyword, saved, total = results.len(), dir = %output_dir.display(), "Image batch complete");

        Ok(results)
    }

    async fn fetch_one(
        &self,
        listing: &KeptListing,
        keyword: &str,
        rank: usize,
        output_dir: &Path,
    ) -> ImageOutcome {
        let Some(url) = listing.detail.as_ref().and_then(|d| d.image_url.as_deref()) else {
            return ImageOutcome::NoImage;
        };

        debug!(rank, url, "Downloading image");

        let bytes = match self.download(url).await {
            Ok(b) => b,
            Err(e) => return ImageOutcome::Failed(format!("{e:#}")),
        };

        let file_name = storage::image_file_name(keyword, rank, url);
        match storage::save_image(output_dir, &file_name, &bytes) {
            Ok(path) => ImageOutcome::Saved(path),
            Err(e) => ImageOutcome::Failed(format!("{e:#}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
