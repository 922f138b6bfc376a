//! Connectivity probe.
//!
//! A single unauthenticated GET against a well-known API root, used only to
//! check that outbound HTTPS works before trying a real search.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// What the probe saw.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub status: u16,
    /// Top-level JSON keys of a 200 response; empty otherwise.
    pub keys: Vec<String>,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// GET `url` and report the status plus the top-level keys of the body.
pub async fn probe(url: &str, timeout: Duration) -> Result<ProbeReport> {
    let http = Client::builder()
        .timeout(timeout)
        .user_agent("ResellScout/0.1.0")
        .build()
        .context("Failed to build HTTP client for connectivity probe")?;

    debug!(url, "Probing connectivity");

    let resp = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Connectivity probe to {url} failed"))?;

    let status = resp.status().as_u16();
    if status != 200 {
        info!(url, status, "Probe returned non-200 status");
        return Ok(ProbeReport { status, keys: Vec::new() });
    }

    let body: Value = resp
        .json()
        .await
        .context("Probe response was not JSON")?;

    Ok(ProbeReport {
        status,
        keys: top_level_keys(&body),
    })
}

fn top_level_keys(body: &Value) -> Vec<String> {
    match body {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
