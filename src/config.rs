//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default, so a missing file or section still yields a usable
//! configuration. The bearer token is referenced by env-var name in the
//! config and resolved once into a [`SourceConfig`].

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::analysis::confidence::ConfidenceConfig;
use crate::types::ScoutError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: GeneralConfig,
    pub pricing: PricingConfig,
    pub analysis: AnalysisConfig,
    pub images: ImagesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "Resell Scout".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    /// Item-summary search endpoint.
    pub search_url: String,
    /// Name of the env var holding the OAuth bearer token.
    pub token_env: String,
    /// Results requested per search.
    pub search_limit: u32,
    pub timeout_secs: u64,
    /// Unauthenticated API root used by the connectivity test.
    pub probe_url: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            search_url: "https://api.ebay.com/buy/browse/v1/item_summary/search".to_string(),
            token_env: "EBAY_OAUTH_TOKEN".to_string(),
            search_limit: 20,
            timeout_secs: 15,
            probe_url: "https://api.github.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fraction trimmed from each end for the trimmed mean.
    pub trim_fraction: f64,
    pub high_min_count: usize,
    pub high_max_spread: f64,
    pub medium_min_count: usize,
    pub medium_max_spread: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let confidence = ConfidenceConfig::default();
        Self {
            trim_fraction: crate::analysis::stats::DEFAULT_TRIM_FRACTION,
            high_min_count: confidence.high_min_count,
            high_max_spread: confidence.high_max_spread,
            medium_min_count: confidence.medium_min_count,
            medium_max_spread: confidence.medium_max_spread,
        }
    }
}

impl AnalysisConfig {
    pub fn confidence(&self) -> ConfidenceConfig {
        ConfidenceConfig {
            high_min_count: self.high_min_count,
            high_max_spread: self.high_max_spread,
            medium_min_count: self.medium_min_count,
            medium_max_spread: self.medium_max_spread,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImagesConfig {
    pub output_dir: String,
    /// How many median-neighbourhood listings to show and download.
    pub top_n: usize,
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            output_dir: "scout_images".to_string(),
            top_n: 10,
            timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            let cfg = Self::load(path)?;
            info!(path, "Configuration loaded");
            Ok(cfg)
        } else {
            warn!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<()> {
        let t = self.analysis.trim_fraction;
        if !(0.0..0.5).contains(&t) {
            return Err(ScoutError::Configuration(format!(
                "analysis.trim_fraction must be in [0, 0.5), got {t}"
            ))
            .into());
        }
        if self.pricing.search_limit == 0 {
            return Err(ScoutError::Configuration("pricing.search_limit must be > 0".into()).into());
        }
        if self.pricing.timeout_secs == 0 || self.images.timeout_secs == 0 {
            return Err(ScoutError::Configuration("timeouts must be > 0 seconds".into()).into());
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Build the price source settings, reading the token from the process
    /// environment. A missing token is not an error here; searching is.
    pub fn source_config(&self) -> SourceConfig {
        let token = Self::resolve_env(&self.pricing.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::new);
        if token.is_none() {
            warn!(env = %self.pricing.token_env, "No bearer token configured; live searches will fail");
        }
        SourceConfig {
            search_url: self.pricing.search_url.clone(),
            token_env: self.pricing.token_env.clone(),
            token,
            timeout: Duration::from_secs(self.pricing.timeout_secs),
        }
    }
}

/// Explicit settings for the price source client.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub search_url: String,
    /// Env var the token came from, for error messages.
    pub token_env: String,
    pub token: Option<SecretString>,
    pub timeout: Duration,
}

impl SourceConfig {
    /// Settings with an explicit token, bypassing the environment.
    pub fn with_token(search_url: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            search_url: search_url.into(),
            token_env: PricingConfig::default().token_env,
            token: token.map(|t| SecretString::new(t.to_string())),
            timeout: Duration::from_secs(PricingConfig::default().timeout_secs),
        }
    }
}
