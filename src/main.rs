//! Resell Scout: auction resale profitability from live marketplace prices.
//!
//! Entry point. Loads `.env` and configuration, initialises structured
//! logging, builds the price source and image downloader, then hands
//! stdin/stdout to the interactive menu.

use anyhow::Result;
use std::io;
use std::time::Duration;
use tracing::info;

use resell_scout::cli::App;
use resell_scout::config::AppConfig;
use resell_scout::engine::images::ImageDownloader;
use resell_scout::pricing::ebay::EbayClient;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load_or_default(CONFIG_PATH)?;
    info!(
        name = %cfg.app.name,
        search_limit = cfg.pricing.search_limit,
        trim_fraction = cfg.analysis.trim_fraction,
        image_dir = %cfg.images.output_dir,
        "Resell Scout starting up"
    );

    let source = EbayClient::new(cfg.source_config())?;
    let downloader = ImageDownloader::new(Duration::from_secs(cfg.images.timeout_secs))?;

    let stdin = io::stdin();
    let mut app = App::new(cfg, Box::new(source), downloader, stdin.lock(), io::stdout());
    app.run().await?;

    info!("Resell Scout shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr so they stay out
/// of the menu output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resell_scout=info"));

    let json_logging = std::env::var("SCOUT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}
