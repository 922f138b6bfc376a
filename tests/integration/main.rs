//! End-to-end tests against an in-process fake marketplace.
//!
//! Exercises the real HTTP client, filter, statistics, confidence and
//! image persistence together.

mod fake_market;

use std::time::Duration;

use fake_market::{FakeMarket, TOKEN};
use rust_decimal_macros::dec;
use resell_scout::analysis::confidence::{estimate_confidence, ConfidenceConfig};
use resell_scout::analysis::stats::summarize;
use resell_scout::cli::App;
use resell_scout::config::{AnalysisConfig, AppConfig, SourceConfig};
use resell_scout::engine::images::{median_neighbourhood, ImageDownloader, ImageOutcome};
use resell_scout::engine::pipeline::estimate_market_value;
use resell_scout::pricing::ebay::EbayClient;
use resell_scout::pricing::probe::probe;
use resell_scout::pricing::{search_filtered, PriceSource};
use resell_scout::types::{ConfidenceLabel, ExclusionReason, ScoutError};

fn client(url: String, token: Option<&str>) -> EbayClient {
    EbayClient::new(SourceConfig::with_token(url, token)).unwrap()
}

/// Run the menu with `probe_url` and scripted input, returning its output.
async fn run_menu(probe_url: String, input: &str) -> String {
    let mut config = AppConfig::default();
    config.pricing.probe_url = probe_url;
    let ebay = client("http://127.0.0.1:9/search".to_string(), Some(TOKEN));
    let mut app = App::new(
        config,
        Box::new(ebay),
        ImageDownloader::new(Duration::from_secs(5)).unwrap(),
        std::io::Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
    );
    app.run().await.unwrap();
    String::from_utf8(app.output().clone()).unwrap()
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("resell_scout_it_{}", uuid::Uuid::new_v4()))
}

// -- Search ------------------------------------------------------------------

#[tokio::test]
async fn test_search_sends_keyword_limit_and_bearer() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));

    let raw = ebay.search("Nintendo DS Lite", 20).await.unwrap();
    assert_eq!(raw.len(), 12);

    let seen = market.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].q, "Nintendo DS Lite");
    assert_eq!(seen[0].limit, "20");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_search_preserves_endpoint_order() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));

    let raw = ebay.search("Nintendo DS Lite", 20).await.unwrap();
    assert_eq!(raw[0].title, "Nintendo DS Lite Cobalt");
    assert_eq!(raw[0].price.as_deref(), Some("52.00"));
    assert!(raw[1].price.is_none());
    assert!(raw[7].price.is_none()); // price object without a value
    assert_eq!(raw[11].title, "Nintendo DS Lite Onyx");
}

#[tokio::test]
async fn test_search_no_results() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));
    assert!(ebay.search("Zune HD", 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), None);

    let err = ebay.search("Nintendo DS Lite", 20).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScoutError>(),
        Some(ScoutError::Configuration(_))
    ));
    assert!(market.seen().is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_source_error() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some("wrong"));

    let err = ebay.search("Nintendo DS Lite", 20).await.unwrap_err();
    match err.downcast_ref::<ScoutError>() {
        Some(ScoutError::Source { status, excerpt }) => {
            assert_eq!(*status, 401);
            assert!(excerpt.contains("Invalid access token"));
        }
        other => panic!("expected source error, got {other:?}"),
    }
    assert_eq!(market.seen().len(), 1);
}

#[tokio::test]
async fn test_server_error_excerpt_truncated() {
    let market = FakeMarket::start().await;
    let ebay = client(format!("{}/broken/search", market.base), Some(TOKEN));

    let err = ebay.search("Nintendo DS Lite", 20).await.unwrap_err();
    match err.downcast_ref::<ScoutError>() {
        Some(ScoutError::Source { status, excerpt }) => {
            assert_eq!(*status, 503);
            assert_eq!(excerpt.len(), 200);
        }
        other => panic!("expected source error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_without_retry() {
    let mut config = SourceConfig::with_token("http://127.0.0.1:9/search", Some(TOKEN));
    config.timeout = Duration::from_secs(2);
    let ebay = EbayClient::new(config).unwrap();
    let err = ebay.search("Nintendo DS Lite", 20).await.unwrap_err();
    assert!(err.downcast_ref::<ScoutError>().is_none());
}

// -- Filtering over the wire -------------------------------------------------

#[tokio::test]
async fn test_malformed_prices_are_excluded_not_fatal() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));

    let report = search_filtered(&ebay, "Game Boy", 20, false).await.unwrap();
    assert_eq!(report.prices(), vec![35.0, 40.5]);
    // "N/A" and an empty value are both present but unparseable
    assert_eq!(report.excluded_count(ExclusionReason::InvalidPriceFormat), 2);
    assert_eq!(report.excluded_count(ExclusionReason::MissingPrice), 0);
    // "broken" in the title wins over the bad price
    assert_eq!(report.excluded_count(ExclusionReason::SuspiciousTitle), 1);
    assert!(report.kept.iter().all(|k| k.detail.is_none()));
}

// -- End-to-end estimate -----------------------------------------------------

#[tokio::test]
async fn test_nintendo_ds_lite_scenario() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));
    let analysis = AnalysisConfig::default();

    let est = estimate_market_value(&ebay, "Nintendo DS Lite", 20, &analysis)
        .await
        .unwrap();

    assert_eq!(est.report.total(), 12);
    assert_eq!(est.report.kept.len(), 9);
    assert_eq!(est.report.excluded_count(ExclusionReason::MissingPrice), 2);
    assert_eq!(est.report.excluded_count(ExclusionReason::SuspiciousTitle), 1);
    assert_eq!(est.report.excluded_count(ExclusionReason::InvalidPriceFormat), 0);

    // sorted: 45 48 50 52 55 55 58 60 62
    let s = &est.summary;
    assert_eq!(s.count, 9);
    assert_eq!(s.min, 45.0);
    assert_eq!(s.q1, 50.0);
    assert_eq!(s.median, 55.0);
    assert_eq!(s.q3, 58.0);
    assert_eq!(s.max, 62.0);
    assert!((s.mean - 485.0 / 9.0).abs() < 1e-9);
    assert_eq!(s.trimmed_mean, s.mean);

    // Same nine values summarized directly give the same label.
    let prices = [45.0, 48.0, 50.0, 52.0, 55.0, 55.0, 58.0, 60.0, 62.0];
    let direct = summarize(&prices, analysis.trim_fraction).unwrap();
    assert_eq!(&direct, s);
    assert_eq!(estimate_confidence(&direct, &ConfidenceConfig::default()), est.confidence);
    assert_eq!(est.confidence, ConfidenceLabel::Low);

    let eval = est.evaluate(Some(dec!(40)), Some(dec!(7.25)));
    assert_eq!(eval.profit, dec!(7.75));
}

// -- Images ------------------------------------------------------------------

#[tokio::test]
async fn test_median_neighbourhood_images() {
    let market = FakeMarket::start().await;
    let ebay = client(market.search_url(), Some(TOKEN));
    let est = estimate_market_value(&ebay, "Nintendo DS Lite", 20, &AnalysisConfig::default())
        .await
        .unwrap();

    let nearest = median_neighbourhood(&est.report.kept, est.summary.median, 10);
    let titles: Vec<_> = nearest.iter().map(|k| k.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Nintendo DS Lite Pink",
            "Nintendo DS Lite Onyx",
            "Nintendo DS Lite Cobalt",
            "Nintendo DS Lite Black",
            "Nintendo DS Lite Red",
            "Nintendo DS Lite + games",
            "DS Lite bundle",
            "Nintendo DS Lite Silver",
            "Nintendo DS Lite White",
        ]
    );

    let dir = temp_dir();
    let downloader = ImageDownloader::new(Duration::from_secs(5)).unwrap();
    let results = downloader.fetch_all(&nearest, "Nintendo DS Lite", &dir).await.unwrap();
    assert_eq!(results.len(), 9);

    // rank 4 is a 404; it must not stop ranks 5..9
    match &results[3].outcome {
        ImageOutcome::Failed(reason) => assert!(reason.contains("404"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(results[8].outcome, ImageOutcome::NoImage);

    let saved: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            ImageOutcome::Saved(p) => Some(p.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(saved.len(), 7);

    assert_eq!(std::fs::read(dir.join("nintendo_ds_lite_1.jpg")).unwrap(), b"ok-b.jpg");
    assert_eq!(std::fs::read(dir.join("nintendo_ds_lite_2.jpg")).unwrap(), b"ok-g.jpg");
    assert_eq!(std::fs::read(dir.join("nintendo_ds_lite_7.png")).unwrap(), b"ok-c.png");
    assert!(!dir.join("nintendo_ds_lite_4.jpg").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

// -- Probe -------------------------------------------------------------------

#[tokio::test]
async fn test_probe_lists_top_level_keys() {
    let market = FakeMarket::start().await;
    let report = probe(&format!("{}/", market.base), Duration::from_secs(5)).await.unwrap();
    assert!(report.is_ok());
    assert_eq!(
        report.keys,
        vec!["current_user_url", "emojis_url", "events_url"]
    );
}

#[tokio::test]
async fn test_probe_non_200() {
    let market = FakeMarket::start().await;
    let report = probe(&format!("{}/down", market.base), Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.status, 503);
    assert!(report.keys.is_empty());
}

#[tokio::test]
async fn test_menu_connection_check_reports_success() {
    let market = FakeMarket::start().await;
    let out = run_menu(format!("{}/", market.base), "1\n2\n").await;
    assert!(out.contains("works. Status code: 200"));
    assert!(out.contains("   - emojis_url"));
}

#[tokio::test]
async fn test_menu_connection_check_non_200_is_not_success() {
    let market = FakeMarket::start().await;
    let out = run_menu(format!("{}/down", market.base), "1\n2\n").await;
    assert!(!out.contains("works"));
    assert!(out.contains("Unexpected status"));
    assert!(out.contains("Status code: 503"));
}
