//! Mock marketplace listings.
//!
//! A fixed catalogue standing in for a real marketplace fetch, used by the
//! offline menu options and the mock pipeline.

use chrono::Utc;
use rust_decimal_macros::dec;

use crate::types::Listing;

const MOCK_SOURCE: &str = "mock";

/// Returns the mock catalogue, in a stable order.
pub fn fetch_mock_listings() -> Vec<Listing> {
    let now = Utc::now();
    vec![
        Listing {
            title: "Vintage Camera".to_string(),
            price: dec!(49.99),
            url: "https://example.com/item1".to_string(),
            source: MOCK_SOURCE.to_string(),
            image_urls: vec!["https://example.com/item1.jpg".to_string()],
            current_bid: Some(dec!(30.00)),
            shipping_cost: Some(dec!(8.99)),
            timestamp: now,
        },
        Listing {
            title: "Nintendo DS Lite".to_string(),
            price: dec!(65.00),
            url: "https://example.com/item2".to_string(),
            source: MOCK_SOURCE.to_string(),
            image_urls: vec!["https://example.com/item2.jpg".to_string()],
            current_bid: Some(dec!(50.00)),
            shipping_cost: Some(dec!(5.50)),
            timestamp: now,
        },
    ]
}
