//! Listing data sources that do not touch the network.

pub mod mock;

pub use mock::fetch_mock_listings;
