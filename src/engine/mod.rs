//! Orchestration.
//!
//! Wires the price source, filter, statistics and profit evaluation into
//! the operations the menu exposes, and fetches images for the listings
//! closest to the market median.

pub mod images;
pub mod pipeline;
