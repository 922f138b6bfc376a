//! Resell Scout: auction resale profitability from live marketplace prices.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod pricing;
pub mod data;
pub mod analysis;
pub mod engine;
pub mod storage;
pub mod cli;
