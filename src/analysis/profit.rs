//! Profit evaluation.
//!
//! Total acquisition cost is bid + shipping (absent parts count as zero);
//! profit is market value minus that cost. Amounts are not validated here.

use rust_decimal::prelude::*;

use crate::types::{Listing, ProfitEvaluation};

impl ProfitEvaluation {
    pub fn new(market_value: Decimal, bid: Option<Decimal>, shipping: Option<Decimal>) -> Self {
        let bid = bid.unwrap_or(Decimal::ZERO);
        let shipping = shipping.unwrap_or(Decimal::ZERO);
        let total_cost = bid + shipping;
        Self {
            market_value,
            bid,
            shipping,
            total_cost,
            profit: market_value - total_cost,
        }
    }

    /// Evaluate against a statistical market value (e.g. a median price).
    pub fn from_estimate(market_value: f64, bid: Option<Decimal>, shipping: Option<Decimal>) -> Self {
        Self::new(to_money(market_value), bid, shipping)
    }

    pub fn is_profitable(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

/// Convert a statistic to a money amount. Non-finite input becomes zero.
pub fn to_money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Buyer's total cost for a listing: current bid + shipping.
pub fn total_cost(listing: &Listing) -> Decimal {
    listing.current_bid.unwrap_or(Decimal::ZERO) + listing.shipping_cost.unwrap_or(Decimal::ZERO)
}

/// Profit using the listing's own price as market value.
pub fn naive_profit(listing: &Listing) -> Decimal {
    listing.price - total_cost(listing)
}

/// A new vector of listings ordered by estimated profit, highest first.
pub fn sort_by_profit(listings: &[Listing]) -> Vec<Listing> {
    let mut ranked = listings.to_vec();
    ranked.sort_by(|a, b| naive_profit(b).cmp(&naive_profit(a)));
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
