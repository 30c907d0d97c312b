//! Rebalancing records
//!
//! One [`RebalanceRecord`] is appended to the rebalancing history for every
//! day on which a rebalance executes. Records are never modified afterwards.

use serde::{Deserialize, Serialize};

/// Position change of a single asset during a rebalance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub asset: String,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    /// `new_quantity - previous_quantity`
    pub quantity_change: f64,
    pub fee: f64,
}

impl TradeEntry {
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.quantity_change > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceRecord {
    pub day: usize,
    /// Total value at the day's prices before trading
    pub portfolio_value: f64,
    pub trades: Vec<TradeEntry>,
    pub total_fees: f64,
}

/// Sum of all fees charged over a rebalancing history
#[must_use]
pub fn total_fees(history: &[RebalanceRecord]) -> f64 {
    history.iter().map(|r| r.total_fees).sum()
}
