//! Simulation results
//!
//! Per-asset price and quantity histories stay on the simulated
//! [`Portfolio`](crate::model::Portfolio); the result carries the
//! portfolio-level series.

use serde::{Deserialize, Serialize};

use super::records::{RebalanceRecord, total_fees};

/// Where a run took its prices from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSourceKind {
    /// Generated for this portfolio alone
    Generated,
    /// Replayed from a shared price path
    Shared,
}

/// Complete output of one portfolio run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub portfolio: String,
    /// Total portfolio value per day, index 0 is the initial value
    pub values: Vec<f64>,
    /// Append-only record of every executed rebalance
    pub rebalancing: Vec<RebalanceRecord>,
    pub price_source: PriceSourceKind,
}

impl SimulationResult {
    /// Number of simulated days after day 0
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    #[must_use]
    pub fn initial_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn final_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    #[must_use]
    pub fn total_fees(&self) -> f64 {
        total_fees(&self.rebalancing)
    }

    /// Days on which a rebalance executed
    pub fn rebalance_days(&self) -> impl Iterator<Item = usize> + '_ {
        self.rebalancing.iter().map(|r| r.day)
    }
}
