//! Rebalancing triggers and execution

use serde::{Deserialize, Serialize};

use crate::model::{Portfolio, RebalanceRecord, TradeEntry};

/// When a rebalance fires. Never evaluated for day 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RebalancePolicy {
    /// Every `period` days
    Periodic { period: usize },
    /// When any weight drifts more than `tolerance` from its target
    Deviation { tolerance: f64 },
    /// Either of the above
    Combined { period: usize, tolerance: f64 },
}

impl RebalancePolicy {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RebalancePolicy::Periodic { .. } => "periodic",
            RebalancePolicy::Deviation { .. } => "deviation",
            RebalancePolicy::Combined { .. } => "combined",
        }
    }

    /// Evaluate the trigger after the day's prices have been updated
    #[must_use]
    pub fn should_rebalance(&self, portfolio: &Portfolio, day: usize) -> bool {
        if day == 0 {
            return false;
        }
        match *self {
            RebalancePolicy::Periodic { period } => is_period_day(day, period),
            RebalancePolicy::Deviation { tolerance } => exceeds_tolerance(portfolio, tolerance),
            RebalancePolicy::Combined { period, tolerance } => {
                is_period_day(day, period) || exceeds_tolerance(portfolio, tolerance)
            }
        }
    }
}

fn is_period_day(day: usize, period: usize) -> bool {
    period > 0 && day % period == 0
}

/// Current weight of every asset, in portfolio order.
///
/// All weights are 0 when the total value is not positive.
#[must_use]
pub fn current_weights(portfolio: &Portfolio) -> Vec<f64> {
    let total = portfolio.total_value();
    portfolio
        .assets()
        .iter()
        .map(|a| {
            if total > 0.0 {
                a.market_value() / total
            } else {
                0.0
            }
        })
        .collect()
}

/// Whether any asset's weight is further than `tolerance` from its target
#[must_use]
pub fn exceeds_tolerance(portfolio: &Portfolio, tolerance: f64) -> bool {
    if portfolio.total_value() <= 0.0 {
        return false;
    }
    portfolio
        .assets()
        .iter()
        .zip(current_weights(portfolio))
        .any(|(asset, weight)| (weight - asset.target_weight).abs() > tolerance)
}

/// Trade every asset back to its target weight at the current prices.
///
/// The fee is `|delta notional| * fee_rate`. A buy's notional is reduced by
/// the fee and a sell's is increased by it. Assets without a positive price
/// cannot be traded and keep their quantity.
///
/// Trades are portfolio-wide: every asset's quantity history is back-filled
/// through `day` together. Trading a single asset on its own schedule would
/// need a different back-fill rule.
pub fn rebalance(portfolio: &mut Portfolio, day: usize, fee_rate: f64) -> RebalanceRecord {
    let total = portfolio.total_value();
    let mut trades = Vec::with_capacity(portfolio.assets().len());
    let mut total_fees = 0.0;

    for asset in portfolio.assets_mut() {
        let price = asset.current_price();
        let previous_quantity = asset.quantity;

        let (new_quantity, fee) = if price > 0.0 {
            let target_notional = total * asset.target_weight;
            let current_notional = previous_quantity * price;
            let delta = target_notional - current_notional;
            let fee = delta.abs() * fee_rate;
            let adjusted = if delta > 0.0 {
                target_notional - fee
            } else {
                target_notional + fee
            };
            (adjusted / price, fee)
        } else {
            (previous_quantity, 0.0)
        };

        // Keep the history contiguous: days since the last entry hold the pre-trade quantity
        while asset.quantity_history.len() < day {
            asset.quantity_history.push(previous_quantity);
        }
        asset.quantity_history.truncate(day);
        asset.quantity_history.push(new_quantity);
        asset.quantity = new_quantity;

        total_fees += fee;
        trades.push(TradeEntry {
            asset: asset.name.clone(),
            previous_quantity,
            new_quantity,
            quantity_change: new_quantity - previous_quantity,
            fee,
        });
    }

    RebalanceRecord {
        day,
        portfolio_value: total,
        trades,
        total_fees,
    }
}
