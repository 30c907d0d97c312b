//! Chart-ready series derived from a finished run.
//!
//! Series indexed by day have one entry per value (day 0 included); return
//! based series start at day 1.

use serde::{Deserialize, Serialize};

use super::metrics::sample_std_dev;
use crate::model::{Portfolio, TRADING_DAYS_PER_YEAR};

fn simple_return(previous: f64, current: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous
    } else {
        0.0
    }
}

/// Simple daily returns as fractions, one per day after day 0.
///
/// A zero previous value yields a return of 0.
#[must_use]
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| simple_return(w[0], w[1]))
        .collect()
}

#[must_use]
pub fn daily_returns_pct(values: &[f64]) -> Vec<f64> {
    daily_returns(values).into_iter().map(|r| r * 100.0).collect()
}

/// Distance below the running peak in percent (0 at a new peak)
#[must_use]
pub fn drawdown_pct(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            if peak > 0.0 {
                (v - peak) / peak * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Values deflated by `(1 + inflation_rate)^(day / 252)`
#[must_use]
pub fn real_values(values: &[f64], inflation_rate: f64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(day, v)| v / (1.0 + inflation_rate).powf(day as f64 / TRADING_DAYS_PER_YEAR))
        .collect()
}

/// Annualized standard deviation of the last `window` daily returns.
///
/// One entry per daily return; NaN until `window` returns are available.
#[must_use]
pub fn rolling_volatility(values: &[f64], window: usize) -> Vec<f64> {
    let returns = daily_returns(values);
    let annualize = TRADING_DAYS_PER_YEAR.sqrt();
    (0..returns.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return f64::NAN;
            }
            sample_std_dev(&returns[i + 1 - window..=i]).map_or(f64::NAN, |sd| sd * annualize)
        })
        .collect()
}

/// Actual weight of every asset on every simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightHistory {
    pub assets: Vec<String>,
    /// `weights[day][asset]`
    pub weights: Vec<Vec<f64>>,
}

impl WeightHistory {
    /// Weights from the realized price and quantity histories.
    ///
    /// All weights of a day are 0 when that day's total value is 0.
    #[must_use]
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        let assets = portfolio.assets();
        let days = assets
            .iter()
            .map(|a| a.prices().len().min(a.quantity_history().len()))
            .min()
            .unwrap_or(0);

        let weights = (0..days)
            .map(|day| {
                let values: Vec<f64> = assets
                    .iter()
                    .map(|a| a.prices()[day] * a.quantity_history()[day])
                    .collect();
                let total: f64 = values.iter().sum();
                values
                    .into_iter()
                    .map(|v| if total > 0.0 { v / total } else { 0.0 })
                    .collect()
            })
            .collect();

        Self {
            assets: assets.iter().map(|a| a.name.clone()).collect(),
            weights,
        }
    }
}

/// Pearson correlation of daily asset returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub assets: Vec<String>,
    /// `values[i][j]`, NaN where either asset's returns have no variance
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    #[must_use]
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        let returns: Vec<Vec<f64>> = portfolio
            .assets()
            .iter()
            .map(|a| daily_returns(a.prices()))
            .collect();

        let values = returns
            .iter()
            .map(|x| returns.iter().map(|y| pearson(x, y)).collect())
            .collect();

        Self {
            assets: portfolio.assets().iter().map(|a| a.name.clone()).collect(),
            values,
        }
    }

    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.assets.iter().position(|n| n == a)?;
        let j = self.assets.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation over the common prefix of `x` and `y`
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        f64::NAN
    } else {
        cov / (var_x * var_y).sqrt()
    }
}
