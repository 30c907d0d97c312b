//! Summary statistics of a portfolio value series.

use serde::{Deserialize, Serialize};

use super::series::daily_returns;
use crate::model::{SimulationResult, TRADING_DAYS_PER_YEAR};

/// Sample standard deviation, `None` for fewer than two observations
#[must_use]
pub fn sample_std_dev(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// Largest peak-to-trough decline as a (non-positive) fraction of the peak
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut worst = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            worst = worst.min((v - peak) / peak);
        }
    }
    worst
}

/// Summary of one portfolio's value series.
///
/// Ratios are fractions (`0.05` = 5 %) except `total_return_pct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    pub start_value: f64,
    pub end_value: f64,
    pub days: usize,
    pub total_return_pct: f64,
    /// Compound annual growth rate over `days / 252` years
    pub cagr: f64,
    /// Sample standard deviation of daily simple returns
    pub daily_std_dev: f64,
    pub annual_std_dev: f64,
    /// `(cagr - risk_free_rate) / annual_std_dev`, NaN when the deviation is 0
    pub sharpe_ratio: f64,
    pub max_value: f64,
    pub min_value: f64,
    pub max_drawdown: f64,
    pub total_fees: f64,
}

impl PortfolioStatistics {
    /// Compute statistics from a value series.
    ///
    /// Returns `None` for fewer than two points or a non-positive start value.
    #[must_use]
    pub fn compute(values: &[f64], risk_free_rate: f64) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let start_value = values[0];
        let end_value = *values.last()?;
        if start_value <= 0.0 {
            return None;
        }

        let days = values.len() - 1;
        let years = days as f64 / TRADING_DAYS_PER_YEAR;
        let cagr = (end_value / start_value).powf(1.0 / years) - 1.0;

        let returns = daily_returns(values);
        let daily_std_dev = sample_std_dev(&returns).unwrap_or(f64::NAN);
        let annual_std_dev = daily_std_dev * TRADING_DAYS_PER_YEAR.sqrt();
        let sharpe_ratio = if annual_std_dev != 0.0 && annual_std_dev.is_finite() {
            (cagr - risk_free_rate) / annual_std_dev
        } else {
            f64::NAN
        };

        Some(Self {
            start_value,
            end_value,
            days,
            total_return_pct: (end_value - start_value) / start_value * 100.0,
            cagr,
            daily_std_dev,
            annual_std_dev,
            sharpe_ratio,
            max_value: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min_value: values.iter().copied().fold(f64::INFINITY, f64::min),
            max_drawdown: max_drawdown(values),
            total_fees: 0.0,
        })
    }

    /// Statistics of a run, including the fees paid across its rebalancing history
    #[must_use]
    pub fn from_result(result: &SimulationResult, risk_free_rate: f64) -> Option<Self> {
        let mut stats = Self::compute(&result.values, risk_free_rate)?;
        stats.total_fees = result.total_fees();
        Some(stats)
    }
}
