//! Simulation configuration
//!
//! [`SimulationConfig`] holds every parameter the engine reads during a run.
//! [`AnalysisConfig`] holds the parameters of the statistics computed from the
//! finished series.
//!
//! # Builder DSL
//!
//! Portfolios can be assembled with a fluent API instead of a loader:
//!
//! ```ignore
//! use portsim_core::config::{AssetBuilder, PortfolioBuilder};
//!
//! let portfolio = PortfolioBuilder::new("balanced")
//!     .asset(AssetBuilder::equity("World").price(100.0).weight(0.6))
//!     .asset(AssetBuilder::bond("Treasuries").price(50.0).weight(0.4))
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::model::PriceModel;
use crate::rebalance::RebalancePolicy;

pub mod asset_builder;
pub mod builder;

pub use asset_builder::AssetBuilder;
pub use builder::PortfolioBuilder;

pub const DEFAULT_INITIAL_VALUE: f64 = 100_000.0;
pub const DEFAULT_HORIZON_DAYS: usize = 1000;
pub const DEFAULT_DAILY_VOLATILITY: f64 = 0.02;
pub const DEFAULT_FEE_RATE: f64 = 0.005;
pub const DEFAULT_REBALANCE_PERIOD: usize = 90;
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.05;
pub const DEFAULT_INFLATION_RATE: f64 = 0.02;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;
pub const DEFAULT_ROLLING_WINDOW: usize = 63;

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total value allocated on day 0
    pub initial_value: f64,
    /// Number of simulated days after day 0
    pub horizon_days: usize,
    /// Fraction of the traded notional charged as fee
    pub fee_rate: f64,
    pub policy: RebalancePolicy,
    pub price_model: PriceModel,
    /// Reuse one generated price path across portfolios with identical assets
    pub shared_prices: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_value: DEFAULT_INITIAL_VALUE,
            horizon_days: DEFAULT_HORIZON_DAYS,
            fee_rate: DEFAULT_FEE_RATE,
            policy: RebalancePolicy::Periodic {
                period: DEFAULT_REBALANCE_PERIOD,
            },
            price_model: PriceModel::TypeBased,
            shared_prices: true,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn with_horizon(mut self, days: usize) -> Self {
        self.horizon_days = days;
        self
    }

    #[must_use]
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    #[must_use]
    pub fn with_fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RebalancePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_price_model(mut self, model: PriceModel) -> Self {
        self.price_model = model;
        self
    }

    #[must_use]
    pub fn with_shared_prices(mut self, shared: bool) -> Self {
        self.shared_prices = shared;
        self
    }
}

/// Parameters of the statistics derived from a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Annual inflation used for the real-value series
    pub inflation_rate: f64,
    /// Annual risk-free rate subtracted in the Sharpe ratio
    pub risk_free_rate: f64,
    /// Window of the rolling volatility, in days
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            inflation_rate: DEFAULT_INFLATION_RATE,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}
