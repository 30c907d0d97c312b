//! Post-run analysis of simulated portfolios.
//!
//! Everything here is computed from a finished run and never feeds back into
//! the simulation:
//!
//! - [`PortfolioStatistics`] summarizes a value series (returns, CAGR,
//!   volatility, Sharpe ratio, drawdown) together with the fees paid
//! - the series functions produce chart-ready data: drawdown, daily returns,
//!   inflation-adjusted value, rolling volatility, actual weights per day and
//!   the correlation matrix of asset returns
//!
//! ```ignore
//! use portsim_core::analysis::{PortfolioStatistics, drawdown_pct};
//!
//! let stats = PortfolioStatistics::from_result(&result, 0.01).unwrap();
//! println!("CAGR {:.2} %", stats.cagr * 100.0);
//! let drawdown = drawdown_pct(&result.values);
//! ```

mod metrics;
mod series;

pub use metrics::*;
pub use series::*;
