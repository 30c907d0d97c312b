//! Portfolio simulation library
//!
//! This crate simulates the day-by-day evolution of investment portfolios
//! under stochastic price models. It supports:
//! - Three price models (uniform random shocks, asset-class returns, index-correlated)
//! - Per-portfolio price generation or one shared price path across portfolios
//! - Periodic, deviation-triggered and combined rebalancing with proportional fees
//! - Post-run statistics and chart-ready analysis series
//!
//! # Builder DSL
//!
//! ```ignore
//! use portsim_core::config::{AssetBuilder, PortfolioBuilder, SimulationConfig};
//! use portsim_core::rebalance::RebalancePolicy;
//! use portsim_core::simulation::simulate;
//! use rand::SeedableRng;
//!
//! let mut portfolio = PortfolioBuilder::new("balanced")
//!     .asset(AssetBuilder::equity("World").price(100.0).weight(0.6))
//!     .asset(AssetBuilder::bond("Bonds").price(50.0).weight(0.4))
//!     .allocate(100_000.0)
//!     .build()?;
//!
//! let config = SimulationConfig::default()
//!     .with_horizon(252)
//!     .with_policy(RebalancePolicy::Periodic { period: 63 });
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//! let result = simulate(&mut portfolio, &config, &mut rng)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod paths;
pub mod rebalance;
pub mod simulation;
pub mod simulation_state;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{AnalysisConfig, AssetBuilder, PortfolioBuilder, SimulationConfig};
pub use error::{ModelError, PortfolioError, SimulationError};
pub use paths::SharedPrices;
pub use rebalance::RebalancePolicy;
pub use simulation::{RunOutcome, run_portfolios, simulate, simulate_with_shared_prices};
