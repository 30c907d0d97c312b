//! Integration tests for the portsim simulation engine
//!
//! Tests are organized by topic:
//! - `price_models` - Random-uniform, type-based and correlated price steps
//! - `allocation` - Portfolio validation and initial allocation
//! - `rebalancing` - Trigger policies, trade execution and fees
//! - `simulation` - The daily loop and its outputs
//! - `shared_paths` - Shared price generation and multi-portfolio runs
//! - `analysis` - Statistics and chart series of finished runs

mod allocation;
mod price_models;
mod shared_paths;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{AssetBuilder, PortfolioBuilder};
use crate::model::Portfolio;

fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// 60/30/10 equity/bond/gold portfolio allocated with 100 000
fn balanced(name: &str) -> Portfolio {
    PortfolioBuilder::new(name)
        .asset(AssetBuilder::equity("World").price(100.0).weight(0.6))
        .asset(AssetBuilder::bond("Bonds").price(50.0).weight(0.3))
        .asset(AssetBuilder::gold("Gold").price(1_800.0).weight(0.1))
        .allocate(100_000.0)
        .build()
        .unwrap()
}
