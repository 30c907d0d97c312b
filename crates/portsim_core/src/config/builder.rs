//! Portfolio Builder
//!
//! # Example
//!
//! ```ignore
//! use portsim_core::config::{AssetBuilder, PortfolioBuilder};
//!
//! let portfolio = PortfolioBuilder::new("conservative")
//!     .asset(AssetBuilder::equity("World").price(100.0).weight(0.3))
//!     .asset(AssetBuilder::bond("Bonds").price(50.0).weight(0.6))
//!     .asset(AssetBuilder::cash("Cash").weight(0.1))
//!     .allocate(100_000.0)
//!     .build()?;
//! ```

use super::asset_builder::AssetBuilder;
use crate::error::PortfolioError;
use crate::model::Portfolio;

/// Builder that validates the portfolio and optionally allocates it
#[derive(Debug, Clone)]
pub struct PortfolioBuilder {
    name: String,
    assets: Vec<AssetBuilder>,
    initial_value: Option<f64>,
}

impl PortfolioBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assets: Vec::new(),
            initial_value: None,
        }
    }

    #[must_use]
    pub fn asset(mut self, asset: AssetBuilder) -> Self {
        self.assets.push(asset);
        self
    }

    /// Compute the initial allocation for `initial_value` after validation
    #[must_use]
    pub fn allocate(mut self, initial_value: f64) -> Self {
        self.initial_value = Some(initial_value);
        self
    }

    pub fn build(self) -> Result<Portfolio, PortfolioError> {
        let assets = self.assets.into_iter().map(AssetBuilder::build).collect();
        let mut portfolio = Portfolio::new(self.name, assets)?;
        if let Some(value) = self.initial_value {
            portfolio.allocate_initial(value);
        }
        Ok(portfolio)
    }
}
