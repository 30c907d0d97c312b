//! Asset Builder DSL
//!
//! # Examples
//!
//! ```ignore
//! use portsim_core::config::AssetBuilder;
//!
//! let world = AssetBuilder::equity("World").price(100.0).weight(0.6);
//! let gold = AssetBuilder::gold("Gold").price(1800.0).weight(0.1).correlation(0.2);
//! ```

use crate::model::{Asset, AssetClass};

/// Builder for one portfolio asset
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    pub(crate) name: String,
    pub(crate) class: AssetClass,
    pub(crate) initial_price: f64,
    pub(crate) weight: f64,
    pub(crate) correlation: Option<f64>,
}

impl AssetBuilder {
    /// Create a builder for an asset of the given class
    #[must_use]
    pub fn new(name: impl Into<String>, class: AssetClass) -> Self {
        Self {
            name: name.into(),
            class,
            initial_price: 1.0, // 1 unit = 1 currency unit
            weight: 0.0,
            correlation: None,
        }
    }

    // =========================================================================
    // Class Presets
    // =========================================================================

    #[must_use]
    pub fn equity(name: impl Into<String>) -> Self {
        Self::new(name, AssetClass::Equity)
    }

    #[must_use]
    pub fn bond(name: impl Into<String>) -> Self {
        Self::new(name, AssetClass::Bond)
    }

    #[must_use]
    pub fn gold(name: impl Into<String>) -> Self {
        Self::new(name, AssetClass::Gold)
    }

    #[must_use]
    pub fn cash(name: impl Into<String>) -> Self {
        Self::new(name, AssetClass::Cash)
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the price on day 0
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.initial_price = price;
        self
    }

    /// Set the target weight
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the correlation with the reference index (correlated model only)
    #[must_use]
    pub fn correlation(mut self, correlation: f64) -> Self {
        self.correlation = Some(correlation);
        self
    }

    #[must_use]
    pub fn build(self) -> Asset {
        let asset = Asset::new(self.name, self.class, self.initial_price, self.weight);
        match self.correlation {
            Some(c) => asset.with_correlation(c),
            None => asset,
        }
    }
}
