//! Portfolio construction, validation and initial allocation

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::asset::Asset;
use crate::error::PortfolioError;

/// Allowed distance of the target weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// An ordered collection of assets together with their target weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    name: String,
    assets: Vec<Asset>,
    allocated: bool,
}

impl Portfolio {
    /// Validate and build a portfolio.
    ///
    /// Fails when the portfolio is empty, names repeat, a price is not a
    /// positive finite number, a weight or correlation is out of range, or
    /// the target weights do not sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
    pub fn new(name: impl Into<String>, assets: Vec<Asset>) -> Result<Self, PortfolioError> {
        if assets.is_empty() {
            return Err(PortfolioError::Empty);
        }

        let mut seen = FxHashSet::default();
        for asset in &assets {
            if !seen.insert(asset.name.as_str()) {
                return Err(PortfolioError::DuplicateAsset(asset.name.clone()));
            }
            if !asset.initial_price.is_finite() || asset.initial_price <= 0.0 {
                return Err(PortfolioError::InvalidPrice {
                    asset: asset.name.clone(),
                    price: asset.initial_price,
                });
            }
            if !asset.target_weight.is_finite() || asset.target_weight < 0.0 {
                return Err(PortfolioError::InvalidWeight {
                    asset: asset.name.clone(),
                    weight: asset.target_weight,
                });
            }
            if let Some(correlation) = asset.correlation
                && !(0.0..=1.0).contains(&correlation)
            {
                return Err(PortfolioError::InvalidCorrelation {
                    asset: asset.name.clone(),
                    correlation,
                });
            }
        }

        let sum: f64 = assets.iter().map(|a| a.target_weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PortfolioError::WeightSum { sum });
        }

        Ok(Self {
            name: name.into(),
            assets,
            allocated: false,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub(crate) fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    #[must_use]
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Target weight per asset name
    #[must_use]
    pub fn target_weights(&self) -> FxHashMap<&str, f64> {
        self.assets
            .iter()
            .map(|a| (a.name.as_str(), a.target_weight))
            .collect()
    }

    #[must_use]
    pub fn asset_names(&self) -> BTreeSet<String> {
        self.assets.iter().map(|a| a.name.clone()).collect()
    }

    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Number of days simulated after day 0
    #[must_use]
    pub fn days_simulated(&self) -> usize {
        self.assets
            .first()
            .map_or(0, |a| a.prices.len().saturating_sub(1))
    }

    /// Total value at the latest prices
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.assets.iter().map(Asset::market_value).sum()
    }

    /// Compute starting quantities for `initial_value`.
    ///
    /// Every asset but the last receives `(weight / sum of weights) * initial_value`
    /// worth of units; the last asset absorbs the residual so the allocated
    /// notional adds up to `initial_value` exactly. Resets all simulation state
    /// to day 0.
    pub fn allocate_initial(&mut self, initial_value: f64) {
        let weight_sum: f64 = self.assets.iter().map(|a| a.target_weight).sum();
        let last = self.assets.len() - 1;
        let mut allocated = 0.0;

        for (i, asset) in self.assets.iter_mut().enumerate() {
            let notional = if i == last {
                initial_value - allocated
            } else {
                let share = if weight_sum > 0.0 {
                    asset.target_weight / weight_sum
                } else {
                    0.0
                };
                let notional = share * initial_value;
                allocated += notional;
                notional
            };

            asset.quantity = notional / asset.initial_price;
            asset.prices = vec![asset.initial_price];
            asset.quantity_history = vec![asset.quantity];
        }

        self.allocated = true;
    }

    /// Rewind prices and quantities to the day-0 allocation
    pub(crate) fn reset_to_day_zero(&mut self) {
        for asset in &mut self.assets {
            asset.prices.truncate(1);
            if asset.prices.is_empty() {
                asset.prices.push(asset.initial_price);
            }
            asset.quantity_history.truncate(1);
            if let Some(&initial_quantity) = asset.quantity_history.first() {
                asset.quantity = initial_quantity;
            }
        }
    }

    /// Make every quantity history contiguous through `day`
    pub(crate) fn record_quantities_through(&mut self, day: usize) {
        for asset in &mut self.assets {
            asset.record_quantity_through(day);
        }
    }
}
