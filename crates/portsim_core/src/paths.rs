//! Price path generation
//!
//! Two modes drive a [`PriceProcess`] across the horizon:
//!
//! - per-portfolio: [`GeneratedPrices`] advances each asset of the simulated
//!   portfolio one day at a time, appending to its price history
//! - shared: [`SharedPrices::generate`] produces the full price sequence of
//!   every asset up front, so portfolios with the same asset universe replay
//!   identical prices through [`ReplayedPrices`]

use std::collections::BTreeSet;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::{Result, SimulationError};
use crate::model::{Asset, ClassReturns, IndexLinked, PriceModel, PriceProcess, UniformShock};

fn ensure_finite(price: f64, asset: &str, day: usize) -> Result<f64> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(SimulationError::NonFinitePrice {
            asset: asset.to_string(),
            day,
        })
    }
}

/// Source of the prices of day `day` for every asset of a portfolio
pub(crate) trait PriceSource {
    fn advance(&mut self, assets: &mut [Asset], day: usize) -> Result<()>;
}

/// Per-portfolio generation from a price process
pub(crate) struct GeneratedPrices<'r, P, R: ?Sized> {
    process: P,
    rng: &'r mut R,
}

impl<'r, P: PriceProcess, R: Rng + ?Sized> GeneratedPrices<'r, P, R> {
    pub(crate) fn new(process: P, rng: &'r mut R) -> Self {
        Self { process, rng }
    }
}

impl<P: PriceProcess, R: Rng + ?Sized> PriceSource for GeneratedPrices<'_, P, R> {
    fn advance(&mut self, assets: &mut [Asset], day: usize) -> Result<()> {
        self.process.begin_day(&mut *self.rng);
        for (i, asset) in assets.iter_mut().enumerate() {
            let previous = asset.current_price();
            let next = self.process.next_price(i, previous, &mut *self.rng);
            asset.prices.push(ensure_finite(next, &asset.name, day)?);
        }
        Ok(())
    }
}

/// Replay of a shared price path
pub(crate) struct ReplayedPrices<'a> {
    shared: &'a SharedPrices,
}

impl<'a> ReplayedPrices<'a> {
    pub(crate) fn new(shared: &'a SharedPrices) -> Self {
        Self { shared }
    }
}

impl PriceSource for ReplayedPrices<'_> {
    fn advance(&mut self, assets: &mut [Asset], day: usize) -> Result<()> {
        for asset in assets.iter_mut() {
            let price = self
                .shared
                .price(&asset.name, day)
                .ok_or_else(|| self.shared.mismatch_for(asset))?;
            asset.prices.push(price);
        }
        Ok(())
    }
}

/// Complete price sequences for one asset universe, immutable once generated
#[derive(Debug, Clone, PartialEq)]
pub struct SharedPrices {
    horizon: usize,
    model: PriceModel,
    series: FxHashMap<String, Vec<f64>>,
}

impl SharedPrices {
    /// Generate `horizon` days of prices for `assets` with `model`.
    ///
    /// Each sequence starts with the asset's initial price and has
    /// `horizon + 1` entries.
    pub fn generate<R: Rng + ?Sized>(
        assets: &[Asset],
        horizon: usize,
        model: &PriceModel,
        rng: &mut R,
    ) -> Result<Self> {
        let series = match *model {
            PriceModel::RandomUniform { daily_volatility } => {
                generate_series(assets, horizon, UniformShock::new(daily_volatility)?, rng)?
            }
            PriceModel::TypeBased => {
                generate_series(assets, horizon, ClassReturns::new(assets)?, rng)?
            }
            PriceModel::Correlated { daily_volatility } => generate_series(
                assets,
                horizon,
                IndexLinked::new(assets, daily_volatility)?,
                rng,
            )?,
        };

        Ok(Self {
            horizon,
            model: *model,
            series,
        })
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub fn model(&self) -> &PriceModel {
        &self.model
    }

    /// Full price sequence of an asset, index = day
    #[must_use]
    pub fn prices(&self, asset: &str) -> Option<&[f64]> {
        self.series.get(asset).map(Vec::as_slice)
    }

    #[must_use]
    pub fn price(&self, asset: &str, day: usize) -> Option<f64> {
        self.series.get(asset).and_then(|s| s.get(day)).copied()
    }

    #[must_use]
    pub fn asset_names(&self) -> BTreeSet<String> {
        self.series.keys().cloned().collect()
    }

    /// Check that `assets` names exactly the universe these prices were generated for
    pub fn check_universe<'a>(&self, assets: impl IntoIterator<Item = &'a Asset>) -> Result<()> {
        let names: BTreeSet<String> = assets.into_iter().map(|a| a.name.clone()).collect();
        let expected = self.asset_names();
        if names == expected {
            return Ok(());
        }
        Err(SimulationError::UniverseMismatch {
            missing: expected.difference(&names).cloned().collect(),
            unexpected: names.difference(&expected).cloned().collect(),
        })
    }

    fn mismatch_for(&self, asset: &Asset) -> SimulationError {
        SimulationError::UniverseMismatch {
            missing: BTreeSet::new(),
            unexpected: BTreeSet::from([asset.name.clone()]),
        }
    }
}

fn generate_series<P: PriceProcess, R: Rng + ?Sized>(
    assets: &[Asset],
    horizon: usize,
    mut process: P,
    rng: &mut R,
) -> Result<FxHashMap<String, Vec<f64>>> {
    let mut paths: Vec<Vec<f64>> = assets
        .iter()
        .map(|a| {
            let mut path = Vec::with_capacity(horizon + 1);
            path.push(a.initial_price);
            path
        })
        .collect();

    for day in 1..=horizon {
        process.begin_day(rng);
        for (i, (asset, path)) in assets.iter().zip(paths.iter_mut()).enumerate() {
            let previous = path[day - 1];
            let next = process.next_price(i, previous, rng);
            path.push(ensure_finite(next, &asset.name, day)?);
        }
    }

    Ok(assets
        .iter()
        .map(|a| a.name.clone())
        .zip(paths)
        .collect())
}
