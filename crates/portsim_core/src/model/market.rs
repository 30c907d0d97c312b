//! Stochastic price models
//!
//! Three interchangeable models advance an asset's price by one trading day:
//!
//! - [`PriceModel::RandomUniform`]: `next = prev * (1 + U(-v, v))`, no drift
//! - [`PriceModel::TypeBased`]: normal daily change whose mean and standard
//!   deviation are derived from the asset class' annual figures
//! - [`PriceModel::Correlated`]: a convex blend of a synthetic reference index
//!   return and an idiosyncratic uniform shock
//!
//! A model is resolved once per run into a concrete [`PriceProcess`], so the
//! daily loop never re-dispatches on the model tag.

use rand::Rng;
use rand::distr::{Distribution, Uniform};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{Asset, AssetClass};

/// Trading days in a simulated year, used by every (de)annualization
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Starting level of the synthetic reference index
pub const INDEX_START_LEVEL: f64 = 100.0;

/// Convert an annual return to the equivalent compounded daily return
#[must_use]
#[inline]
pub fn daily_return(annual_return: f64) -> f64 {
    (1.0 + annual_return).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0
}

/// Convert an annual volatility to daily volatility
#[must_use]
#[inline]
pub fn daily_volatility(annual_volatility: f64) -> f64 {
    annual_volatility / TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annual expected return and volatility of an asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualParameters {
    pub expected_return: f64,
    pub volatility: f64,
}

impl AnnualParameters {
    pub const EQUITY: AnnualParameters = AnnualParameters {
        expected_return: 0.08,
        volatility: 0.15,
    };
    pub const BOND: AnnualParameters = AnnualParameters {
        expected_return: 0.03,
        volatility: 0.06,
    };
    pub const GOLD: AnnualParameters = AnnualParameters {
        expected_return: 0.035,
        volatility: 0.08,
    };
    pub const CASH: AnnualParameters = AnnualParameters {
        expected_return: 0.01,
        volatility: 0.0,
    };

    /// Lookup table of the type-based model. Unknown classes use equity figures.
    #[must_use]
    pub fn for_class(class: &AssetClass) -> Self {
        match class {
            AssetClass::Equity | AssetClass::Other(_) => Self::EQUITY,
            AssetClass::Bond => Self::BOND,
            AssetClass::Gold => Self::GOLD,
            AssetClass::Cash => Self::CASH,
        }
    }

    /// Daily (mean, standard deviation) of the price change
    #[must_use]
    pub fn daily(&self) -> (f64, f64) {
        (
            daily_return(self.expected_return),
            daily_volatility(self.volatility),
        )
    }
}

/// Price model selected for a run, with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum PriceModel {
    RandomUniform {
        daily_volatility: f64,
    },
    #[default]
    TypeBased,
    Correlated {
        daily_volatility: f64,
    },
}

impl PriceModel {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PriceModel::RandomUniform { .. } => "random",
            PriceModel::TypeBased => "type-based",
            PriceModel::Correlated { .. } => "correlated",
        }
    }
}

/// One-day price step, evaluated for every asset of a universe in order.
///
/// Implementations only read their own parameters and the previous price;
/// the only shared mutation is in [`PriceProcess::begin_day`], performed once
/// before any asset is priced that day.
pub trait PriceProcess {
    fn begin_day<R: Rng + ?Sized>(&mut self, _rng: &mut R) {}

    /// Next price of the asset at position `index` of the universe
    fn next_price<R: Rng + ?Sized>(&self, index: usize, previous: f64, rng: &mut R) -> f64;
}

fn symmetric_shock(model: &'static str, volatility: f64) -> Result<Uniform<f64>, ModelError> {
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(ModelError::InvalidVolatility { model, volatility });
    }
    Uniform::new_inclusive(-volatility, volatility)
        .map_err(|_| ModelError::InvalidVolatility { model, volatility })
}

/// Random-uniform model
#[derive(Debug, Clone)]
pub struct UniformShock {
    shock: Uniform<f64>,
}

impl UniformShock {
    pub fn new(daily_volatility: f64) -> Result<Self, ModelError> {
        Ok(Self {
            shock: symmetric_shock("random", daily_volatility)?,
        })
    }
}

impl PriceProcess for UniformShock {
    fn next_price<R: Rng + ?Sized>(&self, _index: usize, previous: f64, rng: &mut R) -> f64 {
        previous * (1.0 + self.shock.sample(rng))
    }
}

/// Type-based model with one normal distribution per asset
#[derive(Debug, Clone)]
pub struct ClassReturns {
    changes: Vec<Normal<f64>>,
}

impl ClassReturns {
    pub fn new(assets: &[Asset]) -> Result<Self, ModelError> {
        let changes = assets
            .iter()
            .map(|asset| {
                let (mean, std_dev) = AnnualParameters::for_class(&asset.class).daily();
                Normal::new(mean, std_dev).map_err(|_| ModelError::InvalidDistributionParameters {
                    asset: asset.name.clone(),
                    mean,
                    std_dev,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { changes })
    }
}

impl PriceProcess for ClassReturns {
    fn next_price<R: Rng + ?Sized>(&self, index: usize, previous: f64, rng: &mut R) -> f64 {
        previous * (1.0 + self.changes[index].sample(rng))
    }
}

/// Synthetic reference index, advanced once per day by a uniform shock.
///
/// Lives for one path-generation call only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceIndex {
    level: f64,
}

impl Default for ReferenceIndex {
    fn default() -> Self {
        Self {
            level: INDEX_START_LEVEL,
        }
    }
}

impl ReferenceIndex {
    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Apply one day's change and return the realized index return
    pub fn advance(&mut self, change: f64) -> f64 {
        let previous = self.level;
        self.level = previous * (1.0 + change);
        if previous != 0.0 {
            (self.level - previous) / previous
        } else {
            0.0
        }
    }
}

/// Correlated model: `change = rho * index_return + (1 - rho) * U(-v, v)`
#[derive(Debug, Clone)]
pub struct IndexLinked {
    shock: Uniform<f64>,
    correlations: Vec<f64>,
    index: ReferenceIndex,
    index_return: f64,
}

impl IndexLinked {
    pub fn new(assets: &[Asset], daily_volatility: f64) -> Result<Self, ModelError> {
        Ok(Self {
            shock: symmetric_shock("correlated", daily_volatility)?,
            correlations: assets.iter().map(Asset::correlation_or_default).collect(),
            index: ReferenceIndex::default(),
            index_return: 0.0,
        })
    }

    #[must_use]
    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    #[must_use]
    pub fn index_return(&self) -> f64 {
        self.index_return
    }
}

impl PriceProcess for IndexLinked {
    fn begin_day<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let change = self.shock.sample(rng);
        self.index_return = self.index.advance(change);
    }

    fn next_price<R: Rng + ?Sized>(&self, index: usize, previous: f64, rng: &mut R) -> f64 {
        let rho = self.correlations[index];
        let idiosyncratic = self.shock.sample(rng);
        let change = rho * self.index_return + (1.0 - rho) * idiosyncratic;
        previous * (1.0 + change)
    }
}
