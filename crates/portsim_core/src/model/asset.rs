//! Assets and their day-indexed simulation state

use serde::{Deserialize, Serialize};

/// Correlation with the reference index used when none was specified
pub const DEFAULT_CORRELATION: f64 = 0.5;

/// Asset class, selects the parameters of the type-based price model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Equity,
    Bond,
    Gold,
    Cash,
    /// Unrecognized class name, priced like equity
    Other(String),
}

impl AssetClass {
    /// Parse a class name. English and Czech names are both recognized.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "equity" | "stock" | "akcie" => AssetClass::Equity,
            "bond" | "dluhopis" => AssetClass::Bond,
            "gold" | "zlato" => AssetClass::Gold,
            "cash" | "hotovost" => AssetClass::Cash,
            _ => AssetClass::Other(trimmed.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            AssetClass::Equity => "equity",
            AssetClass::Bond => "bond",
            AssetClass::Gold => "gold",
            AssetClass::Cash => "cash",
            AssetClass::Other(name) => name,
        }
    }
}

/// One holding of a portfolio.
///
/// The static fields describe the asset; the price, quantity and their
/// histories are owned simulation state, mutated only through the owning
/// [`Portfolio`](crate::model::Portfolio).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub class: AssetClass,
    pub initial_price: f64,
    pub target_weight: f64,
    /// Correlation with the reference index, only read by the correlated model
    pub correlation: Option<f64>,

    pub(crate) quantity: f64,
    pub(crate) prices: Vec<f64>,
    pub(crate) quantity_history: Vec<f64>,
}

impl Asset {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        class: AssetClass,
        initial_price: f64,
        target_weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            initial_price,
            target_weight,
            correlation: None,
            quantity: 0.0,
            prices: Vec::new(),
            quantity_history: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_correlation(mut self, correlation: f64) -> Self {
        self.correlation = Some(correlation);
        self
    }

    #[must_use]
    pub fn correlation_or_default(&self) -> f64 {
        self.correlation.unwrap_or(DEFAULT_CORRELATION)
    }

    /// Units currently held
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Realized prices, index = day
    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Units held at the end of each day, index = day
    #[must_use]
    pub fn quantity_history(&self) -> &[f64] {
        &self.quantity_history
    }

    /// Latest realized price, the initial price before any simulation
    #[must_use]
    pub fn current_price(&self) -> f64 {
        self.prices.last().copied().unwrap_or(self.initial_price)
    }

    /// Value of the position at the latest price. Non-positive prices count as zero.
    #[must_use]
    pub fn market_value(&self) -> f64 {
        let price = self.current_price();
        if price > 0.0 {
            self.quantity * price
        } else {
            0.0
        }
    }

    /// Back-fill the quantity history with the current quantity up to and including `day`
    pub(crate) fn record_quantity_through(&mut self, day: usize) {
        while self.quantity_history.len() <= day {
            self.quantity_history.push(self.quantity);
        }
    }
}
