use crate::model::{Portfolio, PriceSourceKind, RebalanceRecord, SimulationResult};

/// Runtime state of one portfolio run.
///
/// Asset prices and quantities live on the portfolio itself; this tracks the
/// day counter and the portfolio-level series built along the way.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub day: usize,
    pub values: Vec<f64>,
    pub rebalancing: Vec<RebalanceRecord>,
}

impl SimulationState {
    /// Day-0 state: the value series holds the allocated value, history is empty
    #[must_use]
    pub fn start(portfolio: &Portfolio, horizon: usize) -> Self {
        let mut values = Vec::with_capacity(horizon + 1);
        values.push(portfolio.total_value());
        Self {
            day: 0,
            values,
            rebalancing: Vec::new(),
        }
    }

    pub fn record_value(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn record_rebalance(&mut self, record: RebalanceRecord) {
        self.rebalancing.push(record);
    }

    #[must_use]
    pub fn finish(self, portfolio: &Portfolio, price_source: PriceSourceKind) -> SimulationResult {
        SimulationResult {
            portfolio: portfolio.name().to_string(),
            values: self.values,
            rebalancing: self.rebalancing,
            price_source,
        }
    }
}
