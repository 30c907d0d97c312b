mod asset;
mod market;
mod portfolio;
mod records;
mod results;

pub use asset::{Asset, AssetClass, DEFAULT_CORRELATION};
pub use market::{
    AnnualParameters, ClassReturns, INDEX_START_LEVEL, IndexLinked, PriceModel, PriceProcess,
    ReferenceIndex, TRADING_DAYS_PER_YEAR, UniformShock, daily_return, daily_volatility,
};
pub use portfolio::{Portfolio, WEIGHT_SUM_TOLERANCE};
pub use records::{RebalanceRecord, TradeEntry, total_fees};
pub use results::{PriceSourceKind, SimulationResult};
