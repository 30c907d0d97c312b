use std::collections::BTreeSet;
use std::fmt;

/// Errors raised while constructing a portfolio
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioError {
    Empty,
    DuplicateAsset(String),
    InvalidPrice { asset: String, price: f64 },
    InvalidWeight { asset: String, weight: f64 },
    InvalidCorrelation { asset: String, correlation: f64 },
    /// Target weights do not sum to 1.0 within tolerance
    WeightSum { sum: f64 },
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::Empty => write!(f, "portfolio contains no assets"),
            PortfolioError::DuplicateAsset(name) => write!(f, "asset {name:?} is listed twice"),
            PortfolioError::InvalidPrice { asset, price } => {
                write!(f, "asset {asset:?} has invalid initial price {price}")
            }
            PortfolioError::InvalidWeight { asset, weight } => {
                write!(f, "asset {asset:?} has invalid weight {weight}")
            }
            PortfolioError::InvalidCorrelation { asset, correlation } => write!(
                f,
                "asset {asset:?} has correlation {correlation} outside [0, 1]"
            ),
            PortfolioError::WeightSum { sum } => {
                write!(f, "target weights sum to {sum:.4}, expected 1.0")
            }
        }
    }
}

impl std::error::Error for PortfolioError {}

/// Errors related to price model parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidVolatility {
        model: &'static str,
        volatility: f64,
    },
    InvalidDistributionParameters {
        asset: String,
        mean: f64,
        std_dev: f64,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidVolatility { model, volatility } => write!(
                f,
                "invalid daily volatility {volatility} for {model} model: must be finite and non-negative"
            ),
            ModelError::InvalidDistributionParameters {
                asset,
                mean,
                std_dev,
            } => write!(
                f,
                "invalid normal parameters for asset {asset:?} (mean={mean}, std_dev={std_dev})"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors that end a single portfolio simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Model(ModelError),
    /// The price model produced NaN or infinity
    NonFinitePrice { asset: String, day: usize },
    /// Shared prices were requested for a portfolio with a different asset universe
    UniverseMismatch {
        missing: BTreeSet<String>,
        unexpected: BTreeSet<String>,
    },
    /// Simulation started before the initial allocation was computed
    NotAllocated,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Model(e) => write!(f, "{e}"),
            SimulationError::NonFinitePrice { asset, day } => {
                write!(f, "price of {asset:?} became non-finite on day {day}")
            }
            SimulationError::UniverseMismatch {
                missing,
                unexpected,
            } => write!(
                f,
                "asset universe differs from shared prices (missing: {missing:?}, unexpected: {unexpected:?})"
            ),
            SimulationError::NotAllocated => {
                write!(f, "portfolio has no initial allocation")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for SimulationError {
    fn from(err: ModelError) -> Self {
        SimulationError::Model(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
