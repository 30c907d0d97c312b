//! Untyped view of the YAML configuration file.
//!
//! Every key is optional and read as a bare scalar. A value of any other
//! shape is kept as `Invalid`, so one bad value only resets that key to its
//! default.

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Any YAML scalar
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// A sequence, mapping or other non-scalar value
    Invalid(IgnoredAny),
}

impl RawValue {
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::Bool(_) | RawValue::Invalid(_) => None,
        }
    }

    pub(crate) fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            RawValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            RawValue::Number(n) if *n == 1.0 => Some(true),
            RawValue::Number(n) if *n == 0.0 => Some(false),
            RawValue::Number(_) | RawValue::Invalid(_) => None,
        }
    }

    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s.trim()),
            _ => None,
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => write!(f, "{s:?}"),
            RawValue::Invalid(_) => f.write_str("of unsupported type"),
        }
    }
}

/// A single path or a list of paths
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum PathList {
    One(String),
    Many(Vec<String>),
    /// Anything but a string or a list of strings
    Invalid(IgnoredAny),
}

impl PathList {
    /// The listed paths, `None` for a value of the wrong shape
    pub(crate) fn into_vec(self) -> Option<Vec<String>> {
        match self {
            PathList::One(path) => Some(vec![path]),
            PathList::Many(paths) => Some(paths),
            PathList::Invalid(_) => None,
        }
    }
}

/// Configuration file as written. Czech key names are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawConfig {
    #[serde(alias = "pocatecni_hodnota")]
    pub initial_value: Option<RawValue>,
    #[serde(alias = "pocet_dni")]
    pub horizon_days: Option<RawValue>,
    #[serde(alias = "denni_volatilita")]
    pub daily_volatility: Option<RawValue>,
    #[serde(alias = "transakcni_poplatek")]
    pub fee_rate: Option<RawValue>,
    #[serde(alias = "rebalancovaci_perioda")]
    pub rebalance_period: Option<RawValue>,
    #[serde(alias = "zpusob_rebalancovani")]
    pub rebalance_policy: Option<RawValue>,
    #[serde(alias = "tolerance_vahy")]
    pub weight_tolerance: Option<RawValue>,
    #[serde(alias = "inflacni_sazba")]
    pub inflation_rate: Option<RawValue>,
    #[serde(alias = "model")]
    pub price_model: Option<RawValue>,
    #[serde(alias = "sdilena_simulace")]
    pub shared_prices: Option<RawValue>,
    #[serde(alias = "bezrizikova_sazba")]
    pub risk_free_rate: Option<RawValue>,
    #[serde(alias = "okno_volatility")]
    pub rolling_window: Option<RawValue>,
    pub seed: Option<RawValue>,
    #[serde(alias = "portfolia")]
    pub portfolios: Option<PathList>,
    #[serde(alias = "vystupy")]
    pub output_dir: Option<RawValue>,
}
