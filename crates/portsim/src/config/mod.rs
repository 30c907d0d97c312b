//! Run configuration
//!
//! The configuration file is YAML. Unknown keys are ignored; a missing file,
//! an unparsable file or an invalid value never fails the run. Every problem
//! is reported as a [`ConfigError`] and the affected key keeps its default.
//!
//! ```yaml
//! initial_value: 100000
//! horizon_days: 1000
//! price_model: correlated
//! daily_volatility: 0.02
//! rebalance_policy: combined
//! rebalance_period: 90
//! weight_tolerance: 0.05
//! portfolios:
//!   - portfolio_conservative.csv
//!   - portfolio_risky.csv
//! ```

mod raw;

use std::fmt;
use std::path::{Path, PathBuf};

use portsim_core::config::{
    DEFAULT_DAILY_VOLATILITY, DEFAULT_REBALANCE_PERIOD, DEFAULT_WEIGHT_TOLERANCE,
};
use portsim_core::model::PriceModel;
use portsim_core::{AnalysisConfig, RebalancePolicy, SimulationConfig};

use raw::{RawConfig, RawValue};

pub const DEFAULT_CONFIG_FILE: &str = "portsim.yaml";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
/// Largest accepted day count, period or window
pub const MAX_COUNT: usize = 1_000_000;
pub const DEFAULT_PORTFOLIOS: [&str; 2] = ["portfolio_conservative.csv", "portfolio_risky.csv"];

/// Fully resolved configuration of one run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub analysis: AnalysisConfig,
    /// Seed of the run generator, fresh entropy when `None`
    pub seed: Option<u64>,
    pub portfolios: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            analysis: AnalysisConfig::default(),
            seed: None,
            portfolios: DEFAULT_PORTFOLIOS.iter().map(PathBuf::from).collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// A configuration problem recovered by falling back to a default
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub key: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Resolved configuration plus the problems found while reading it.
///
/// Problems are returned instead of logged so the caller can report them once
/// logging is set up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub errors: Vec<ConfigError>,
}

/// Read the configuration file at `path`
pub fn load_config(path: &Path) -> LoadedConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(err) => LoadedConfig {
            config: AppConfig::default(),
            errors: vec![ConfigError::new(
                path.display().to_string(),
                format!("{err}, using defaults"),
            )],
        },
    }
}

/// Resolve configuration from YAML text
pub fn parse_config(yaml: &str) -> LoadedConfig {
    let mut errors = Vec::new();
    let raw = if yaml.trim().is_empty() {
        RawConfig::default()
    } else {
        match serde_saphyr::from_str::<RawConfig>(yaml) {
            Ok(raw) => raw,
            Err(err) => {
                errors.push(ConfigError::new(
                    "file",
                    format!("cannot parse configuration ({err}), using defaults"),
                ));
                RawConfig::default()
            }
        }
    };

    let config = Resolver {
        errors: &mut errors,
    }
    .resolve(raw);
    LoadedConfig { config, errors }
}

struct Resolver<'e> {
    errors: &'e mut Vec<ConfigError>,
}

impl Resolver<'_> {
    fn resolve(&mut self, raw: RawConfig) -> AppConfig {
        let defaults = AppConfig::default();

        let initial_value = self.number(
            "initial_value",
            raw.initial_value.as_ref(),
            defaults.simulation.initial_value,
            |v| v > 0.0,
            "must be a positive number",
        );
        let horizon_days = self.count(
            "horizon_days",
            raw.horizon_days.as_ref(),
            defaults.simulation.horizon_days,
            0,
        );
        let daily_volatility = self.number(
            "daily_volatility",
            raw.daily_volatility.as_ref(),
            DEFAULT_DAILY_VOLATILITY,
            |v| v >= 0.0,
            "must not be negative",
        );
        let fee_rate = self.number(
            "fee_rate",
            raw.fee_rate.as_ref(),
            defaults.simulation.fee_rate,
            |v| (0.0..1.0).contains(&v),
            "must be in [0, 1)",
        );
        let period = self.count(
            "rebalance_period",
            raw.rebalance_period.as_ref(),
            DEFAULT_REBALANCE_PERIOD,
            1,
        );
        let tolerance = self.number(
            "weight_tolerance",
            raw.weight_tolerance.as_ref(),
            DEFAULT_WEIGHT_TOLERANCE,
            |v| v >= 0.0,
            "must not be negative",
        );
        let policy = self.policy(raw.rebalance_policy.as_ref(), period, tolerance);
        let price_model = self.price_model(raw.price_model.as_ref(), daily_volatility);
        let shared_prices = self.flag(
            "shared_prices",
            raw.shared_prices.as_ref(),
            defaults.simulation.shared_prices,
        );

        let analysis = AnalysisConfig {
            inflation_rate: self.number(
                "inflation_rate",
                raw.inflation_rate.as_ref(),
                defaults.analysis.inflation_rate,
                |v| v > -1.0,
                "must be greater than -1",
            ),
            risk_free_rate: self.number(
                "risk_free_rate",
                raw.risk_free_rate.as_ref(),
                defaults.analysis.risk_free_rate,
                |_| true,
                "",
            ),
            rolling_window: self.count(
                "rolling_window",
                raw.rolling_window.as_ref(),
                defaults.analysis.rolling_window,
                2,
            ),
        };

        let seed = raw.seed.as_ref().and_then(|value| {
            let seed = value
                .as_f64()
                .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
                .map(|v| v as u64);
            if seed.is_none() {
                self.reject("seed", value, "must be a non-negative integer");
            }
            seed
        });

        let portfolios = match raw.portfolios.map(raw::PathList::into_vec) {
            Some(Some(paths)) if !paths.is_empty() => {
                paths.into_iter().map(PathBuf::from).collect()
            }
            Some(Some(_)) => {
                self.errors
                    .push(ConfigError::new("portfolios", "empty list, using defaults"));
                defaults.portfolios
            }
            Some(None) => {
                self.errors.push(ConfigError::new(
                    "portfolios",
                    "must be a path or a list of paths, using defaults",
                ));
                defaults.portfolios
            }
            None => defaults.portfolios,
        };

        let output_dir = match raw.output_dir.as_ref() {
            Some(value) => match value.as_text().filter(|s| !s.is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => {
                    self.reject("output_dir", value, "must be a path");
                    defaults.output_dir
                }
            },
            None => defaults.output_dir,
        };

        AppConfig {
            simulation: SimulationConfig {
                initial_value,
                horizon_days,
                fee_rate,
                policy,
                price_model,
                shared_prices,
            },
            analysis,
            seed,
            portfolios,
            output_dir,
        }
    }

    fn reject(&mut self, key: &str, value: &RawValue, reason: &str) {
        self.errors.push(ConfigError::new(
            key,
            format!("invalid value {value} ({reason}), using default"),
        ));
    }

    fn number(
        &mut self,
        key: &str,
        value: Option<&RawValue>,
        default: f64,
        valid: impl Fn(f64) -> bool,
        reason: &str,
    ) -> f64 {
        let Some(value) = value else {
            return default;
        };
        match value.as_f64() {
            Some(v) if v.is_finite() && valid(v) => v,
            Some(_) => {
                self.reject(key, value, reason);
                default
            }
            None => {
                self.reject(key, value, "not a number");
                default
            }
        }
    }

    /// Whole number in `min..=MAX_COUNT`. Fractions are truncated.
    fn count(&mut self, key: &str, value: Option<&RawValue>, default: usize, min: usize) -> usize {
        let Some(value) = value else {
            return default;
        };
        match value.as_f64() {
            Some(v) if v.is_finite() && v >= min as f64 && v <= MAX_COUNT as f64 => v as usize,
            _ => {
                self.reject(
                    key,
                    value,
                    &format!("must be a whole number from {min} to {MAX_COUNT}"),
                );
                default
            }
        }
    }

    fn flag(&mut self, key: &str, value: Option<&RawValue>, default: bool) -> bool {
        let Some(value) = value else {
            return default;
        };
        value.as_bool().unwrap_or_else(|| {
            self.reject(key, value, "must be true or false");
            default
        })
    }

    fn policy(&mut self, value: Option<&RawValue>, period: usize, tolerance: f64) -> RebalancePolicy {
        let name = value.and_then(RawValue::as_text).map(str::to_lowercase);
        match name.as_deref() {
            None if value.is_none() => RebalancePolicy::Periodic { period },
            Some("periodic" | "periodicky" | "periodický") => RebalancePolicy::Periodic { period },
            Some("deviation" | "podle_odchylky" | "odchylka") => {
                RebalancePolicy::Deviation { tolerance }
            }
            Some("combined" | "kombinovane" | "kombinované") => {
                RebalancePolicy::Combined { period, tolerance }
            }
            _ => {
                if let Some(value) = value {
                    self.reject(
                        "rebalance_policy",
                        value,
                        "expected periodic, deviation or combined",
                    );
                }
                RebalancePolicy::Periodic { period }
            }
        }
    }

    fn price_model(&mut self, value: Option<&RawValue>, daily_volatility: f64) -> PriceModel {
        let name = value
            .and_then(RawValue::as_text)
            .map(|s| s.to_lowercase().replace('_', "-"));
        match name.as_deref() {
            None if value.is_none() => PriceModel::TypeBased,
            Some("random" | "random-uniform" | "nahodny" | "náhodný") => {
                PriceModel::RandomUniform { daily_volatility }
            }
            Some("type-based" | "typovy" | "typový") => PriceModel::TypeBased,
            Some("correlated" | "korelacni" | "korelační") => {
                PriceModel::Correlated { daily_volatility }
            }
            _ => {
                if let Some(value) = value {
                    self.reject(
                        "price_model",
                        value,
                        "expected random, type-based or correlated",
                    );
                }
                PriceModel::TypeBased
            }
        }
    }
}
