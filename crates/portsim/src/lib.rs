//! Portfolio simulation command-line application
//!
//! Loads portfolios from CSV files, simulates them with `portsim_core`,
//! prints a statistics block per portfolio and writes the statistics files,
//! chart series, comparison table and JSON run summary to the output
//! directory. Settings come from a YAML file with command-line overrides.

// ============================================================================
// Application modules
// ============================================================================

pub mod app;
pub mod config;
pub mod loader;
pub mod logging;
pub mod report;

// ============================================================================
// Support modules
// ============================================================================

pub mod error;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use app::App;
pub use config::{AppConfig, ConfigError, LoadedConfig, load_config, parse_config};
pub use error::{ExportError, LoadError};
pub use loader::{load_portfolio, parse_portfolio};
pub use logging::init_logging;
pub use report::RunSummary;
