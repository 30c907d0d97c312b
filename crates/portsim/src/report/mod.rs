//! Run outputs
//!
//! - [`export`] writes the per-portfolio statistics and chart series files,
//!   the cross-portfolio comparison and the JSON run summary
//! - [`summary`] holds the run summary and renders the console report

pub mod export;
pub mod summary;

pub use export::{
    PortfolioExport, export_comparison, export_portfolio, export_run_summary,
};
pub use summary::{PortfolioStatus, PortfolioSummary, RunSummary, render_statistics};
