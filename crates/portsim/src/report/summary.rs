use std::fmt::Write as _;
use std::path::PathBuf;

use portsim_core::analysis::PortfolioStatistics;
use portsim_core::model::PriceSourceKind;
use serde::Serialize;

use crate::util::format::{format_amount, format_percentage, format_percentage_precise};

/// Outcome of a whole run, written to `run_summary.json`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub price_model: String,
    pub rebalance_policy: String,
    pub horizon_days: usize,
    pub initial_value: f64,
    /// Whether a shared price path was generated
    pub shared_prices: bool,
    pub portfolios: Vec<PortfolioSummary>,
}

impl RunSummary {
    #[must_use]
    pub fn simulated(&self) -> usize {
        self.portfolios
            .iter()
            .filter(|p| matches!(p.status, PortfolioStatus::Simulated { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.portfolios.len() - self.simulated()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub name: String,
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: PortfolioStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PortfolioStatus {
    Simulated {
        price_source: PriceSourceKind,
        statistics: Option<PortfolioStatistics>,
        total_fees: f64,
        rebalances: usize,
        /// Set when some output files could not be written
        #[serde(skip_serializing_if = "Option::is_none")]
        export_error: Option<String>,
    },
    LoadFailed {
        error: String,
    },
    SimulationFailed {
        error: String,
    },
}

/// Console block for one simulated portfolio
#[must_use]
pub fn render_statistics(name: &str, stats: &PortfolioStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n--- {name} ---");
    let _ = writeln!(out, "Start value:          {}", format_amount(stats.start_value));
    let _ = writeln!(out, "End value:            {}", format_amount(stats.end_value));
    let _ = writeln!(
        out,
        "Total return:         {}",
        format_percentage(stats.total_return_pct / 100.0)
    );
    let _ = writeln!(out, "CAGR:                 {}", format_percentage_precise(stats.cagr));
    let _ = writeln!(
        out,
        "Daily std deviation:  {}",
        format_percentage_precise(stats.daily_std_dev)
    );
    let _ = writeln!(
        out,
        "Annual std deviation: {}",
        format_percentage_precise(stats.annual_std_dev)
    );
    let _ = writeln!(out, "Sharpe ratio:         {:.4}", stats.sharpe_ratio);
    let _ = writeln!(out, "Maximum value:        {}", format_amount(stats.max_value));
    let _ = writeln!(out, "Minimum value:        {}", format_amount(stats.min_value));
    let _ = writeln!(out, "Max drawdown:         {}", format_percentage(stats.max_drawdown));
    let _ = writeln!(out, "Total fees:           {}", format_amount(stats.total_fees));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> PortfolioStatistics {
        let values: Vec<f64> = (0..=252).map(|d| 1_000_000.0 + d as f64 * 500.0).collect();
        let mut stats = PortfolioStatistics::compute(&values, 0.01).unwrap();
        stats.total_fees = 1_234.5;
        stats
    }

    #[test]
    fn test_render_uses_thousands_separators() {
        let text = render_statistics("risky", &stats());
        assert!(text.contains("--- risky ---"));
        assert!(text.contains("Start value:          1,000,000.00"));
        assert!(text.contains("End value:            1,126,000.00"));
        assert!(text.contains("Total fees:           1,234.50"));
        assert!(text.contains("Total return:         12.60 %"));
    }

    #[test]
    fn test_summary_serializes_status_tag() {
        let summary = RunSummary {
            seed: 1,
            price_model: "type-based".into(),
            rebalance_policy: "periodic".into(),
            horizon_days: 252,
            initial_value: 100_000.0,
            shared_prices: true,
            portfolios: vec![
                PortfolioSummary {
                    name: "a".into(),
                    source: PathBuf::from("a.csv"),
                    status: PortfolioStatus::Simulated {
                        price_source: PriceSourceKind::Shared,
                        statistics: Some(stats()),
                        total_fees: 1_234.5,
                        rebalances: 2,
                        export_error: None,
                    },
                },
                PortfolioSummary {
                    name: "b".into(),
                    source: PathBuf::from("b.csv"),
                    status: PortfolioStatus::LoadFailed {
                        error: "missing column 'Asset'".into(),
                    },
                },
            ],
        };

        assert_eq!(summary.simulated(), 1);
        assert_eq!(summary.failed(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["portfolios"][0]["status"], "simulated");
        assert_eq!(json["portfolios"][0]["price_source"], "shared");
        assert!(json["portfolios"][0].get("export_error").is_none());
        assert_eq!(json["portfolios"][1]["status"], "load_failed");
        assert_eq!(json["portfolios"][1]["error"], "missing column 'Asset'");
    }
}
