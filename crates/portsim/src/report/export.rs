//! File exports
//!
//! Layout under the output directory:
//!
//! ```text
//! {prefix}/statistics/{prefix}_transactions.csv
//! {prefix}/statistics/{prefix}_values.csv
//! {prefix}/statistics/{prefix}_prices.csv
//! {prefix}/statistics/{prefix}_statistics.csv
//! {prefix}/statistics/{prefix}_statistics.txt
//! {prefix}/statistics/{prefix}_rebalancing.txt
//! {prefix}/series/{drawdown,weights,real_value,rolling_volatility,correlations,daily_returns}.csv
//! comparison/values.csv
//! run_summary.json
//! ```
//!
//! Delimited files use `;`. Undefined numbers are written as empty cells.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use portsim_core::AnalysisConfig;
use portsim_core::analysis::{
    CorrelationMatrix, PortfolioStatistics, WeightHistory, daily_returns_pct, drawdown_pct,
    real_values, rolling_volatility,
};
use portsim_core::model::{Portfolio, RebalanceRecord, SimulationResult};

use super::summary::RunSummary;
use crate::error::ExportError;
use crate::util::format::{format_cell, format_percentage, format_percentage_precise};
use crate::util::io::atomic_write;

const DELIMITER: char = ';';

/// `;`-delimited text with a header row
struct Table {
    out: String,
}

impl Table {
    fn new<S: AsRef<str>>(header: impl IntoIterator<Item = S>) -> Self {
        let mut table = Self { out: String::new() };
        table.row(header);
        table
    }

    fn row<S: AsRef<str>>(&mut self, cells: impl IntoIterator<Item = S>) {
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                self.out.push(DELIMITER);
            }
            let cell = cell.as_ref();
            if cell.contains(DELIMITER) || cell.contains('"') {
                self.out.push('"');
                self.out.push_str(&cell.replace('"', "\"\""));
                self.out.push('"');
            } else {
                self.out.push_str(cell);
            }
        }
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Everything exported for one simulated portfolio
pub struct PortfolioExport<'a> {
    /// File stem of the input, names the output folder and files
    pub prefix: &'a str,
    pub portfolio: &'a Portfolio,
    pub result: &'a SimulationResult,
    pub statistics: Option<&'a PortfolioStatistics>,
    pub analysis: &'a AnalysisConfig,
}

/// Write all statistics and series files of one portfolio
pub fn export_portfolio(
    output_dir: &Path,
    export: &PortfolioExport<'_>,
) -> Result<Vec<PathBuf>, ExportError> {
    let prefix = export.prefix;
    let statistics_dir = output_dir.join(prefix).join("statistics");
    let series_dir = output_dir.join(prefix).join("series");
    let values = &export.result.values;

    let files = [
        (
            statistics_dir.join(format!("{prefix}_transactions.csv")),
            transactions_csv(&export.result.rebalancing),
        ),
        (
            statistics_dir.join(format!("{prefix}_values.csv")),
            values_csv(values),
        ),
        (
            statistics_dir.join(format!("{prefix}_prices.csv")),
            prices_csv(export.portfolio),
        ),
        (
            statistics_dir.join(format!("{prefix}_statistics.csv")),
            statistics_csv(export.statistics),
        ),
        (
            statistics_dir.join(format!("{prefix}_statistics.txt")),
            statistics_text(export.statistics),
        ),
        (
            statistics_dir.join(format!("{prefix}_rebalancing.txt")),
            rebalancing_text(&export.result.rebalancing),
        ),
        (
            series_dir.join("drawdown.csv"),
            day_series_csv("Drawdown (%)", &drawdown_pct(values), 0, 4),
        ),
        (
            series_dir.join("weights.csv"),
            weights_csv(&WeightHistory::from_portfolio(export.portfolio)),
        ),
        (
            series_dir.join("real_value.csv"),
            real_value_csv(values, export.analysis.inflation_rate),
        ),
        (
            series_dir.join("rolling_volatility.csv"),
            day_series_csv(
                "Rolling volatility",
                &rolling_volatility(values, export.analysis.rolling_window),
                1,
                6,
            ),
        ),
        (
            series_dir.join("correlations.csv"),
            correlations_csv(&CorrelationMatrix::from_portfolio(export.portfolio)),
        ),
        (
            series_dir.join("daily_returns.csv"),
            day_series_csv("Daily return (%)", &daily_returns_pct(values), 1, 4),
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, content) in files {
        atomic_write(&path, &content).map_err(|err| ExportError::io(&path, err))?;
        written.push(path);
    }
    Ok(written)
}

/// Write the value series of all portfolios side by side
pub fn export_comparison(
    output_dir: &Path,
    series: &[(&str, &[f64])],
) -> Result<PathBuf, ExportError> {
    let path = output_dir.join("comparison").join("values.csv");
    atomic_write(&path, &comparison_csv(series)).map_err(|err| ExportError::io(&path, err))?;
    Ok(path)
}

pub fn export_run_summary(output_dir: &Path, summary: &RunSummary) -> Result<PathBuf, ExportError> {
    let path = output_dir.join("run_summary.json");
    let json = serde_json::to_string_pretty(summary)
        .map_err(|err| ExportError::Serialize(err.to_string()))?;
    atomic_write(&path, &json).map_err(|err| ExportError::io(&path, err))?;
    Ok(path)
}

// ============================================================================
// Statistics files
// ============================================================================

fn transactions_csv(history: &[RebalanceRecord]) -> String {
    let mut table = Table::new([
        "Day",
        "Asset",
        "Previous quantity",
        "New quantity",
        "Change",
        "Fee",
    ]);
    for record in history {
        for trade in &record.trades {
            table.row([
                record.day.to_string(),
                trade.asset.clone(),
                format!("{:.4}", trade.previous_quantity),
                format!("{:.4}", trade.new_quantity),
                format!("{:+.4}", trade.quantity_change),
                format!("{:.2}", trade.fee),
            ]);
        }
    }
    table.finish()
}

fn values_csv(values: &[f64]) -> String {
    let mut table = Table::new(["Day", "Portfolio value"]);
    for (day, value) in values.iter().enumerate() {
        table.row([day.to_string(), format_cell(*value, 2)]);
    }
    table.finish()
}

fn prices_csv(portfolio: &Portfolio) -> String {
    let assets = portfolio.assets();
    let mut table = Table::new(
        std::iter::once("Day".to_string()).chain(assets.iter().map(|a| a.name.clone())),
    );
    let days = assets.iter().map(|a| a.prices().len()).min().unwrap_or(0);
    for day in 0..days {
        table.row(
            std::iter::once(day.to_string())
                .chain(assets.iter().map(|a| format_cell(a.prices()[day], 4))),
        );
    }
    table.finish()
}

fn statistics_rows(stats: &PortfolioStatistics) -> Vec<(&'static str, String)> {
    vec![
        ("Start value", format_cell(stats.start_value, 2)),
        ("End value", format_cell(stats.end_value, 2)),
        ("Total return (%)", format_cell(stats.total_return_pct, 2)),
        ("CAGR (%)", format_cell(stats.cagr * 100.0, 4)),
        ("Daily std deviation (%)", format_cell(stats.daily_std_dev * 100.0, 4)),
        ("Annual std deviation (%)", format_cell(stats.annual_std_dev * 100.0, 4)),
        ("Sharpe ratio", format_cell(stats.sharpe_ratio, 4)),
        ("Maximum", format_cell(stats.max_value, 2)),
        ("Minimum", format_cell(stats.min_value, 2)),
        ("Max drawdown (%)", format_cell(stats.max_drawdown * 100.0, 2)),
        ("Total fees", format_cell(stats.total_fees, 2)),
    ]
}

fn statistics_csv(stats: Option<&PortfolioStatistics>) -> String {
    let mut table = Table::new(["Statistic", "Value"]);
    if let Some(stats) = stats {
        for (name, value) in statistics_rows(stats) {
            table.row([name.to_string(), value]);
        }
    }
    table.finish()
}

fn statistics_text(stats: Option<&PortfolioStatistics>) -> String {
    let mut out = String::from("Portfolio statistics\n");
    out.push_str(&"=".repeat(35));
    out.push('\n');
    let Some(s) = stats else {
        out.push_str("Not enough data for statistics.\n");
        return out;
    };
    let _ = writeln!(out, "Start value:       {:.2}", s.start_value);
    let _ = writeln!(out, "End value:         {:.2}", s.end_value);
    let _ = writeln!(out, "Total return:      {:.2} %", s.total_return_pct);
    let _ = writeln!(out, "CAGR:              {}", format_percentage_precise(s.cagr));
    let _ = writeln!(out, "Annual volatility: {}", format_percentage_precise(s.annual_std_dev));
    let _ = writeln!(out, "Sharpe ratio:      {:.4}", s.sharpe_ratio);
    let _ = writeln!(out, "Maximum:           {:.2}", s.max_value);
    let _ = writeln!(out, "Minimum:           {:.2}", s.min_value);
    let _ = writeln!(out, "Max drawdown:      {}", format_percentage(s.max_drawdown));
    let _ = writeln!(out, "Total fees:        {:.2}", s.total_fees);
    out
}

fn rebalancing_text(history: &[RebalanceRecord]) -> String {
    let rule = "-".repeat(45);
    let mut out = String::from("Portfolio rebalancing records\n");
    out.push_str(&"=".repeat(45));
    out.push('\n');
    if history.is_empty() {
        out.push_str("No rebalancing took place.\n");
    }
    for record in history {
        let _ = writeln!(
            out,
            "Day {} - Value: {:.2} - Total fees: {:.2}",
            record.day, record.portfolio_value, record.total_fees
        );
        for t in &record.trades {
            let _ = writeln!(
                out,
                " - {}: {:.4} -> {:.4} (change: {:+.4}, fee: {:.2})",
                t.asset, t.previous_quantity, t.new_quantity, t.quantity_change, t.fee
            );
        }
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

// ============================================================================
// Chart series
// ============================================================================

/// Single-column series whose first entry belongs to `first_day`
fn day_series_csv(column: &str, series: &[f64], first_day: usize, decimals: usize) -> String {
    let mut table = Table::new(["Day", column]);
    for (i, value) in series.iter().enumerate() {
        table.row([(first_day + i).to_string(), format_cell(*value, decimals)]);
    }
    table.finish()
}

fn real_value_csv(values: &[f64], inflation_rate: f64) -> String {
    let mut table = Table::new(["Day", "Nominal value", "Real value"]);
    for (day, (nominal, real)) in values
        .iter()
        .zip(real_values(values, inflation_rate))
        .enumerate()
    {
        table.row([
            day.to_string(),
            format_cell(*nominal, 2),
            format_cell(real, 2),
        ]);
    }
    table.finish()
}

fn weights_csv(history: &WeightHistory) -> String {
    let mut table = Table::new(
        std::iter::once("Day".to_string()).chain(history.assets.iter().cloned()),
    );
    for (day, weights) in history.weights.iter().enumerate() {
        table.row(
            std::iter::once(day.to_string()).chain(weights.iter().map(|w| format_cell(*w, 6))),
        );
    }
    table.finish()
}

fn correlations_csv(matrix: &CorrelationMatrix) -> String {
    let mut table = Table::new(
        std::iter::once(String::new()).chain(matrix.assets.iter().cloned()),
    );
    for (name, row) in matrix.assets.iter().zip(&matrix.values) {
        table.row(std::iter::once(name.clone()).chain(row.iter().map(|c| format_cell(*c, 4))));
    }
    table.finish()
}

fn comparison_csv(series: &[(&str, &[f64])]) -> String {
    let mut table = Table::new(
        std::iter::once("Day").chain(series.iter().map(|(name, _)| *name)),
    );
    let days = series.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for day in 0..days {
        table.row(std::iter::once(day.to_string()).chain(series.iter().map(|(_, v)| {
            v.get(day).map_or_else(String::new, |value| format_cell(*value, 2))
        })));
    }
    table.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portsim_core::config::{AssetBuilder, PortfolioBuilder, SimulationConfig};
    use portsim_core::rebalance::RebalancePolicy;
    use portsim_core::simulation::simulate;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tempfile::tempdir;

    fn simulated() -> (Portfolio, SimulationResult) {
        let mut portfolio = PortfolioBuilder::new("test")
            .asset(AssetBuilder::equity("World").price(100.0).weight(0.7))
            .asset(AssetBuilder::bond("Bonds").price(50.0).weight(0.3))
            .allocate(10_000.0)
            .build()
            .unwrap();
        let config = SimulationConfig::default()
            .with_horizon(100)
            .with_policy(RebalancePolicy::Periodic { period: 30 });
        let mut rng = SmallRng::seed_from_u64(1);
        let result = simulate(&mut portfolio, &config, &mut rng).unwrap();
        (portfolio, result)
    }

    #[test]
    fn test_table_quotes_delimiter() {
        let mut table = Table::new(["a", "b"]);
        table.row(["x;y", "say \"hi\""]);
        assert_eq!(table.finish(), "a;b\n\"x;y\";\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_transactions_csv() {
        let (_, result) = simulated();
        let csv = transactions_csv(&result.rebalancing);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Day;Asset;Previous quantity;New quantity;Change;Fee");
        // 3 rebalances x 2 assets
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("30;World;"));
    }

    #[test]
    fn test_comparison_pads_shorter_series() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0];
        let csv = comparison_csv(&[("a", &a[..]), ("b", &b[..])]);
        assert_eq!(csv, "Day;a;b\n0;1.00;4.00\n1;2.00;\n2;3.00;\n");
    }

    #[test]
    fn test_rolling_volatility_starts_empty() {
        let csv = day_series_csv("Rolling volatility", &[f64::NAN, 0.5], 1, 2);
        assert_eq!(csv, "Day;Rolling volatility\n1;\n2;0.50\n");
    }

    #[test]
    fn test_export_portfolio_writes_all_files() {
        let dir = tempdir().unwrap();
        let (portfolio, result) = simulated();
        let stats = PortfolioStatistics::from_result(&result, 0.01).unwrap();
        let analysis = AnalysisConfig::default();

        let written = export_portfolio(
            dir.path(),
            &PortfolioExport {
                prefix: "test",
                portfolio: &portfolio,
                result: &result,
                statistics: Some(&stats),
                analysis: &analysis,
            },
        )
        .unwrap();

        assert_eq!(written.len(), 12);
        for path in &written {
            assert!(path.exists(), "{}", path.display());
        }

        let stats_dir = dir.path().join("test").join("statistics");
        let values = std::fs::read_to_string(stats_dir.join("test_values.csv")).unwrap();
        assert_eq!(values.lines().count(), 102);
        assert_eq!(values.lines().nth(1).unwrap(), "0;10000.00");

        let prices = std::fs::read_to_string(stats_dir.join("test_prices.csv")).unwrap();
        assert_eq!(prices.lines().next().unwrap(), "Day;World;Bonds");

        let weights =
            std::fs::read_to_string(dir.path().join("test").join("series").join("weights.csv"))
                .unwrap();
        assert_eq!(weights.lines().nth(1).unwrap(), "0;0.700000;0.300000");

        let rebalancing = std::fs::read_to_string(stats_dir.join("test_rebalancing.txt")).unwrap();
        assert_eq!(rebalancing.matches("Day ").count(), 3);
    }

    #[test]
    fn test_statistics_without_data() {
        assert_eq!(statistics_csv(None), "Statistic;Value\n");
        assert!(statistics_text(None).contains("Not enough data"));
    }
}
