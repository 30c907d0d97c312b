use std::io::Write;
use std::path::PathBuf;

use portsim_core::analysis::PortfolioStatistics;
use portsim_core::model::Portfolio;
use portsim_core::simulation::run_portfolios;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::loader::{load_portfolio, portfolio_name};
use crate::report::{
    PortfolioExport, PortfolioStatus, PortfolioSummary, RunSummary, export_comparison,
    export_portfolio, export_run_summary, render_statistics,
};
use crate::util::format::format_amount;

/// One configured run: load, simulate, report
pub struct App {
    config: AppConfig,
    seed: u64,
}

impl App {
    /// Fixes the seed of the run generator, drawing a fresh one when none is configured
    pub fn new(config: AppConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self { config, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run every configured portfolio and write all outputs.
    ///
    /// Portfolios that fail to load or simulate are reported in the summary
    /// and never stop the others. Console output goes to `out`.
    pub fn run(&self, out: &mut impl Write) -> color_eyre::Result<RunSummary> {
        let config = &self.config;
        info!(
            seed = self.seed,
            model = config.simulation.price_model.label(),
            policy = config.simulation.policy.label(),
            days = config.simulation.horizon_days,
            portfolios = config.portfolios.len(),
            "starting run"
        );

        // Load in input order, keeping the slot of every failed file
        let mut slots: Vec<(PathBuf, Result<(), String>)> = Vec::new();
        let mut loaded: Vec<Portfolio> = Vec::new();
        for path in &config.portfolios {
            match load_portfolio(path) {
                Ok(mut portfolio) => {
                    portfolio.allocate_initial(config.simulation.initial_value);
                    info!(
                        portfolio = portfolio.name(),
                        assets = portfolio.assets().len(),
                        "loaded portfolio"
                    );
                    loaded.push(portfolio);
                    slots.push((path.clone(), Ok(())));
                }
                Err(err) => {
                    warn!("skipping {}: {err}", path.display());
                    slots.push((path.clone(), Err(err.to_string())));
                }
            }
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let outcome = run_portfolios(loaded, &config.simulation, &mut rng);
        let mut runs = outcome.runs.into_iter();

        let mut summaries = Vec::with_capacity(slots.len());
        let mut comparison: Vec<(String, Vec<f64>)> = Vec::new();

        for (path, slot) in slots {
            let name = portfolio_name(&path);
            let status = match slot {
                Err(error) => PortfolioStatus::LoadFailed { error },
                Ok(()) => {
                    let Some(run) = runs.next() else {
                        break;
                    };
                    match run.outcome {
                        Err(err) => PortfolioStatus::SimulationFailed {
                            error: err.to_string(),
                        },
                        Ok(result) => {
                            let statistics = PortfolioStatistics::from_result(
                                &result,
                                config.analysis.risk_free_rate,
                            );
                            match &statistics {
                                Some(stats) => {
                                    write!(out, "{}", render_statistics(&name, stats))?;
                                }
                                None => {
                                    writeln!(out, "\n--- {name} ---")?;
                                    writeln!(out, "Not enough data for statistics.")?;
                                }
                            }

                            let export_error = export_portfolio(
                                &config.output_dir,
                                &PortfolioExport {
                                    prefix: &name,
                                    portfolio: &run.portfolio,
                                    result: &result,
                                    statistics: statistics.as_ref(),
                                    analysis: &config.analysis,
                                },
                            )
                            .map_err(|err| {
                                warn!(portfolio = name.as_str(), "export failed: {err}");
                                err.to_string()
                            })
                            .err();

                            comparison.push((name.clone(), result.values.clone()));
                            PortfolioStatus::Simulated {
                                price_source: result.price_source,
                                total_fees: result.total_fees(),
                                rebalances: result.rebalancing.len(),
                                statistics,
                                export_error,
                            }
                        }
                    }
                }
            };
            summaries.push(PortfolioSummary {
                name,
                source: path,
                status,
            });
        }

        if !comparison.is_empty() {
            let series: Vec<(&str, &[f64])> = comparison
                .iter()
                .map(|(name, values)| (name.as_str(), values.as_slice()))
                .collect();
            if let Err(err) = export_comparison(&config.output_dir, &series) {
                warn!("comparison export failed: {err}");
            }
        }

        let summary = RunSummary {
            seed: self.seed,
            price_model: config.simulation.price_model.label().to_string(),
            rebalance_policy: config.simulation.policy.label().to_string(),
            horizon_days: config.simulation.horizon_days,
            initial_value: config.simulation.initial_value,
            shared_prices: outcome.shared_prices.is_some(),
            portfolios: summaries,
        };
        let summary_path = export_run_summary(&config.output_dir, &summary)?;

        writeln!(
            out,
            "\n{} of {} portfolios simulated (seed {}), initial value {}. Summary: {}",
            summary.simulated(),
            summary.portfolios.len(),
            self.seed,
            format_amount(config.simulation.initial_value),
            summary_path.display()
        )?;
        info!(
            simulated = summary.simulated(),
            failed = summary.failed(),
            "run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portsim_core::RebalancePolicy;
    use portsim_core::model::PriceSourceKind;
    use tempfile::tempdir;

    const CONSERVATIVE: &str = "\
Asset,InitialPrice,InitialWeight,AssetType,CorrelationWithIndex
World,100,0.3,akcie,0.8
Bonds,50,0.6,dluhopis,0.2
Gold,1800,0.1,zlato,0.1
";

    const RISKY: &str = "\
Asset,InitialPrice,InitialWeight,AssetType,CorrelationWithIndex
Gold,1800,0.05,zlato,0.1
World,100,0.85,akcie,0.8
Bonds,50,0.1,dluhopis,0.2
";

    fn config_in(dir: &std::path::Path, files: &[(&str, &str)]) -> AppConfig {
        let mut config = AppConfig::default();
        config.portfolios = files
            .iter()
            .map(|(name, content)| {
                let path = dir.join(name);
                std::fs::write(&path, content).unwrap();
                path
            })
            .collect();
        config.output_dir = dir.join("outputs");
        config.seed = Some(42);
        config.simulation.horizon_days = 200;
        config.simulation.policy = RebalancePolicy::Periodic { period: 50 };
        config
    }

    #[test]
    fn test_run_shares_prices_and_writes_outputs() {
        let dir = tempdir().unwrap();
        let config = config_in(
            dir.path(),
            &[("conservative.csv", CONSERVATIVE), ("risky.csv", RISKY)],
        );
        let output_dir = config.output_dir.clone();

        let mut console = Vec::new();
        let summary = App::new(config).run(&mut console).unwrap();

        assert_eq!(summary.seed, 42);
        assert!(summary.shared_prices);
        assert_eq!(summary.simulated(), 2);
        for portfolio in &summary.portfolios {
            match &portfolio.status {
                PortfolioStatus::Simulated {
                    price_source,
                    rebalances,
                    export_error,
                    statistics,
                    ..
                } => {
                    assert_eq!(*price_source, PriceSourceKind::Shared);
                    assert_eq!(*rebalances, 4);
                    assert!(export_error.is_none());
                    assert_eq!(statistics.as_ref().unwrap().days, 200);
                }
                other => panic!("unexpected status {other:?}"),
            }
        }

        assert!(output_dir.join("run_summary.json").exists());
        assert!(output_dir.join("comparison").join("values.csv").exists());
        assert!(
            output_dir
                .join("risky")
                .join("statistics")
                .join("risky_transactions.csv")
                .exists()
        );
        assert!(
            output_dir
                .join("conservative")
                .join("series")
                .join("correlations.csv")
                .exists()
        );

        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("--- conservative ---"));
        assert!(console.contains("Start value:          100,000.00"));
        assert!(console.contains("2 of 2 portfolios simulated"));
    }

    #[test]
    fn test_load_failure_does_not_stop_run() {
        let dir = tempdir().unwrap();
        let broken = "Asset,InitialPrice,InitialWeight,AssetType\nA,1,0.5,akcie\nB,1,0.4,akcie\n";
        let mut config = config_in(
            dir.path(),
            &[("broken.csv", broken), ("conservative.csv", CONSERVATIVE)],
        );
        config.portfolios.push(dir.path().join("missing.csv"));

        let summary = App::new(config).run(&mut std::io::sink()).unwrap();

        assert_eq!(summary.portfolios.len(), 3);
        assert_eq!(summary.portfolios[0].name, "broken");
        assert!(matches!(
            summary.portfolios[0].status,
            PortfolioStatus::LoadFailed { .. }
        ));
        assert!(matches!(
            summary.portfolios[1].status,
            PortfolioStatus::Simulated { .. }
        ));
        assert!(matches!(
            summary.portfolios[2].status,
            PortfolioStatus::LoadFailed { .. }
        ));
    }

    #[test]
    fn test_same_seed_same_values() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), &[("conservative.csv", CONSERVATIVE)]);
        let values_path = config
            .output_dir
            .join("conservative")
            .join("statistics")
            .join("conservative_values.csv");

        App::new(config.clone()).run(&mut std::io::sink()).unwrap();
        let first = std::fs::read_to_string(&values_path).unwrap();
        App::new(config).run(&mut std::io::sink()).unwrap();
        let second = std::fs::read_to_string(&values_path).unwrap();
        assert_eq!(first, second);
    }
}
