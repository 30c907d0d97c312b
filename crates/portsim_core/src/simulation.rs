use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::model::{
    ClassReturns, IndexLinked, Portfolio, PriceModel, PriceSourceKind, SimulationResult,
    UniformShock,
};
use crate::paths::{GeneratedPrices, PriceSource, ReplayedPrices, SharedPrices};
use crate::rebalance::rebalance;
use crate::simulation_state::SimulationState;

/// Simulate an allocated portfolio with prices generated for it alone.
///
/// The price model is resolved once here; the daily loop then runs on the
/// concrete process. Prices, quantities and their histories are updated in
/// place on `portfolio`.
pub fn simulate<R: Rng + ?Sized>(
    portfolio: &mut Portfolio,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationResult> {
    if !portfolio.is_allocated() {
        return Err(SimulationError::NotAllocated);
    }
    portfolio.reset_to_day_zero();

    let horizon = config.horizon_days;
    match config.price_model {
        PriceModel::RandomUniform { daily_volatility } => {
            let process = UniformShock::new(daily_volatility)?;
            run(portfolio, config, horizon, GeneratedPrices::new(process, rng))
        }
        PriceModel::TypeBased => {
            let process = ClassReturns::new(portfolio.assets())?;
            run(portfolio, config, horizon, GeneratedPrices::new(process, rng))
        }
        PriceModel::Correlated { daily_volatility } => {
            let process = IndexLinked::new(portfolio.assets(), daily_volatility)?;
            run(portfolio, config, horizon, GeneratedPrices::new(process, rng))
        }
    }
    .map(|(state, portfolio)| state.finish(portfolio, PriceSourceKind::Generated))
}

/// Simulate an allocated portfolio by replaying a shared price path.
///
/// Day 0 uses the portfolio's own initial prices; days `1..=horizon` come from
/// `shared`. Fails with [`SimulationError::UniverseMismatch`] unless the asset
/// names match the shared universe exactly.
pub fn simulate_with_shared_prices(
    portfolio: &mut Portfolio,
    config: &SimulationConfig,
    shared: &SharedPrices,
) -> Result<SimulationResult> {
    if !portfolio.is_allocated() {
        return Err(SimulationError::NotAllocated);
    }
    shared.check_universe(portfolio.assets())?;
    portfolio.reset_to_day_zero();

    run(
        portfolio,
        config,
        shared.horizon(),
        ReplayedPrices::new(shared),
    )
    .map(|(state, portfolio)| state.finish(portfolio, PriceSourceKind::Shared))
}

fn run<'p, S: PriceSource>(
    portfolio: &'p mut Portfolio,
    config: &SimulationConfig,
    horizon: usize,
    mut prices: S,
) -> Result<(SimulationState, &'p Portfolio)> {
    let mut state = SimulationState::start(portfolio, horizon);

    for day in 1..=horizon {
        state.day = day;
        prices.advance(portfolio.assets_mut(), day)?;

        if config.policy.should_rebalance(portfolio, day) {
            let record = rebalance(portfolio, day, config.fee_rate);
            debug!(
                portfolio = portfolio.name(),
                day,
                value = record.portfolio_value,
                fees = record.total_fees,
                "rebalanced"
            );
            state.record_rebalance(record);
        }

        portfolio.record_quantities_through(day);
        state.record_value(portfolio.total_value());
    }

    Ok((state, portfolio))
}

/// Outcome of one portfolio within a multi-portfolio run
#[derive(Debug)]
pub struct PortfolioRun {
    /// The portfolio with its realized price and quantity histories
    pub portfolio: Portfolio,
    pub outcome: Result<SimulationResult>,
}

#[derive(Debug)]
pub struct RunOutcome {
    /// One entry per input portfolio, in input order
    pub runs: Vec<PortfolioRun>,
    /// The shared price path, when one was generated
    pub shared_prices: Option<Arc<SharedPrices>>,
}

/// Simulate several portfolios.
///
/// With `config.shared_prices` set, one price path is generated from the
/// first portfolio's universe and frozen before any portfolio consumes it.
/// Portfolios with the same asset names replay it; the others are logged
/// and simulated independently. Every portfolio gets its own generator,
/// seeded serially from `rng`, so runs may proceed in parallel. A failing
/// portfolio never affects its siblings.
pub fn run_portfolios<R: Rng + ?Sized>(
    portfolios: Vec<Portfolio>,
    config: &SimulationConfig,
    rng: &mut R,
) -> RunOutcome {
    let shared_prices = if config.shared_prices {
        portfolios.first().and_then(|first| {
            match SharedPrices::generate(
                first.assets(),
                config.horizon_days,
                &config.price_model,
                rng,
            ) {
                Ok(shared) => {
                    info!(
                        universe = ?shared.asset_names(),
                        days = shared.horizon(),
                        model = config.price_model.label(),
                        "generated shared price path"
                    );
                    Some(Arc::new(shared))
                }
                Err(err) => {
                    warn!("shared price generation failed, simulating independently: {err}");
                    None
                }
            }
        })
    } else {
        None
    };

    let jobs: Vec<(Portfolio, u64)> = portfolios
        .into_iter()
        .map(|portfolio| {
            let seed = rng.next_u64();
            (portfolio, seed)
        })
        .collect();

    let shared = shared_prices.as_deref();

    #[cfg(feature = "parallel")]
    let runs = jobs
        .into_par_iter()
        .map(|(portfolio, seed)| run_one(portfolio, seed, config, shared))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let runs = jobs
        .into_iter()
        .map(|(portfolio, seed)| run_one(portfolio, seed, config, shared))
        .collect();

    RunOutcome {
        runs,
        shared_prices,
    }
}

fn run_one(
    mut portfolio: Portfolio,
    seed: u64,
    config: &SimulationConfig,
    shared: Option<&SharedPrices>,
) -> PortfolioRun {
    if !portfolio.is_allocated() {
        portfolio.allocate_initial(config.initial_value);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let outcome = match shared.map(|s| (s, s.check_universe(portfolio.assets()))) {
        Some((shared, Ok(()))) => simulate_with_shared_prices(&mut portfolio, config, shared),
        Some((_, Err(mismatch))) => {
            warn!(
                portfolio = portfolio.name(),
                "{mismatch}; simulating with independent prices"
            );
            simulate(&mut portfolio, config, &mut rng)
        }
        None => simulate(&mut portfolio, config, &mut rng),
    };

    match &outcome {
        Ok(result) => info!(
            portfolio = portfolio.name(),
            days = result.horizon(),
            rebalances = result.rebalancing.len(),
            final_value = result.final_value().unwrap_or_default(),
            "simulation finished"
        ),
        Err(err) => warn!(portfolio = portfolio.name(), "simulation failed: {err}"),
    }

    PortfolioRun { portfolio, outcome }
}
