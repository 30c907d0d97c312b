//! Tests for shared price paths and multi-portfolio runs

use super::{balanced, rng};
use crate::config::{AssetBuilder, PortfolioBuilder, SimulationConfig};
use crate::error::SimulationError;
use crate::model::{PriceModel, PriceSourceKind};
use crate::paths::SharedPrices;
use crate::rebalance::RebalancePolicy;
use crate::simulation::{run_portfolios, simulate_with_shared_prices};

/// Same universe as [`balanced`] with different weights
fn aggressive(name: &str) -> crate::model::Portfolio {
    PortfolioBuilder::new(name)
        .asset(AssetBuilder::gold("Gold").price(1_800.0).weight(0.05))
        .asset(AssetBuilder::equity("World").price(100.0).weight(0.9))
        .asset(AssetBuilder::bond("Bonds").price(50.0).weight(0.05))
        .allocate(100_000.0)
        .build()
        .unwrap()
}

#[test]
fn test_shared_series_shape() {
    let portfolio = balanced("p");
    for model in [
        PriceModel::RandomUniform {
            daily_volatility: 0.02,
        },
        PriceModel::TypeBased,
        PriceModel::Correlated {
            daily_volatility: 0.02,
        },
    ] {
        let shared = SharedPrices::generate(portfolio.assets(), 30, &model, &mut rng(1)).unwrap();
        assert_eq!(shared.horizon(), 30);
        assert_eq!(shared.model(), &model);
        for asset in portfolio.assets() {
            let prices = shared.prices(&asset.name).unwrap();
            assert_eq!(prices.len(), 31);
            assert_eq!(prices[0], asset.initial_price);
        }
    }
}

#[test]
fn test_identical_universes_realize_identical_prices() {
    let config = SimulationConfig::default().with_horizon(200);
    let shared =
        SharedPrices::generate(balanced("x").assets(), 200, &config.price_model, &mut rng(12))
            .unwrap();

    let mut a = balanced("a");
    let mut b = aggressive("b");
    let ra = simulate_with_shared_prices(&mut a, &config, &shared).unwrap();
    let rb = simulate_with_shared_prices(&mut b, &config, &shared).unwrap();

    assert_eq!(ra.price_source, PriceSourceKind::Shared);
    assert_eq!(rb.values.len(), 201);
    for asset in a.assets() {
        let other = b.asset(&asset.name).unwrap();
        let bits = |p: &[f64]| p.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(asset.prices()), bits(other.prices()));
        assert_eq!(asset.prices(), shared.prices(&asset.name).unwrap());
    }
}

#[test]
fn test_universe_mismatch_is_reported() {
    let config = SimulationConfig::default().with_horizon(10);
    let shared =
        SharedPrices::generate(balanced("x").assets(), 10, &config.price_model, &mut rng(2))
            .unwrap();

    let mut other = PortfolioBuilder::new("other")
        .asset(AssetBuilder::equity("World").price(100.0).weight(0.5))
        .asset(AssetBuilder::equity("Tech").price(100.0).weight(0.5))
        .allocate(1_000.0)
        .build()
        .unwrap();

    let err = simulate_with_shared_prices(&mut other, &config, &shared).unwrap_err();
    match err {
        SimulationError::UniverseMismatch {
            missing,
            unexpected,
        } => {
            assert_eq!(
                missing.into_iter().collect::<Vec<_>>(),
                vec!["Bonds".to_string(), "Gold".to_string()]
            );
            assert_eq!(
                unexpected.into_iter().collect::<Vec<_>>(),
                vec!["Tech".to_string()]
            );
        }
        other => panic!("expected a universe mismatch, got {other:?}"),
    }
    // Nothing was replayed
    assert_eq!(other.days_simulated(), 0);
}

#[test]
fn test_run_portfolios_shares_prices() {
    let config = SimulationConfig::default()
        .with_horizon(120)
        .with_policy(RebalancePolicy::Periodic { period: 30 });
    let outcome = run_portfolios(vec![balanced("a"), aggressive("b")], &config, &mut rng(77));

    let shared = outcome.shared_prices.as_ref().unwrap();
    assert_eq!(outcome.runs.len(), 2);
    assert_eq!(outcome.runs[0].portfolio.name(), "a");
    assert_eq!(outcome.runs[1].portfolio.name(), "b");

    for run in &outcome.runs {
        let result = run.outcome.as_ref().unwrap();
        assert_eq!(result.price_source, PriceSourceKind::Shared);
        assert_eq!(result.rebalancing.len(), 4);
        for asset in run.portfolio.assets() {
            assert_eq!(asset.prices(), shared.prices(&asset.name).unwrap());
        }
    }
}

#[test]
fn test_run_portfolios_falls_back_on_mismatch() {
    let config = SimulationConfig::default().with_horizon(60);
    let other = PortfolioBuilder::new("other")
        .asset(AssetBuilder::equity("Tech").price(10.0).weight(1.0))
        .build()
        .unwrap();

    let outcome = run_portfolios(vec![balanced("a"), other], &config, &mut rng(5));

    let first = outcome.runs[0].outcome.as_ref().unwrap();
    let second = outcome.runs[1].outcome.as_ref().unwrap();
    assert_eq!(first.price_source, PriceSourceKind::Shared);
    assert_eq!(second.price_source, PriceSourceKind::Generated);
    assert_eq!(second.values.len(), 61);
    // Allocated by the run with the configured initial value
    assert!((second.values[0] - config.initial_value).abs() < 1e-9);
}

#[test]
fn test_run_portfolios_independent_when_disabled() {
    let config = SimulationConfig::default()
        .with_horizon(60)
        .with_shared_prices(false);
    let outcome = run_portfolios(vec![balanced("a"), balanced("b")], &config, &mut rng(5));

    assert!(outcome.shared_prices.is_none());
    let a = &outcome.runs[0];
    let b = &outcome.runs[1];
    assert!(a.outcome.as_ref().unwrap().price_source == PriceSourceKind::Generated);
    assert_ne!(
        a.portfolio.asset("World").unwrap().prices(),
        b.portfolio.asset("World").unwrap().prices()
    );
}

#[test]
fn test_failure_does_not_abort_siblings() {
    let config = SimulationConfig::default()
        .with_horizon(20)
        .with_shared_prices(false)
        .with_price_model(PriceModel::Correlated {
            daily_volatility: f64::INFINITY,
        });
    let outcome = run_portfolios(vec![balanced("a"), balanced("b")], &config, &mut rng(5));
    assert!(outcome.runs.iter().all(|r| r.outcome.is_err()));
    assert_eq!(outcome.runs.len(), 2);

    let ok = run_portfolios(
        vec![balanced("a")],
        &SimulationConfig::default().with_horizon(5),
        &mut rng(5),
    );
    assert!(ok.runs[0].outcome.is_ok());
}

#[test]
fn test_run_is_reproducible_from_seed() {
    let config = SimulationConfig::default().with_horizon(80);
    let first = run_portfolios(vec![balanced("a"), balanced("b")], &config, &mut rng(31));
    let second = run_portfolios(vec![balanced("a"), balanced("b")], &config, &mut rng(31));
    for (x, y) in first.runs.iter().zip(&second.runs) {
        assert_eq!(
            x.outcome.as_ref().unwrap().values,
            y.outcome.as_ref().unwrap().values
        );
    }
}

#[test]
fn test_shared_generation_rejects_overflowing_price() {
    let model = PriceModel::RandomUniform {
        daily_volatility: 1e300,
    };
    let err = SharedPrices::generate(balanced("x").assets(), 10, &model, &mut rng(3)).unwrap_err();
    assert!(matches!(err, SimulationError::NonFinitePrice { .. }));
}
