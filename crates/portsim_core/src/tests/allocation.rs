//! Tests for portfolio validation and initial allocation

use super::balanced;
use crate::config::{AssetBuilder, PortfolioBuilder};
use crate::error::PortfolioError;
use crate::model::{Asset, AssetClass, Portfolio};

#[test]
fn test_allocation_preserves_initial_value() {
    let portfolio = balanced("p");
    let notional: f64 = portfolio
        .assets()
        .iter()
        .map(|a| a.quantity() * a.initial_price)
        .sum();
    assert!((notional - 100_000.0).abs() < 1e-9);
    assert!((portfolio.total_value() - 100_000.0).abs() < 1e-9);
}

#[test]
fn test_allocation_follows_weights() {
    let portfolio = balanced("p");
    let world = portfolio.asset("World").unwrap();
    let bonds = portfolio.asset("Bonds").unwrap();
    assert!((world.quantity() - 600.0).abs() < 1e-9);
    assert!((bonds.quantity() - 600.0).abs() < 1e-9);
}

#[test]
fn test_allocation_with_uneven_weights() {
    let mut portfolio = Portfolio::new(
        "thirds",
        vec![
            Asset::new("A", AssetClass::Equity, 3.7, 0.333),
            Asset::new("B", AssetClass::Bond, 11.3, 0.333),
            Asset::new("C", AssetClass::Gold, 97.1, 0.3345),
        ],
    )
    .unwrap();
    portfolio.allocate_initial(12_345.67);
    assert!((portfolio.total_value() - 12_345.67).abs() < 1e-9);
}

#[test]
fn test_single_asset_takes_everything() {
    let portfolio = PortfolioBuilder::new("solo")
        .asset(AssetBuilder::cash("Cash").weight(1.0))
        .allocate(100_000.0)
        .build()
        .unwrap();
    let cash = portfolio.asset("Cash").unwrap();
    assert_eq!(cash.quantity(), 100_000.0);
    assert_eq!(cash.prices(), &[1.0]);
    assert_eq!(cash.quantity_history(), &[100_000.0]);
}

#[test]
fn test_histories_seeded_on_allocation() {
    let portfolio = balanced("p");
    for asset in portfolio.assets() {
        assert_eq!(asset.prices(), &[asset.initial_price]);
        assert_eq!(asset.quantity_history(), &[asset.quantity()]);
    }
    assert_eq!(portfolio.days_simulated(), 0);
}

#[test]
fn test_validation_errors() {
    assert_eq!(
        Portfolio::new("empty", vec![]).unwrap_err(),
        PortfolioError::Empty
    );

    let duplicate = Portfolio::new(
        "dup",
        vec![
            Asset::new("A", AssetClass::Equity, 1.0, 0.5),
            Asset::new("A", AssetClass::Bond, 1.0, 0.5),
        ],
    );
    assert_eq!(
        duplicate.unwrap_err(),
        PortfolioError::DuplicateAsset("A".into())
    );

    let zero_price = Portfolio::new("zero", vec![Asset::new("A", AssetClass::Equity, 0.0, 1.0)]);
    assert!(matches!(
        zero_price,
        Err(PortfolioError::InvalidPrice { .. })
    ));

    let bad_correlation = Portfolio::new(
        "rho",
        vec![Asset::new("A", AssetClass::Equity, 1.0, 1.0).with_correlation(1.5)],
    );
    assert!(matches!(
        bad_correlation,
        Err(PortfolioError::InvalidCorrelation { .. })
    ));

    let off_by_two_percent = Portfolio::new(
        "sum",
        vec![
            Asset::new("A", AssetClass::Equity, 1.0, 0.5),
            Asset::new("B", AssetClass::Bond, 1.0, 0.48),
        ],
    );
    assert!(matches!(
        off_by_two_percent,
        Err(PortfolioError::WeightSum { .. })
    ));
}
