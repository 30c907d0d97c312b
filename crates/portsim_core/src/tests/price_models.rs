//! Tests for the price models
//!
//! These tests verify that:
//! - Zero volatility freezes the random-uniform and correlated models
//! - Shocks stay inside the configured symmetric interval
//! - Type-based drift follows the annual class parameters
//! - The correlated model moves fully correlated assets with the index

use super::rng;
use crate::model::{
    Asset, AssetClass, ClassReturns, IndexLinked, PriceProcess, UniformShock, daily_return,
};

#[test]
fn test_uniform_zero_volatility_is_constant() {
    let process = UniformShock::new(0.0).unwrap();
    let mut rng = rng(1);
    let mut price = 42.0;
    for _ in 0..500 {
        price = process.next_price(0, price, &mut rng);
        assert_eq!(price, 42.0);
    }
}

#[test]
fn test_uniform_shock_is_bounded() {
    let v = 0.02;
    let process = UniformShock::new(v).unwrap();
    let mut rng = rng(7);
    let mut saw_up = false;
    let mut saw_down = false;
    for _ in 0..10_000 {
        let next = process.next_price(0, 100.0, &mut rng);
        let change = next / 100.0 - 1.0;
        assert!(change >= -v - 1e-12 && change <= v + 1e-12);
        saw_up |= change > 0.0;
        saw_down |= change < 0.0;
    }
    assert!(saw_up && saw_down);
}

#[test]
fn test_cash_class_grows_deterministically() {
    let assets = vec![Asset::new("Cash", AssetClass::Cash, 1.0, 1.0)];
    let process = ClassReturns::new(&assets).unwrap();
    let mut rng = rng(3);

    let mut price = 1.0;
    for _ in 0..252 {
        price = process.next_price(0, price, &mut rng);
    }
    assert!((price - 1.01).abs() < 1e-9);
}

#[test]
fn test_equity_drift_matches_annual_return() {
    let assets = vec![Asset::new("World", AssetClass::Equity, 100.0, 1.0)];
    let process = ClassReturns::new(&assets).unwrap();
    let mut rng = rng(11);

    let n = 200_000;
    let mean_change: f64 = (0..n)
        .map(|_| process.next_price(0, 1.0, &mut rng) - 1.0)
        .sum::<f64>()
        / n as f64;

    // Daily sd is ~0.0094, so the standard error of the mean is ~2e-5
    assert!((mean_change - daily_return(0.08)).abs() < 1e-4);
}

#[test]
fn test_correlated_zero_volatility_is_constant() {
    let assets = vec![
        Asset::new("A", AssetClass::Equity, 10.0, 0.5).with_correlation(0.3),
        Asset::new("B", AssetClass::Bond, 20.0, 0.5),
    ];
    let mut process = IndexLinked::new(&assets, 0.0).unwrap();
    let mut rng = rng(5);
    for _ in 0..100 {
        process.begin_day(&mut rng);
        assert_eq!(process.next_price(0, 10.0, &mut rng), 10.0);
        assert_eq!(process.next_price(1, 20.0, &mut rng), 20.0);
    }
    assert_eq!(process.index().level(), 100.0);
}

#[test]
fn test_fully_correlated_asset_follows_index() {
    let assets = vec![Asset::new("A", AssetClass::Equity, 10.0, 1.0).with_correlation(1.0)];
    let mut process = IndexLinked::new(&assets, 0.03).unwrap();
    let mut rng = rng(9);

    let mut price = 10.0;
    for _ in 0..250 {
        process.begin_day(&mut rng);
        price = process.next_price(0, price, &mut rng);
    }
    let index_growth = process.index().level() / 100.0;
    assert!((price / 10.0 - index_growth).abs() < 1e-9);
}

#[test]
fn test_unspecified_correlation_uses_default() {
    let assets = vec![Asset::new("A", AssetClass::Equity, 10.0, 1.0)];
    assert_eq!(assets[0].correlation_or_default(), 0.5);
    assert!(IndexLinked::new(&assets, 0.01).is_ok());
}
