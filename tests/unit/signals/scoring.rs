//! Unit tests for weighted-delta scoring

use confluex::models::indicators::{
    IndicatorSnapshot, MacdIndicator, RsiIndicator, SmaIndicator, StochasticIndicator,
};
use confluex::models::signal::SignalValue;
use confluex::signals::scoring::{
    score_macd, score_price_vs_average, score_rsi, score_snapshot, score_stochastic,
    SignalThresholds,
};

use crate::common_fixtures::assert_close;

fn macd_point(macd: f64, signal: f64) -> MacdIndicator {
    MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
    }
}

fn sma(value: f64, period: u32) -> Option<SmaIndicator> {
    Some(SmaIndicator { value, period })
}

fn bullish_snapshot() -> IndicatorSnapshot {
    let mut snapshot = IndicatorSnapshot::new(110.0);
    snapshot.sma10 = sma(100.0, 10);
    snapshot.sma20 = sma(100.0, 20);
    snapshot.sma50 = sma(100.0, 50);
    snapshot.rsi = Some(RsiIndicator { value: 35.0, period: 14 });
    snapshot.stochastic = Some(StochasticIndicator { k: 15.0, d: 10.0 });
    snapshot.macd = Some(macd_point(1.1, 1.0));
    snapshot.macd_previous = Some(macd_point(0.9, 1.0));
    snapshot
}

fn bearish_snapshot() -> IndicatorSnapshot {
    let mut snapshot = IndicatorSnapshot::new(90.0);
    snapshot.sma10 = sma(100.0, 10);
    snapshot.sma20 = sma(100.0, 20);
    snapshot.sma50 = sma(100.0, 50);
    snapshot.rsi = Some(RsiIndicator { value: 65.0, period: 14 });
    snapshot.stochastic = Some(StochasticIndicator { k: 85.0, d: 90.0 });
    snapshot.macd = Some(macd_point(0.9, 1.0));
    snapshot.macd_previous = Some(macd_point(1.1, 1.0));
    snapshot
}

#[test]
fn test_thresholds_are_inclusive() {
    let t = SignalThresholds::default();
    assert_eq!(t.classify(8.0), SignalValue::StrongBuy);
    assert_eq!(t.classify(7.5), SignalValue::Buy);
    assert_eq!(t.classify(3.0), SignalValue::Buy);
    assert_eq!(t.classify(2.5), SignalValue::Neutral);
    assert_eq!(t.classify(0.0), SignalValue::Neutral);
    assert_eq!(t.classify(-2.5), SignalValue::Neutral);
    assert_eq!(t.classify(-3.0), SignalValue::Sell);
    assert_eq!(t.classify(-7.5), SignalValue::Sell);
    assert_eq!(t.classify(-8.0), SignalValue::StrongSell);
}

#[test]
fn test_price_vs_average() {
    assert_eq!(score_price_vs_average(101.0, 100.0, 1.5), 1.5);
    assert_eq!(score_price_vs_average(99.0, 100.0, 1.5), -1.5);
    assert_eq!(score_price_vs_average(100.0, 100.0, 1.5), 0.0);
}

#[test]
fn test_rsi_bands() {
    assert_eq!(score_rsi(25.0), 2.0);
    assert_eq!(score_rsi(30.0), 1.0);
    assert_eq!(score_rsi(35.0), 1.0);
    assert_eq!(score_rsi(50.0), 0.0);
    assert_eq!(score_rsi(65.0), -1.0);
    assert_eq!(score_rsi(70.0), -1.0);
    assert_eq!(score_rsi(75.0), -2.0);
}

#[test]
fn test_stochastic_crosses() {
    let s = |k, d| score_stochastic(&StochasticIndicator { k, d });
    assert_eq!(s(15.0, 10.0), 2.0);
    assert_eq!(s(85.0, 90.0), -2.0);
    assert_eq!(s(50.0, 40.0), 1.0);
    assert_eq!(s(50.0, 60.0), -1.0);
    assert_eq!(s(15.0, 20.0), -1.0);
    assert_eq!(s(85.0, 80.0), 1.0);
    assert_eq!(s(50.0, 50.0), 0.0);
}

#[test]
fn test_macd_crossover_dominates_momentum() {
    assert_eq!(score_macd(&macd_point(1.1, 1.0), &macd_point(0.9, 1.0)), 3.0);
    assert_eq!(score_macd(&macd_point(0.9, 1.0), &macd_point(1.1, 1.0)), -3.0);
}

#[test]
fn test_macd_histogram_momentum() {
    // Growing positive histogram
    assert_eq!(score_macd(&macd_point(2.0, 1.0), &macd_point(1.8, 1.0)), 1.0);
    // Growing negative histogram
    assert_eq!(score_macd(&macd_point(-2.0, -1.0), &macd_point(-1.8, -1.0)), -1.0);
    // Positive but shrinking
    assert_eq!(score_macd(&macd_point(1.5, 1.0), &macd_point(1.8, 1.0)), 0.0);
}

#[test]
fn test_snapshot_strong_buy() {
    let breakdown = score_snapshot(&bullish_snapshot());
    // 1 + 1 + 1.5 + 1 + 2 + 3
    assert_close(breakdown.score, 9.5);
    assert_eq!(breakdown.contributions.len(), 6);
    assert_eq!(
        SignalThresholds::default().classify(breakdown.score),
        SignalValue::StrongBuy
    );
}

#[test]
fn test_snapshot_strong_sell() {
    let breakdown = score_snapshot(&bearish_snapshot());
    assert_close(breakdown.score, -9.5);
    assert_eq!(
        SignalThresholds::default().classify(breakdown.score),
        SignalValue::StrongSell
    );
}

#[test]
fn test_snapshot_skips_missing_indicators() {
    let mut snapshot = IndicatorSnapshot::new(110.0);
    snapshot.sma10 = sma(100.0, 10);
    snapshot.macd = Some(macd_point(1.1, 1.0));

    let breakdown = score_snapshot(&snapshot);
    assert_close(breakdown.score, 1.0);
    assert_eq!(breakdown.contributions.len(), 1);
    assert_eq!(breakdown.contributions[0].rule, "sma10");
}
