//! Unit tests for signal engine

use confluex::models::signal::SignalValue;
use confluex::signals::engine::{SignalEngine, MIN_CANDLES};

use crate::common_fixtures::{assert_close, flat, rally, selloff, uptrend};

fn weight_of(breakdown: &confluex::signals::ScoreBreakdown, rule: &str) -> Option<f64> {
    breakdown
        .contributions
        .iter()
        .find(|c| c.rule == rule)
        .map(|c| c.weight)
}

#[test]
fn test_classify_insufficient_data() {
    assert_eq!(SignalEngine::classify(&uptrend(MIN_CANDLES - 1)), SignalValue::Neutral);
    assert_eq!(SignalEngine::classify(&rally(MIN_CANDLES)[1..]), SignalValue::Neutral);
    assert!(SignalEngine::snapshot(&uptrend(10)).is_none());
}

#[test]
fn test_insufficient_data_has_empty_breakdown() {
    let (signal, breakdown) = SignalEngine::classify_with_breakdown(&rally(60)[..30]);
    assert_eq!(signal, SignalValue::Neutral);
    assert!(breakdown.contributions.is_empty());
}

#[test]
fn test_snapshot_at_minimum_history() {
    let snapshot = SignalEngine::snapshot(&uptrend(MIN_CANDLES)).unwrap();
    assert!(snapshot.sma10.is_some());
    assert!(snapshot.sma20.is_some());
    assert!(snapshot.sma50.is_some());
    assert!(snapshot.rsi.is_some());
    assert!(snapshot.stochastic.is_some());
    assert!(snapshot.macd.is_some());
    assert!(snapshot.macd_previous.is_some());
}

#[test]
fn test_rally_classifies_buy() {
    let (signal, breakdown) = SignalEngine::classify_with_breakdown(&rally(60));
    assert_eq!(signal, SignalValue::Buy);
    assert_close(breakdown.score, 4.5);
    assert_eq!(weight_of(&breakdown, "sma50"), Some(1.5));
    assert_eq!(weight_of(&breakdown, "rsi"), Some(-1.0));
    assert_eq!(weight_of(&breakdown, "macd"), Some(1.0));
}

#[test]
fn test_selloff_classifies_sell() {
    let (signal, breakdown) = SignalEngine::classify_with_breakdown(&selloff(60));
    assert_eq!(signal, SignalValue::Sell);
    assert_close(breakdown.score, -4.5);
}

#[test]
fn test_flat_market_is_neutral() {
    let (signal, breakdown) = SignalEngine::classify_with_breakdown(&flat(60, 100.0));
    assert_eq!(signal, SignalValue::Neutral);
    // Zero-loss RSI reads overbought; nothing else fires.
    assert_eq!(breakdown.contributions.len(), 1);
    assert_eq!(weight_of(&breakdown, "rsi"), Some(-2.0));
}

#[test]
fn test_uptrend_trend_contributions() {
    let (_, breakdown) = SignalEngine::classify_with_breakdown(&uptrend(60));
    assert_eq!(weight_of(&breakdown, "sma10"), Some(1.0));
    assert_eq!(weight_of(&breakdown, "sma20"), Some(1.0));
    assert_eq!(weight_of(&breakdown, "sma50"), Some(1.5));
    assert_eq!(weight_of(&breakdown, "rsi"), Some(-2.0));
}

#[test]
fn test_classify_is_deterministic() {
    let candles = rally(80);
    let first = SignalEngine::classify_with_breakdown(&candles);
    let second = SignalEngine::classify_with_breakdown(&candles);
    assert_eq!(first, second);
}
