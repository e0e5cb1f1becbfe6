//! Unit tests for EMA indicator

use confluex::indicators::trend::{calculate_ema, ema, sma};

use crate::common_fixtures::{assert_close, uptrend};

#[test]
fn test_ema_insufficient_data() {
    let candles = uptrend(10);
    assert!(calculate_ema(&candles, 20).is_none());
    assert!(ema(&[1.0, 2.0], 3).is_empty());
}

#[test]
fn test_ema_seeded_with_sma() {
    let series = [2.0, 4.0, 6.0, 8.0, 10.0];
    let values = ema(&series, 3);
    assert_eq!(values.len(), 3);
    assert_close(values[0], sma(&series[..3], 3)[0]);
}

#[test]
fn test_ema_recurrence() {
    // multiplier = 2 / (3 + 1) = 0.5
    let values = ema(&[2.0, 4.0, 6.0, 8.0, 10.0], 3);
    assert_close(values[0], 4.0);
    assert_close(values[1], 6.0);
    assert_close(values[2], 8.0);
}

#[test]
fn test_ema_of_constant_series_is_constant() {
    let values = ema(&[5.0; 20], 7);
    assert_eq!(values.len(), 14);
    for v in values {
        assert_close(v, 5.0);
    }
}

#[test]
fn test_ema_sufficient_data() {
    let candles = uptrend(50);
    let result = calculate_ema(&candles, 12).unwrap();
    assert_eq!(result.period, 12);
    assert!(result.value.is_finite());
    // Lags a rising series
    assert!(result.value < candles.last().unwrap().close);
}
