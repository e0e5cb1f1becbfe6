//! Unit tests for MACD indicator

use confluex::indicators::momentum::{calculate_macd_default, macd};
use confluex::indicators::trend::ema;

use crate::common_fixtures::{assert_close, uptrend};

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

#[test]
fn test_macd_insufficient_data() {
    assert!(macd(&ramp(34), 12, 26, 9).is_empty());
    assert!(calculate_macd_default(&uptrend(30)).is_none());
}

#[test]
fn test_macd_minimum_length() {
    // 35 - 26 + 1 = 10 MACD points, 10 - 9 + 1 = 2 with a signal value
    assert_eq!(macd(&ramp(35), 12, 26, 9).len(), 2);
}

#[test]
fn test_macd_rejects_fast_slower_than_slow() {
    assert!(macd(&ramp(100), 26, 12, 9).is_empty());
}

#[test]
fn test_macd_alignment() {
    let series = [3.0, 5.0, 4.0, 8.0, 7.0, 9.0, 12.0, 10.0];
    let fast = ema(&series, 2);
    let slow = ema(&series, 3);
    let line: Vec<f64> = fast[1..].iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, 2);

    let values = macd(&series, 2, 3, 2);
    assert_eq!(values.len(), signal.len());
    for (j, point) in values.iter().enumerate() {
        assert_close(point.macd, line[j + 1]);
        assert_close(point.signal, signal[j]);
        assert_close(point.histogram, point.macd - point.signal);
    }
}

#[test]
fn test_macd_constant_series_is_zero() {
    for point in macd(&[50.0; 60], 12, 26, 9) {
        assert_close(point.macd, 0.0);
        assert_close(point.signal, 0.0);
        assert_close(point.histogram, 0.0);
    }
}

#[test]
fn test_macd_positive_in_uptrend() {
    let latest = calculate_macd_default(&uptrend(100)).unwrap();
    assert!(latest.macd > 0.0);
}
