//! SMA (Simple Moving Average) indicator

use crate::models::indicators::{closes, Candle, SmaIndicator};

/// Mean of every trailing window of `period` values.
///
/// Yields `series.len() - period + 1` values, or nothing when the series is
/// shorter than `period`.
pub fn sma(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() < period {
        return Vec::new();
    }

    series
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Latest SMA of closing prices
pub fn calculate_sma(candles: &[Candle], period: u32) -> Option<SmaIndicator> {
    let values = sma(&closes(candles), period as usize);
    values.last().map(|&value| SmaIndicator { value, period })
}

