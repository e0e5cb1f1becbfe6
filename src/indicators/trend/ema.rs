//! EMA (Exponential Moving Average) indicator

use crate::models::indicators::{closes, Candle, EmaIndicator};

/// Exponential moving average seeded with the SMA of the first `period` values.
///
/// `ema[i] = (x[i] - ema[i-1]) * 2/(period+1) + ema[i-1]`. Yields
/// `series.len() - period + 1` values, or nothing when the series is shorter
/// than `period`.
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed = series[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(series.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &x in &series[period..] {
        prev = (x - prev) * multiplier + prev;
        out.push(prev);
    }

    out
}

/// Calculate EMA for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Option<EmaIndicator> {
    let values = ema(&closes(candles), period as usize);
    values.last().map(|&value| EmaIndicator { value, period })
}

