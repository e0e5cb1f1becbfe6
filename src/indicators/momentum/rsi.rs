//! RSI (Relative Strength Index) indicator

use crate::models::indicators::{closes, Candle, RsiIndicator};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RS substituted when the average loss is zero.
pub const ZERO_LOSS_RS: f64 = 100.0;

/// RSI series with Wilder smoothing.
///
/// Seeded from the mean gain and loss of the first `period` differences, then
/// `avg = (avg * (period - 1) + x) / period`. RSI = 100 - 100 / (1 + RS).
/// Yields `series.len() - period` values, or nothing when
/// `series.len() <= period`.
pub fn rsi(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() <= period {
        return Vec::new();
    }

    let p = period as f64;
    let (mut avg_gain, mut avg_loss) = series[..=period]
        .windows(2)
        .map(|w| split_change(w[1] - w[0]))
        .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
    avg_gain /= p;
    avg_loss /= p;

    let mut out = Vec::with_capacity(series.len() - period);
    out.push(rsi_value(avg_gain, avg_loss));

    for w in series[period..].windows(2) {
        let (gain, loss) = split_change(w[1] - w[0]);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out.push(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn split_change(change: f64) -> (f64, f64) {
    if change >= 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        ZERO_LOSS_RS
    } else {
        avg_gain / avg_loss
    };
    100.0 - (100.0 / (1.0 + rs))
}

/// Latest RSI of closing prices
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    let values = rsi(&closes(candles), period as usize);
    values.last().map(|&value| RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, DEFAULT_RSI_PERIOD as u32)
}
