//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::ema;
use crate::models::indicators::{closes, Candle, MacdIndicator};

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// MACD series.
///
/// MACD = EMA(fast) - EMA(slow), with the fast EMA shifted by `slow - fast` so
/// both start on the same bar. Signal = EMA(signal) of MACD. Histogram =
/// MACD - Signal. One point per bar that has a signal value; nothing when
/// `series.len() < slow + signal`.
pub fn macd(series: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdIndicator> {
    if fast == 0 || signal == 0 || fast > slow || series.len() < slow + signal {
        return Vec::new();
    }

    let fast_ema = ema(series, fast);
    let slow_ema = ema(series, slow);

    let macd_line: Vec<f64> = fast_ema[slow - fast..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal);

    macd_line[signal - 1..]
        .iter()
        .zip(&signal_line)
        .map(|(&macd, &signal)| MacdIndicator {
            macd,
            signal,
            histogram: macd - signal,
        })
        .collect()
}

/// Latest MACD point
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    macd(
        &closes(candles),
        fast_period as usize,
        slow_period as usize,
        signal_period as usize,
    )
    .last()
    .copied()
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<MacdIndicator> {
    calculate_macd(
        candles,
        DEFAULT_FAST_PERIOD as u32,
        DEFAULT_SLOW_PERIOD as u32,
        DEFAULT_SIGNAL_PERIOD as u32,
    )
}
