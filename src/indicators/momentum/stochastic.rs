//! Stochastic oscillator (%K / %D)

use crate::models::indicators::{Candle, StochasticIndicator};

pub const DEFAULT_K_PERIOD: usize = 9;
pub const DEFAULT_D_PERIOD: usize = 6;

/// One (%K, %D) pair per trailing window of `k_period` candles.
///
/// %K is where the close sits inside the window's high/low range, scaled to
/// 0..=100, and is exactly 0 when the range is flat. %D averages the last
/// `d_period` %K values, and equals %K until that many have accumulated.
pub fn stochastic(candles: &[Candle], k_period: usize, d_period: usize) -> Vec<StochasticIndicator> {
    if k_period == 0 || candles.len() < k_period {
        return Vec::new();
    }

    let mut raw_k: Vec<f64> = Vec::with_capacity(candles.len() - k_period + 1);
    let mut out = Vec::with_capacity(candles.len() - k_period + 1);

    for window in candles.windows(k_period) {
        let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let close = window[window.len() - 1].close;

        let range = highest - lowest;
        let k = if range != 0.0 {
            ((close - lowest) / range * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        raw_k.push(k);

        let d = if d_period > 0 && raw_k.len() >= d_period {
            raw_k[raw_k.len() - d_period..].iter().sum::<f64>() / d_period as f64
        } else {
            k
        };

        out.push(StochasticIndicator { k, d });
    }

    out
}

/// Latest stochastic reading
pub fn calculate_stochastic(
    candles: &[Candle],
    k_period: u32,
    d_period: u32,
) -> Option<StochasticIndicator> {
    stochastic(candles, k_period as usize, d_period as usize)
        .last()
        .copied()
}

/// Calculate stochastic with default periods (9, 6)
pub fn calculate_stochastic_default(candles: &[Candle]) -> Option<StochasticIndicator> {
    calculate_stochastic(candles, DEFAULT_K_PERIOD as u32, DEFAULT_D_PERIOD as u32)
}
