//! Per-resolution signal classification.

use crate::indicators::momentum::{
    calculate_rsi_default, calculate_stochastic_default, macd, DEFAULT_FAST_PERIOD,
    DEFAULT_SIGNAL_PERIOD, DEFAULT_SLOW_PERIOD,
};
use crate::indicators::trend::calculate_sma;
use crate::models::indicators::{closes, Candle, IndicatorSnapshot};
use crate::models::signal::SignalValue;
use crate::signals::scoring::{score_snapshot, ScoreBreakdown, SignalThresholds};

/// Below this many candles a resolution is always neutral.
pub const MIN_CANDLES: usize = 50;

pub struct SignalEngine;

impl SignalEngine {
    /// Classify one candle sequence into a discrete signal.
    pub fn classify(candles: &[Candle]) -> SignalValue {
        Self::classify_with_breakdown(candles).0
    }

    /// Classification plus the score and rule contributions behind it.
    pub fn classify_with_breakdown(candles: &[Candle]) -> (SignalValue, ScoreBreakdown) {
        let Some(snapshot) = Self::snapshot(candles) else {
            return (SignalValue::Neutral, ScoreBreakdown::default());
        };

        let breakdown = score_snapshot(&snapshot);
        let signal = SignalThresholds::default().classify(breakdown.score);
        (signal, breakdown)
    }

    /// Latest indicator readings, or `None` for short history.
    pub fn snapshot(candles: &[Candle]) -> Option<IndicatorSnapshot> {
        if candles.len() < MIN_CANDLES {
            return None;
        }

        let price = candles.last()?.close;
        let macd_series = macd(
            &closes(candles),
            DEFAULT_FAST_PERIOD,
            DEFAULT_SLOW_PERIOD,
            DEFAULT_SIGNAL_PERIOD,
        );

        let mut snapshot = IndicatorSnapshot::new(price);
        snapshot.sma10 = calculate_sma(candles, 10);
        snapshot.sma20 = calculate_sma(candles, 20);
        snapshot.sma50 = calculate_sma(candles, 50);
        snapshot.rsi = calculate_rsi_default(candles);
        snapshot.stochastic = calculate_stochastic_default(candles);
        snapshot.macd = macd_series.last().copied();
        snapshot.macd_previous = macd_series
            .len()
            .checked_sub(2)
            .map(|i| macd_series[i]);

        Some(snapshot)
    }
}
