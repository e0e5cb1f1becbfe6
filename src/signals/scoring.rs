//! Weighted-delta scoring of an indicator snapshot.
//!
//! Each rule contributes a signed weight (positive = bullish). The sum is
//! mapped onto a [`SignalValue`] by [`SignalThresholds`].

use crate::models::indicators::{IndicatorSnapshot, MacdIndicator, StochasticIndicator};
use crate::models::signal::SignalValue;

pub const SMA10_WEIGHT: f64 = 1.0;
pub const SMA20_WEIGHT: f64 = 1.0;
pub const SMA50_WEIGHT: f64 = 1.5;

pub const RSI_EXTREME_WEIGHT: f64 = 2.0;
pub const RSI_LEAN_WEIGHT: f64 = 1.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_LEAN_LOW: f64 = 40.0;
pub const RSI_LEAN_HIGH: f64 = 60.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

pub const STOCH_EXTREME_WEIGHT: f64 = 2.0;
pub const STOCH_CROSS_WEIGHT: f64 = 1.0;
pub const STOCH_OVERSOLD: f64 = 20.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;

pub const MACD_CROSSOVER_WEIGHT: f64 = 3.0;
pub const MACD_MOMENTUM_WEIGHT: f64 = 1.0;

/// Score cut-offs, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub sell: f64,
    pub strong_sell: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_buy: 8.0,
            buy: 3.0,
            sell: -3.0,
            strong_sell: -8.0,
        }
    }
}

impl SignalThresholds {
    pub fn classify(&self, score: f64) -> SignalValue {
        if score >= self.strong_buy {
            SignalValue::StrongBuy
        } else if score >= self.buy {
            SignalValue::Buy
        } else if score <= self.strong_sell {
            SignalValue::StrongSell
        } else if score <= self.sell {
            SignalValue::Sell
        } else {
            SignalValue::Neutral
        }
    }
}

/// One rule's signed contribution, kept for explainability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreContribution {
    pub rule: &'static str,
    pub weight: f64,
}

/// Signed total plus the rules that fired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub contributions: Vec<ScoreContribution>,
}

impl ScoreBreakdown {
    fn add(&mut self, rule: &'static str, weight: f64) {
        if weight != 0.0 {
            self.score += weight;
            self.contributions.push(ScoreContribution { rule, weight });
        }
    }
}

/// Close above the average scores +weight, below scores -weight.
pub fn score_price_vs_average(price: f64, average: f64, weight: f64) -> f64 {
    if price > average {
        weight
    } else if price < average {
        -weight
    } else {
        0.0
    }
}

/// Oversold RSI is bullish, overbought bearish; 40/60 give a lean.
pub fn score_rsi(rsi: f64) -> f64 {
    let mut score = 0.0;
    if rsi < RSI_OVERSOLD {
        score += RSI_EXTREME_WEIGHT;
    } else if rsi < RSI_LEAN_LOW {
        score += RSI_LEAN_WEIGHT;
    }
    if rsi > RSI_OVERBOUGHT {
        score -= RSI_EXTREME_WEIGHT;
    } else if rsi > RSI_LEAN_HIGH {
        score -= RSI_LEAN_WEIGHT;
    }
    score
}

/// %K crossing %D inside an extreme zone weighs double.
pub fn score_stochastic(stoch: &StochasticIndicator) -> f64 {
    if stoch.k < STOCH_OVERSOLD && stoch.k > stoch.d {
        STOCH_EXTREME_WEIGHT
    } else if stoch.k > STOCH_OVERBOUGHT && stoch.k < stoch.d {
        -STOCH_EXTREME_WEIGHT
    } else if stoch.k > stoch.d {
        STOCH_CROSS_WEIGHT
    } else if stoch.k < stoch.d {
        -STOCH_CROSS_WEIGHT
    } else {
        0.0
    }
}

/// A line/signal crossover on the latest bar dominates; otherwise a growing
/// histogram on its own side adds momentum.
pub fn score_macd(current: &MacdIndicator, previous: &MacdIndicator) -> f64 {
    if current.macd > current.signal && previous.macd <= previous.signal {
        MACD_CROSSOVER_WEIGHT
    } else if current.macd < current.signal && previous.macd >= previous.signal {
        -MACD_CROSSOVER_WEIGHT
    } else if current.histogram > 0.0 && current.histogram > previous.histogram {
        MACD_MOMENTUM_WEIGHT
    } else if current.histogram < 0.0 && current.histogram < previous.histogram {
        -MACD_MOMENTUM_WEIGHT
    } else {
        0.0
    }
}

/// Sum every rule whose inputs are present in the snapshot.
pub fn score_snapshot(snapshot: &IndicatorSnapshot) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();
    let price = snapshot.price;

    if let Some(sma) = snapshot.sma10 {
        breakdown.add("sma10", score_price_vs_average(price, sma.value, SMA10_WEIGHT));
    }
    if let Some(sma) = snapshot.sma20 {
        breakdown.add("sma20", score_price_vs_average(price, sma.value, SMA20_WEIGHT));
    }
    if let Some(sma) = snapshot.sma50 {
        breakdown.add("sma50", score_price_vs_average(price, sma.value, SMA50_WEIGHT));
    }
    if let Some(rsi) = snapshot.rsi {
        breakdown.add("rsi", score_rsi(rsi.value));
    }
    if let Some(stoch) = snapshot.stochastic.as_ref() {
        breakdown.add("stochastic", score_stochastic(stoch));
    }
    if let (Some(current), Some(previous)) = (snapshot.macd.as_ref(), snapshot.macd_previous.as_ref()) {
        breakdown.add("macd", score_macd(current, previous));
    }

    breakdown
}
