use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC bar as delivered by the market data provider, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, time: DateTime<Utc>) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}

/// Closing prices of a candle slice, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticIndicator {
    pub k: f64,
    pub d: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Latest indicator readings for one candle sequence.
///
/// `macd_previous` is the MACD point one bar before `macd`, needed to detect
/// a line/signal crossover on the most recent bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma10: Option<SmaIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma20: Option<SmaIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma50: Option<SmaIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<StochasticIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_previous: Option<MacdIndicator>,
}

impl IndicatorSnapshot {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            sma10: None,
            sma20: None,
            sma50: None,
            rsi: None,
            stochastic: None,
            macd: None,
            macd_previous: None,
        }
    }
}
