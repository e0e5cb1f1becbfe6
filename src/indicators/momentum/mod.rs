//! Momentum indicators: RSI, Stochastic, MACD

pub mod macd;
pub mod rsi;
pub mod stochastic;

pub use macd::*;
pub use rsi::*;
pub use stochastic::*;
