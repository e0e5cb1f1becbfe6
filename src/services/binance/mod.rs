//! Binance REST market data (USDT-M futures with spot fallback)

pub mod messages;
pub mod provider;

pub use provider::BinanceMarketData;
