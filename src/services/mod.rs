//! Market data collaborators

pub mod binance;
pub mod cache;
pub mod market_data;
pub mod retry;

pub use binance::BinanceMarketData;
pub use cache::CachedMarketData;
pub use market_data::MarketDataProvider;
pub use retry::RetryPolicy;
