//! Market data capability consumed by the scanner.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::indicators::Candle;
use crate::models::resolution::Resolution;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Actively tradable instruments quoted in the target currency.
    async fn list_instruments(&self) -> Result<Vec<String>, ProviderError>;

    /// Up to `limit` candles, oldest first.
    ///
    /// Every failure (network, unknown symbol, malformed payload) is `None`;
    /// callers never see an error mid-batch.
    async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        limit: usize,
    ) -> Option<Vec<Candle>>;
}
