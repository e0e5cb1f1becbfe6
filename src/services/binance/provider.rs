//! Binance market data provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::messages::{
    parse_klines, perpetual_symbols, spot_symbols, ExchangeInfo, FUTURES_EXCHANGE_INFO_PATH,
    FUTURES_KLINES_PATH, SPOT_EXCHANGE_INFO_PATH, SPOT_KLINES_PATH,
};
use crate::config::UpstreamConfig;
use crate::error::ProviderError;
use crate::models::indicators::Candle;
use crate::models::resolution::Resolution;
use crate::services::market_data::MarketDataProvider;
use crate::services::retry::RetryPolicy;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Largest page either klines endpoint serves.
const MAX_KLINES_LIMIT: usize = 1000;

pub struct BinanceMarketData {
    http: Client,
    futures_url: Url,
    spot_url: Url,
    quote_asset: String,
    retry: RetryPolicy,
}

impl BinanceMarketData {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_client(
            http,
            &config.futures_url,
            &config.spot_url,
            &config.quote_asset,
            RetryPolicy::new(config.retry_max_attempts, config.retry_min_delay),
        )
    }

    pub fn with_client(
        http: Client,
        futures_url: &str,
        spot_url: &str,
        quote_asset: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            futures_url: Url::parse(futures_url)?,
            spot_url: Url::parse(spot_url)?,
            quote_asset: quote_asset.to_uppercase(),
            retry,
        })
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    fn endpoint(base: &Url, path: &str, query: &[(&str, String)]) -> Result<Url, ProviderError> {
        let mut url = base.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, label: &str, url: Url) -> Result<T, ProviderError> {
        self.retry
            .run(label, || {
                let url = url.clone();
                async move {
                    let response = self.http.get(url).send().await?;
                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(ProviderError::Status {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    let bytes = response.bytes().await?;
                    serde_json::from_slice::<T>(&bytes)
                        .map_err(|e| ProviderError::Malformed(e.to_string()))
                }
            })
            .await
    }

    async fn futures_instruments(&self) -> Result<Vec<String>, ProviderError> {
        let url = Self::endpoint(&self.futures_url, FUTURES_EXCHANGE_INFO_PATH, &[])?;
        let info: ExchangeInfo = self.get_json("futures exchangeInfo", url).await?;
        Ok(perpetual_symbols(&info, &self.quote_asset))
    }

    async fn spot_instruments(&self) -> Result<Vec<String>, ProviderError> {
        let url = Self::endpoint(&self.spot_url, SPOT_EXCHANGE_INFO_PATH, &[])?;
        let info: ExchangeInfo = self.get_json("spot exchangeInfo", url).await?;
        Ok(spot_symbols(&info, &self.quote_asset))
    }

    async fn klines(
        &self,
        base: &Url,
        path: &str,
        symbol: &str,
        resolution: Resolution,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        let query = [
            ("symbol", symbol.to_uppercase()),
            ("interval", resolution.as_str().to_string()),
            ("limit", limit.clamp(1, MAX_KLINES_LIMIT).to_string()),
        ];
        let url = Self::endpoint(base, path, &query)?;
        let rows: Vec<Value> = self.get_json("klines", url).await?;
        let candles = parse_klines(&rows);
        if candles.len() < rows.len() {
            debug!(
                symbol,
                %resolution,
                dropped = rows.len() - candles.len(),
                "Dropped malformed kline rows"
            );
        }
        Ok(candles)
    }
}

#[async_trait]
impl MarketDataProvider for BinanceMarketData {
    async fn list_instruments(&self) -> Result<Vec<String>, ProviderError> {
        match self.futures_instruments().await {
            Ok(symbols) if !symbols.is_empty() => {
                debug!(count = symbols.len(), "Listed futures instruments");
                return Ok(symbols);
            }
            Ok(_) => warn!("Futures exchangeInfo returned no tradable perpetuals, trying spot"),
            Err(e) => warn!(error = %e, "Futures exchangeInfo failed, trying spot: {}", e),
        }

        let symbols = self.spot_instruments().await?;
        debug!(count = symbols.len(), "Listed spot instruments");
        Ok(symbols)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        limit: usize,
    ) -> Option<Vec<Candle>> {
        match self
            .klines(&self.futures_url, FUTURES_KLINES_PATH, symbol, resolution, limit)
            .await
        {
            Ok(candles) if !candles.is_empty() => return Some(candles),
            Ok(_) => debug!(symbol, %resolution, "Futures klines empty, trying spot"),
            Err(e) => debug!(symbol, %resolution, error = %e, "Futures klines failed, trying spot"),
        }

        match self
            .klines(&self.spot_url, SPOT_KLINES_PATH, symbol, resolution, limit)
            .await
        {
            Ok(candles) if !candles.is_empty() => Some(candles),
            Ok(_) => None,
            Err(e) => {
                debug!(symbol, %resolution, error = %e, "Spot klines failed");
                None
            }
        }
    }
}
