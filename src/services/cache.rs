//! Time-bounded memoization in front of any [`MarketDataProvider`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::indicators::Candle;
use crate::models::resolution::Resolution;
use crate::services::market_data::MarketDataProvider;

/// The instrument universe changes rarely.
pub const INSTRUMENTS_TTL: Duration = Duration::from_secs(3600);

/// Expired entries are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 4096;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.stored_at) < ttl
    }
}

type CandleKey = (String, Resolution);

/// Series plus the limit it was fetched with.
type CandleSeries = (usize, Vec<Candle>);

/// Caches successful candle fetches per (instrument, resolution) for `ttl`,
/// and the instrument list for [`INSTRUMENTS_TTL`]. A zero `ttl` disables
/// candle caching. Failures are never cached.
pub struct CachedMarketData<P> {
    inner: P,
    ttl: Duration,
    instruments_ttl: Duration,
    candles: RwLock<HashMap<CandleKey, Entry<CandleSeries>>>,
    instruments: RwLock<Option<Entry<Vec<String>>>>,
}

impl<P: MarketDataProvider> CachedMarketData<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_instruments_ttl(inner, ttl, INSTRUMENTS_TTL)
    }

    pub fn with_instruments_ttl(inner: P, ttl: Duration, instruments_ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            instruments_ttl,
            candles: RwLock::new(HashMap::new()),
            instruments: RwLock::new(None),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub async fn cached_series(&self) -> usize {
        self.candles.read().await.len()
    }

    pub async fn clear(&self) {
        self.candles.write().await.clear();
        *self.instruments.write().await = None;
    }

    async fn lookup(&self, key: &CandleKey, limit: usize) -> Option<Vec<Candle>> {
        let candles = self.candles.read().await;
        let entry = candles.get(key)?;
        let (fetched_with, series) = &entry.value;
        if !entry.is_fresh(self.ttl, Instant::now()) || *fetched_with < limit {
            return None;
        }
        let start = series.len().saturating_sub(limit);
        Some(series[start..].to_vec())
    }

    async fn store(&self, key: CandleKey, limit: usize, series: Vec<Candle>) {
        let mut candles = self.candles.write().await;
        if candles.len() >= SWEEP_THRESHOLD {
            let now = Instant::now();
            let ttl = self.ttl;
            candles.retain(|_, entry| entry.is_fresh(ttl, now));
        }
        candles.insert(key, Entry::new((limit, series)));
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedMarketData<P> {
    async fn list_instruments(&self) -> Result<Vec<String>, ProviderError> {
        if let Some(entry) = self.instruments.read().await.as_ref() {
            if entry.is_fresh(self.instruments_ttl, Instant::now()) {
                return Ok(entry.value.clone());
            }
        }

        let symbols = self.inner.list_instruments().await?;
        if !symbols.is_empty() {
            *self.instruments.write().await = Some(Entry::new(symbols.clone()));
        }
        Ok(symbols)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        limit: usize,
    ) -> Option<Vec<Candle>> {
        if self.ttl.is_zero() {
            return self.inner.fetch_candles(symbol, resolution, limit).await;
        }

        let key = (symbol.to_string(), resolution);
        if let Some(hit) = self.lookup(&key, limit).await {
            debug!(symbol, %resolution, "Candle cache hit");
            return Some(hit);
        }

        let series = self.inner.fetch_candles(symbol, resolution, limit).await?;
        self.store(key, limit, series.clone()).await;
        Some(series)
    }
}
