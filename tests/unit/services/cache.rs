//! Unit tests for the candle and instrument cache

use std::time::Duration;

use confluex::models::resolution::Resolution;
use confluex::services::market_data::MarketDataProvider;
use confluex::services::CachedMarketData;

use crate::common_fixtures::rally;
use crate::common_provider::ScriptedProvider;

fn provider() -> ScriptedProvider {
    ScriptedProvider::new(&["BTCUSDT", "ETHUSDT"]).with_all("BTCUSDT", rally(80))
}

#[tokio::test]
async fn test_repeat_fetch_within_ttl_hits_cache() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    let first = cache.fetch_candles("BTCUSDT", Resolution::H1, 60).await;
    let second = cache.fetch_candles("BTCUSDT", Resolution::H1, 60).await;

    assert_eq!(first, second);
    assert_eq!(first.map(|c| c.len()), Some(60));
    assert_eq!(cache.inner().candle_calls(), 1);
    assert_eq!(cache.cached_series().await, 1);
}

#[tokio::test]
async fn test_keys_are_per_resolution() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    cache.fetch_candles("BTCUSDT", Resolution::H1, 60).await;
    cache.fetch_candles("BTCUSDT", Resolution::H4, 60).await;

    assert_eq!(cache.inner().candle_calls(), 2);
    assert_eq!(cache.cached_series().await, 2);
}

#[tokio::test]
async fn test_zero_ttl_disables_caching() {
    let cache = CachedMarketData::new(provider(), Duration::ZERO);

    cache.fetch_candles("BTCUSDT", Resolution::M5, 60).await;
    cache.fetch_candles("BTCUSDT", Resolution::M5, 60).await;

    assert_eq!(cache.inner().candle_calls(), 2);
    assert_eq!(cache.cached_series().await, 0);
}

#[tokio::test]
async fn test_missing_series_is_not_cached() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    assert!(cache.fetch_candles("ETHUSDT", Resolution::D1, 60).await.is_none());
    assert!(cache.fetch_candles("ETHUSDT", Resolution::D1, 60).await.is_none());

    assert_eq!(cache.inner().candle_calls(), 2);
}

#[tokio::test]
async fn test_smaller_limit_served_from_cache() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    let full = cache.fetch_candles("BTCUSDT", Resolution::M1, 80).await.unwrap();
    let tail = cache.fetch_candles("BTCUSDT", Resolution::M1, 50).await.unwrap();

    assert_eq!(cache.inner().candle_calls(), 1);
    assert_eq!(tail.len(), 50);
    assert_eq!(tail.as_slice(), &full[30..]);
}

#[tokio::test]
async fn test_larger_limit_refetches() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    cache.fetch_candles("BTCUSDT", Resolution::M1, 50).await;
    let more = cache.fetch_candles("BTCUSDT", Resolution::M1, 80).await.unwrap();

    assert_eq!(cache.inner().candle_calls(), 2);
    assert_eq!(more.len(), 80);
}

#[tokio::test]
async fn test_short_series_is_still_cached() {
    let provider = ScriptedProvider::new(&["NEWUSDT"]).with_all("NEWUSDT", rally(55));
    let cache = CachedMarketData::new(provider, Duration::from_secs(60));

    let first = cache.fetch_candles("NEWUSDT", Resolution::W1, 100).await.unwrap();
    cache.fetch_candles("NEWUSDT", Resolution::W1, 100).await;

    assert_eq!(first.len(), 55);
    assert_eq!(cache.inner().candle_calls(), 1);
}

#[tokio::test]
async fn test_entries_expire() {
    let cache = CachedMarketData::new(provider(), Duration::from_millis(40));

    cache.fetch_candles("BTCUSDT", Resolution::M15, 60).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    cache.fetch_candles("BTCUSDT", Resolution::M15, 60).await;

    assert_eq!(cache.inner().candle_calls(), 2);
}

#[tokio::test]
async fn test_instrument_list_is_cached() {
    let cache = CachedMarketData::new(provider(), Duration::from_secs(60));

    let first = cache.list_instruments().await.unwrap();
    let second = cache.list_instruments().await.unwrap();

    assert_eq!(first, vec!["BTCUSDT", "ETHUSDT"]);
    assert_eq!(first, second);
    assert_eq!(cache.inner().list_calls(), 1);

    cache.clear().await;
    cache.list_instruments().await.unwrap();
    assert_eq!(cache.inner().list_calls(), 2);
}

#[tokio::test]
async fn test_empty_or_failed_listing_is_not_cached() {
    let empty = CachedMarketData::new(ScriptedProvider::new(&[]), Duration::from_secs(60));
    assert!(empty.list_instruments().await.unwrap().is_empty());
    assert!(empty.list_instruments().await.unwrap().is_empty());
    assert_eq!(empty.inner().list_calls(), 2);

    let failing = CachedMarketData::new(ScriptedProvider::unlisted(), Duration::from_secs(60));
    assert!(failing.list_instruments().await.is_err());
    assert!(failing.list_instruments().await.is_err());
    assert_eq!(failing.inner().list_calls(), 2);
}
