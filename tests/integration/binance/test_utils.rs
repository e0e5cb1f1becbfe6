//! Mocked Binance futures and spot upstreams

use std::time::Duration;

use confluex::models::indicators::Candle;
use confluex::services::{BinanceMarketData, RetryPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FUTURES_INFO: &str = "/fapi/v1/exchangeInfo";
pub const FUTURES_KLINES: &str = "/fapi/v1/klines";
pub const SPOT_INFO: &str = "/api/v3/exchangeInfo";
pub const SPOT_KLINES: &str = "/api/v3/klines";

pub struct MockBinance {
    pub futures: MockServer,
    pub spot: MockServer,
}

impl MockBinance {
    pub async fn start() -> Self {
        Self {
            futures: MockServer::start().await,
            spot: MockServer::start().await,
        }
    }

    /// Provider with a short two-attempt retry budget.
    pub fn provider(&self) -> BinanceMarketData {
        BinanceMarketData::with_client(
            reqwest::Client::new(),
            &self.futures.uri(),
            &self.spot.uri(),
            "usdt",
            RetryPolicy::new(2, Duration::from_millis(1)),
        )
        .expect("valid mock urls")
    }

    pub async fn respond(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    pub async fn requests_to(server: &MockServer, route: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.url.path() == route)
            .count()
    }
}

pub fn futures_exchange_info() -> Value {
    json!({
        "timezone": "UTC",
        "symbols": [
            { "symbol": "ETHUSDT", "status": "TRADING", "quoteAsset": "USDT", "contractType": "PERPETUAL" },
            { "symbol": "BTCUSDT", "status": "TRADING", "quoteAsset": "USDT", "contractType": "PERPETUAL" },
            { "symbol": "BTCUSDT_240628", "status": "TRADING", "quoteAsset": "USDT", "contractType": "CURRENT_QUARTER" },
            { "symbol": "LUNAUSDT", "status": "SETTLING", "quoteAsset": "USDT", "contractType": "PERPETUAL" },
            { "symbol": "BTCUSDC", "status": "TRADING", "quoteAsset": "USDC", "contractType": "PERPETUAL" }
        ]
    })
}

pub fn spot_exchange_info() -> Value {
    json!({
        "symbols": [
            { "symbol": "SOLUSDT", "status": "TRADING", "quoteAsset": "USDT" },
            { "symbol": "ETHBTC", "status": "TRADING", "quoteAsset": "BTC" },
            { "symbol": "ADAUSDT", "status": "BREAK", "quoteAsset": "USDT" }
        ]
    })
}

/// Klines payload in Binance's array-of-arrays shape, prices as strings.
pub fn kline_rows(candles: &[Candle]) -> Value {
    let rows: Vec<Value> = candles
        .iter()
        .map(|c| {
            let open_time = c.time.timestamp_millis();
            json!([
                open_time,
                c.open.to_string(),
                c.high.to_string(),
                c.low.to_string(),
                c.close.to_string(),
                "1000.0",
                open_time + 59_999,
                "0",
                100,
                "0",
                "0",
                "0"
            ])
        })
        .collect();
    Value::Array(rows)
}
