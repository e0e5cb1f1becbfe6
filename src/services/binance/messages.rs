//! Wire types for the Binance REST endpoints.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::models::indicators::Candle;

pub const FUTURES_EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
pub const FUTURES_KLINES_PATH: &str = "/fapi/v1/klines";
pub const SPOT_EXCHANGE_INFO_PATH: &str = "/api/v3/exchangeInfo";
pub const SPOT_KLINES_PATH: &str = "/api/v3/klines";

pub const PERPETUAL: &str = "PERPETUAL";
pub const TRADING: &str = "TRADING";

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub quote_asset: String,
    /// Only present on the futures endpoint.
    #[serde(default)]
    pub contract_type: Option<String>,
}

impl SymbolInfo {
    pub fn is_tradable_perpetual(&self, quote_asset: &str) -> bool {
        self.contract_type.as_deref() == Some(PERPETUAL) && self.is_tradable(quote_asset)
    }

    pub fn is_tradable(&self, quote_asset: &str) -> bool {
        self.status == TRADING && self.quote_asset.eq_ignore_ascii_case(quote_asset)
    }
}

/// Perpetual, trading contracts quoted in `quote_asset`, sorted.
pub fn perpetual_symbols(info: &ExchangeInfo, quote_asset: &str) -> Vec<String> {
    collect_symbols(info, |s| s.is_tradable_perpetual(quote_asset))
}

/// Trading spot pairs quoted in `quote_asset`, sorted.
pub fn spot_symbols(info: &ExchangeInfo, quote_asset: &str) -> Vec<String> {
    collect_symbols(info, |s| s.is_tradable(quote_asset))
}

fn collect_symbols(info: &ExchangeInfo, keep: impl Fn(&SymbolInfo) -> bool) -> Vec<String> {
    let mut symbols: Vec<String> = info
        .symbols
        .iter()
        .filter(|s| keep(s))
        .map(|s| s.symbol.clone())
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}

fn number_at(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Parse one kline row: `[openTime, open, high, low, close, volume, ...]`.
pub fn parse_kline_row(row: &Value) -> Option<Candle> {
    let row = row.as_array()?;
    let open_time = row.first()?.as_i64()?;
    let time = DateTime::from_timestamp_millis(open_time)?;

    let open = number_at(row, 1)?;
    let high = number_at(row, 2)?;
    let low = number_at(row, 3)?;
    let close = number_at(row, 4)?;

    if ![open, high, low, close].iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(Candle::new(open, high, low, close, time))
}

/// Parse a klines payload, dropping malformed rows. Oldest first.
pub fn parse_klines(rows: &[Value]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = rows.iter().filter_map(parse_kline_row).collect();
    candles.sort_by_key(|c| c.time);
    candles
}
