//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binary. Unparseable values fall back to their defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_FUTURES_URL: &str = "https://fapi.binance.com";
pub const DEFAULT_SPOT_URL: &str = "https://api.binance.com";

/// Deployment environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = key, value = %raw, "Invalid value for {}, using default", key);
                default
            }
        },
        Err(_) => default,
    }
}

/// Like [`env_or`] for settings with no default; unset or invalid is `None`.
fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, "Invalid value for {}, ignoring", key);
            None
        }
    }
}

/// Upstream endpoints and retry settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub futures_url: String,
    pub spot_url: String,
    pub quote_asset: String,
    pub retry_max_attempts: usize,
    pub retry_min_delay: Duration,
    pub cache_ttl: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            futures_url: DEFAULT_FUTURES_URL.to_string(),
            spot_url: DEFAULT_SPOT_URL.to_string(),
            quote_asset: "USDT".to_string(),
            retry_max_attempts: 3,
            retry_min_delay: Duration::from_millis(200),
            cache_ttl: Duration::from_secs(60),
        }
    }
}

/// Batch scheduling knobs for the scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub candle_limit: usize,
    pub max_symbols: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_delay: Duration::from_millis(300),
            candle_limit: 100,
            max_symbols: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    pub upstream: UpstreamConfig,
    pub scan: ScanConfig,
    /// 0 disables the health/metrics server.
    pub http_port: u16,
    pub scan_once: bool,
}

impl ScannerConfig {
    pub fn from_env() -> Self {
        let upstream_defaults = UpstreamConfig::default();
        let scan_defaults = ScanConfig::default();

        let upstream = UpstreamConfig {
            futures_url: env::var("BINANCE_FUTURES_URL").unwrap_or(upstream_defaults.futures_url),
            spot_url: env::var("BINANCE_SPOT_URL").unwrap_or(upstream_defaults.spot_url),
            quote_asset: env::var("QUOTE_ASSET").unwrap_or(upstream_defaults.quote_asset),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", upstream_defaults.retry_max_attempts),
            retry_min_delay: Duration::from_millis(env_or(
                "RETRY_MIN_DELAY_MS",
                upstream_defaults.retry_min_delay.as_millis() as u64,
            )),
            cache_ttl: Duration::from_secs(env_or(
                "CACHE_TTL_SECONDS",
                upstream_defaults.cache_ttl.as_secs(),
            )),
        };

        let scan = ScanConfig {
            batch_size: env_or("SCAN_BATCH_SIZE", scan_defaults.batch_size).max(1),
            batch_delay: Duration::from_millis(env_or(
                "SCAN_BATCH_DELAY_MS",
                scan_defaults.batch_delay.as_millis() as u64,
            )),
            candle_limit: env_or("CANDLE_LIMIT", scan_defaults.candle_limit),
            max_symbols: env_opt("MAX_SYMBOLS"),
        };

        Self {
            upstream,
            scan,
            http_port: env_or("HTTP_PORT", 8080),
            scan_once: env_or("SCAN_ONCE", false),
        }
    }
}
