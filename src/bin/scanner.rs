//! Confluex Scanner
//!
//! Scans the Binance instrument universe on an adaptive cadence and exposes
//! health and Prometheus metrics over HTTP.

use confluex::config::ScannerConfig;
use confluex::core::http::{start_server, AppState};
use confluex::core::scanner::{ScanProgress, Scanner};
use confluex::core::scheduler::ScanScheduler;
use confluex::logging;
use confluex::metrics::Metrics;
use confluex::services::market_data::MarketDataProvider;
use confluex::services::{BinanceMarketData, CachedMarketData};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = ScannerConfig::from_env();
    let env = confluex::config::get_environment();
    info!("Starting Confluex Scanner");
    info!(environment = %env, "Environment");
    info!(
        futures_url = %config.upstream.futures_url,
        spot_url = %config.upstream.spot_url,
        quote_asset = %config.upstream.quote_asset,
        batch_size = config.scan.batch_size,
        batch_delay_ms = config.scan.batch_delay.as_millis() as u64,
        "Upstream: {} (fallback {})",
        config.upstream.futures_url,
        config.upstream.spot_url
    );

    let metrics = Arc::new(Metrics::new()?);

    let binance = BinanceMarketData::new(&config.upstream)?;
    let provider: Arc<dyn MarketDataProvider + Send + Sync> =
        Arc::new(CachedMarketData::new(binance, config.upstream.cache_ttl));

    let scanner = Arc::new(Scanner::new(
        provider,
        config.scan.clone(),
        Some(metrics.clone()),
    ));

    if config.scan_once {
        let log_progress = |p: &ScanProgress| {
            debug!(
                completed = p.completed,
                total = p.total,
                symbol = %p.current_symbol,
                "Progress {}/{} ({})",
                p.completed,
                p.total,
                p.current_symbol
            );
        };
        let cycle = scanner.run_cycle(Some(&log_progress)).await?;
        println!("{}", serde_json::to_string_pretty(&cycle.summary)?);
        return Ok(());
    }

    let server = if config.http_port > 0 {
        let state = AppState::new(metrics.clone(), scanner.status(), scanner.latest_summary());
        let port = config.http_port;
        Some(tokio::spawn(async move {
            if let Err(e) = start_server(state, port).await {
                error!(error = %e, "HTTP server failed: {}", e);
            }
        }))
    } else {
        info!("HTTP_PORT is 0, health and metrics server disabled");
        None
    };

    let scheduler = ScanScheduler::new(scanner);
    scheduler.start().await;

    info!("Scanner started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down scanner...");
    scheduler.stop().await;
    if let Some(handle) = server {
        handle.abort();
    }
    info!("Scanner stopped");

    Ok(())
}
