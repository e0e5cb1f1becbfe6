//! Batched scan orchestrator
//!
//! Drives the classifier and confluence ranker over the whole instrument
//! universe. Instruments are processed in fixed-size batches: everything
//! inside a batch runs concurrently (all eight resolutions of every
//! instrument), batches run one after another with a fixed delay in between.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::ScanConfig;
use crate::core::cadence::{count_flips, next_interval, should_rescan_early};
use crate::error::{ScanError, ScanResult};
use crate::metrics::Metrics;
use crate::models::resolution::{Resolution, ResolutionSignals, RESOLUTION_COUNT};
use crate::models::signal::{RankedSignal, SignalValue};
use crate::models::summary::MarketSummary;
use crate::services::market_data::MarketDataProvider;
use crate::signals::confluence;
use crate::signals::engine::{SignalEngine, MIN_CANDLES};

/// Emitted once per finished instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
    pub current_symbol: String,
}

pub type ProgressCallback<'a> = dyn Fn(&ScanProgress) + Send + Sync + 'a;

/// Observable scanner state, shared with the HTTP health endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStatus {
    pub scanning: bool,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub last_setups: usize,
    pub last_error: Option<String>,
}

/// Result of a scheduled cycle: the summary plus the cadence recommendation.
#[derive(Debug, Clone)]
pub struct ScanCycle {
    pub summary: MarketSummary,
    /// Instruments whose rank or side changed since the previous cycle.
    pub flips: usize,
    pub next_interval: Duration,
    pub early_rescan: bool,
}

/// What happened to one instrument in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentOutcome {
    Ranked(RankedSignal),
    /// Complete data, but no rank rule matched.
    Unranked,
    /// A resolution was missing or too short.
    Skipped,
}

/// Clears the in-progress flag when dropped, whatever way the scan ends.
struct ScanGuard<'a>(&'a AtomicBool);

impl<'a> ScanGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ScanResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::ScanInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Scanner {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    config: ScanConfig,
    metrics: Option<Arc<Metrics>>,
    in_progress: AtomicBool,
    previous: RwLock<Option<Vec<RankedSignal>>>,
    status: Arc<RwLock<ScanStatus>>,
    latest: Arc<RwLock<Option<MarketSummary>>>,
}

impl Scanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        config: ScanConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            provider,
            config,
            metrics,
            in_progress: AtomicBool::new(false),
            previous: RwLock::new(None),
            status: Arc::new(RwLock::new(ScanStatus::default())),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn is_scanning(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub fn status(&self) -> Arc<RwLock<ScanStatus>> {
        self.status.clone()
    }

    /// Summary of the last successful scan, shared with the HTTP server.
    pub fn latest_summary(&self) -> Arc<RwLock<Option<MarketSummary>>> {
        self.latest.clone()
    }

    /// Ranked list of the last cycle run through [`Scanner::run_cycle`].
    pub async fn previous_setups(&self) -> Option<Vec<RankedSignal>> {
        self.previous.read().await.clone()
    }

    /// List the universe and scan it.
    ///
    /// Fails with [`ScanError::UpstreamUnavailable`] when the listing fails or
    /// is empty, and with [`ScanError::ScanInProgress`] when another scan is
    /// running.
    pub async fn scan(&self, progress: Option<&ProgressCallback<'_>>) -> ScanResult<MarketSummary> {
        let _guard = ScanGuard::acquire(&self.in_progress)?;
        self.set_scanning(true).await;

        let result = match self.list_universe().await {
            Ok(symbols) => Ok(self.scan_batches(&symbols, progress).await),
            Err(e) => Err(e),
        };

        self.finish(&result).await;
        result
    }

    /// Scan a caller-supplied universe.
    pub async fn scan_symbols(
        &self,
        symbols: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> ScanResult<MarketSummary> {
        let _guard = ScanGuard::acquire(&self.in_progress)?;
        self.set_scanning(true).await;

        let result = if symbols.is_empty() {
            Err(ScanError::UpstreamUnavailable(
                "instrument universe is empty".to_string(),
            ))
        } else {
            Ok(self.scan_batches(symbols, progress).await)
        };

        self.finish(&result).await;
        result
    }

    /// One scheduled cycle: scan, compare with the previous cycle, then
    /// replace the stored snapshot.
    pub async fn run_cycle(&self, progress: Option<&ProgressCallback<'_>>) -> ScanResult<ScanCycle> {
        let summary = self.scan(progress).await?;

        let flips = {
            let previous = self.previous.read().await;
            previous
                .as_deref()
                .map(|before| count_flips(before, &summary.top_setups))
                .unwrap_or(0)
        };
        *self.previous.write().await = Some(summary.top_setups.clone());

        let early_rescan = should_rescan_early(flips);
        let next_interval = next_interval(&summary);

        info!(
            flips = flips,
            early_rescan = early_rescan,
            next_interval_secs = next_interval.as_secs(),
            "Scanner: {} flips since last cycle, next scan in {}s",
            flips,
            next_interval.as_secs()
        );

        Ok(ScanCycle {
            summary,
            flips,
            next_interval,
            early_rescan,
        })
    }

    async fn list_universe(&self) -> ScanResult<Vec<String>> {
        let mut symbols = self.provider.list_instruments().await.map_err(|e| {
            error!(error = %e, "Scanner: failed to list instruments: {}", e);
            ScanError::UpstreamUnavailable(e.to_string())
        })?;

        if symbols.is_empty() {
            warn!("Scanner: upstream listed no tradable instruments");
            return Err(ScanError::UpstreamUnavailable(
                "no tradable instruments listed".to_string(),
            ));
        }

        if let Some(max) = self.config.max_symbols {
            symbols.truncate(max);
        }
        Ok(symbols)
    }

    async fn scan_batches(
        &self,
        symbols: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> MarketSummary {
        let started = Instant::now();
        let total = symbols.len();
        let batch_size = self.config.batch_size.max(1);
        let limit = self.config.candle_limit;

        info!(
            total = total,
            batch_size = batch_size,
            "Scanner: starting scan of {} instruments",
            total
        );

        let mut setups = Vec::new();
        let mut skipped = 0;
        let mut completed = 0;

        for (index, batch) in symbols.chunks(batch_size).enumerate() {
            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            let provider = self.provider.as_ref();
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|symbol| evaluate_instrument(provider, symbol, limit)),
            )
            .await;

            for (symbol, outcome) in batch.iter().zip(outcomes) {
                completed += 1;
                match outcome {
                    InstrumentOutcome::Ranked(setup) => setups.push(setup),
                    InstrumentOutcome::Unranked => {}
                    InstrumentOutcome::Skipped => skipped += 1,
                }
                if let Some(callback) = progress {
                    callback(&ScanProgress {
                        completed,
                        total,
                        current_symbol: symbol.clone(),
                    });
                }
            }
        }

        let summary = summarize(setups, total, skipped);
        let elapsed = started.elapsed();

        if let Some(metrics) = &self.metrics {
            metrics.record_summary(&summary);
            metrics.scan_duration_seconds.observe(elapsed.as_secs_f64());
        }

        info!(
            total = total,
            ranked = summary.total_ranked(),
            skipped = skipped,
            bullish = summary.bullish_count,
            bearish = summary.bearish_count,
            duration_ms = elapsed.as_millis() as u64,
            "Scanner: scan complete, {} ranked setups out of {} instruments",
            summary.total_ranked(),
            total
        );

        summary
    }

    async fn set_scanning(&self, scanning: bool) {
        self.status.write().await.scanning = scanning;
    }

    async fn finish(&self, result: &ScanResult<MarketSummary>) {
        if let Ok(summary) = result {
            *self.latest.write().await = Some(summary.clone());
        }

        let mut status = self.status.write().await;
        status.scanning = false;
        match result {
            Ok(summary) => {
                status.last_scan_at = Some(summary.completed_at);
                status.last_setups = summary.total_ranked();
                status.last_error = None;
            }
            Err(e) => {
                status.last_error = Some(e.to_string());
                if let Some(metrics) = &self.metrics {
                    metrics.scan_failures_total.inc();
                }
            }
        }
    }
}

/// Fetch every resolution concurrently, classify, then rank.
///
/// Any missing or short resolution excludes the instrument; it is never
/// padded with a neutral placeholder.
pub async fn evaluate_instrument(
    provider: &(dyn MarketDataProvider + Send + Sync),
    symbol: &str,
    limit: usize,
) -> InstrumentOutcome {
    let fetches = Resolution::ALL.map(|resolution| async move {
        let candles = provider.fetch_candles(symbol, resolution, limit).await;
        (resolution, candles)
    });

    let mut signals: [Option<SignalValue>; RESOLUTION_COUNT] = [None; RESOLUTION_COUNT];
    for (resolution, candles) in join_all(fetches).await {
        match candles {
            Some(candles) if candles.len() >= MIN_CANDLES => {
                signals[resolution.index()] = Some(SignalEngine::classify(&candles));
            }
            Some(candles) => {
                debug!(
                    symbol = %symbol,
                    resolution = %resolution,
                    count = candles.len(),
                    min = MIN_CANDLES,
                    "Scanner: insufficient history for {} {} ({} < {})",
                    symbol,
                    resolution,
                    candles.len(),
                    MIN_CANDLES
                );
            }
            None => {
                debug!(
                    symbol = %symbol,
                    resolution = %resolution,
                    "Scanner: no candles for {} {}",
                    symbol,
                    resolution
                );
            }
        }
    }

    let Some(signals) = ResolutionSignals::from_partial(signals) else {
        return InstrumentOutcome::Skipped;
    };

    match confluence::rank(symbol, &signals) {
        Some(setup) => {
            debug!(
                symbol = %symbol,
                rank = %setup.rank,
                signal = %setup.composite_signal,
                "Scanner: ranked {} {} {}",
                symbol,
                setup.rank,
                setup.composite_signal
            );
            InstrumentOutcome::Ranked(setup)
        }
        None => InstrumentOutcome::Unranked,
    }
}

/// Tally and order a cycle's setups.
pub fn summarize(mut setups: Vec<RankedSignal>, scanned: usize, skipped: usize) -> MarketSummary {
    confluence::sort_setups(&mut setups);

    let bullish_count = setups
        .iter()
        .filter(|s| s.composite_signal.is_bullish())
        .count();
    let bearish_count = setups
        .iter()
        .filter(|s| s.composite_signal.is_bearish())
        .count();
    let neutral_count = setups.len() - bullish_count - bearish_count;

    MarketSummary {
        bullish_count,
        bearish_count,
        neutral_count,
        top_setups: setups,
        scanned,
        skipped,
        completed_at: Utc::now(),
    }
}
