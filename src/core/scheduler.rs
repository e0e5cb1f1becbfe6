//! Adaptive scheduler that drives scan cycles

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::core::cadence::{EARLY_RESCAN_DELAY, FAILURE_RETRY_INTERVAL};
use crate::core::scanner::{ScanCycle, Scanner};
use crate::error::{ScanError, ScanResult};

/// Delay before the next cycle given how the last one went.
pub fn delay_after(result: &ScanResult<ScanCycle>) -> Duration {
    match result {
        Ok(cycle) if cycle.early_rescan => EARLY_RESCAN_DELAY.min(cycle.next_interval),
        Ok(cycle) => cycle.next_interval,
        Err(ScanError::UpstreamUnavailable(_)) => FAILURE_RETRY_INTERVAL,
        Err(ScanError::ScanInProgress) => EARLY_RESCAN_DELAY,
    }
}

/// Runs a scan, applies the cadence recommendation, sleeps, repeats.
pub struct ScanScheduler {
    scanner: Arc<Scanner>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    pub fn new(scanner: Arc<Scanner>) -> Self {
        Self {
            scanner,
            handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Start the loop; the first cycle runs immediately.
    pub async fn start(&self) {
        let mut handle = self.handle.write().await;
        if handle.is_some() {
            warn!("ScanScheduler: already running");
            return;
        }

        let scanner = self.scanner.clone();
        *handle = Some(tokio::spawn(async move {
            info!("ScanScheduler: started");

            loop {
                let result = scanner.run_cycle(None).await;
                let delay = delay_after(&result);

                match &result {
                    Ok(cycle) if cycle.early_rescan => {
                        info!(
                            flips = cycle.flips,
                            delay_secs = delay.as_secs(),
                            "ScanScheduler: {} setups flipped, rescanning in {}s",
                            cycle.flips,
                            delay.as_secs()
                        );
                    }
                    Ok(cycle) => {
                        info!(
                            setups = cycle.summary.total_ranked(),
                            delay_secs = delay.as_secs(),
                            "ScanScheduler: next scan in {}s",
                            delay.as_secs()
                        );
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            delay_secs = delay.as_secs(),
                            "ScanScheduler: cycle failed, retrying in {}s: {}",
                            delay.as_secs(),
                            e
                        );
                    }
                }

                tokio::time::sleep(delay).await;
            }
        }));
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
