//! Adaptive scan cadence and cross-cycle change detection.
//!
//! Everything here is a pure function of scan output. The scheduler decides
//! whether to apply the recommendation.

use std::collections::HashMap;
use std::time::Duration;

use crate::models::signal::{Rank, RankedSignal, Side};
use crate::models::summary::MarketSummary;

pub const FAST_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const ACTIVE_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const STEADY_INTERVAL: Duration = Duration::from_secs(15 * 60);
pub const IDLE_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub const HIGH_CONFIDENCE: f64 = 0.30;
pub const MODERATE_CONFIDENCE: f64 = 0.15;
pub const HIGH_VOLATILITY: f64 = 0.40;
pub const MODERATE_VOLATILITY: f64 = 0.20;

/// More flips than this between consecutive cycles triggers an early rescan.
pub const EARLY_RESCAN_THRESHOLD: usize = 3;
pub const EARLY_RESCAN_DELAY: Duration = Duration::from_secs(60);
/// Wait after a cycle that could not list the universe.
pub const FAILURE_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// `|bullish - bearish| / ranked`, 0 for an empty summary.
pub fn volatility(summary: &MarketSummary) -> f64 {
    let total = summary.total_ranked();
    if total == 0 {
        return 0.0;
    }
    summary.bullish_count.abs_diff(summary.bearish_count) as f64 / total as f64
}

/// Share of ranked setups that reached `A+`.
pub fn confidence(summary: &MarketSummary) -> f64 {
    let total = summary.total_ranked();
    if total == 0 {
        return 0.0;
    }
    summary.count_rank(Rank::APlus) as f64 / total as f64
}

/// Recommended delay before the next scan.
pub fn next_interval(summary: &MarketSummary) -> Duration {
    if summary.is_empty() {
        return IDLE_INTERVAL;
    }

    let confidence = confidence(summary);
    let volatility = volatility(summary);

    if confidence > HIGH_CONFIDENCE {
        FAST_INTERVAL
    } else if confidence > MODERATE_CONFIDENCE || volatility > HIGH_VOLATILITY {
        ACTIVE_INTERVAL
    } else if volatility > MODERATE_VOLATILITY {
        STEADY_INTERVAL
    } else {
        IDLE_INTERVAL
    }
}

fn side_of(setup: &RankedSignal) -> Option<Side> {
    setup.composite_signal.side()
}

/// Instruments ranked in both cycles whose tier or side changed.
pub fn count_flips(previous: &[RankedSignal], current: &[RankedSignal]) -> usize {
    let before: HashMap<&str, &RankedSignal> =
        previous.iter().map(|s| (s.symbol.as_str(), s)).collect();

    current
        .iter()
        .filter(|now| {
            before
                .get(now.symbol.as_str())
                .is_some_and(|then| then.rank != now.rank || side_of(then) != side_of(now))
        })
        .count()
}

pub fn should_rescan_early(flips: usize) -> bool {
    flips > EARLY_RESCAN_THRESHOLD
}
