use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::signal::{Rank, RankedSignal};

/// Complete output of one scan cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub neutral_count: usize,
    pub top_setups: Vec<RankedSignal>,
    /// Instruments in the universe for this cycle.
    pub scanned: usize,
    /// Instruments dropped for missing or short candle data.
    pub skipped: usize,
    pub completed_at: DateTime<Utc>,
}

impl MarketSummary {
    pub fn total_ranked(&self) -> usize {
        self.top_setups.len()
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.top_setups.iter().filter(|s| s.rank == rank).count()
    }

    pub fn is_empty(&self) -> bool {
        self.top_setups.is_empty()
    }
}
