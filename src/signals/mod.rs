//! Signal classification and cross-timeframe ranking.

pub mod confluence;
pub mod engine;
pub mod scoring;

pub use confluence::{assign_rank, band_verdict, rank, sort_setups};
pub use engine::{SignalEngine, MIN_CANDLES};
pub use scoring::{ScoreBreakdown, ScoreContribution, SignalThresholds};
