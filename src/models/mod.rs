//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod resolution;
pub mod signal;
pub mod summary;

pub use indicators::{
    Candle, EmaIndicator, IndicatorSnapshot, MacdIndicator, RsiIndicator, SmaIndicator,
    StochasticIndicator,
};
pub use resolution::{Band, Resolution, ResolutionSignals, RESOLUTION_COUNT};
pub use signal::{BandVerdict, Direction, Rank, RankedSignal, Side, SignalValue};
pub use summary::MarketSummary;
