//! Cross-timeframe confluence ranking.
//!
//! Each band (four fast, four slow resolutions) is reduced to a
//! [`BandVerdict`]; the pair of verdicts is then matched against the rank
//! rules in priority order:
//!
//! 1. `A+`: both bands unanimous in the same direction with no neutral entries.
//! 2. `A`: one band unanimous, the other has exactly one dissenting signal and
//!    its dissent is not opposite to the unanimous direction.
//! 3. `B+`: one band unanimous, the other has no dissent and at least one
//!    neutral entry.
//!
//! For rules 2 and 3 the Higher band is tried as the unanimous band first.
//! The composite is upgraded to `STRONG_*` when 1h or 4h is strong.

use std::cmp::Ordering;

use crate::models::resolution::{Band, Resolution, ResolutionSignals};
use crate::models::signal::{BandVerdict, Direction, Rank, RankedSignal, Side, SignalValue};

/// Reduce one band's signals to a verdict.
pub fn band_verdict(signals: &ResolutionSignals, band: Band) -> BandVerdict {
    verdict_of(&signals.band(band))
}

fn verdict_of(band: &[SignalValue]) -> BandVerdict {
    let bullish = band.iter().filter(|s| s.is_bullish()).count();
    let bearish = band.iter().filter(|s| s.is_bearish()).count();
    let non_neutral = bullish + bearish;
    let neutral_count = band.len() - non_neutral;

    if non_neutral == 0 {
        return BandVerdict {
            direction: Direction::Neutral,
            is_unanimous: false,
            dissent_count: 0,
            dissent_signal: None,
            neutral_count,
        };
    }

    let direction = if bearish == 0 {
        Direction::Buy
    } else if bullish == 0 {
        Direction::Sell
    } else {
        Direction::Mixed
    };

    let dissent_signal = match bullish.cmp(&bearish) {
        Ordering::Greater => Some(Side::Sell),
        Ordering::Less => Some(Side::Buy),
        Ordering::Equal => None,
    };

    BandVerdict {
        direction,
        is_unanimous: bullish == 0 || bearish == 0,
        dissent_count: bullish.min(bearish),
        dissent_signal,
        neutral_count,
    }
}

/// Side of a band that is unanimous and leaning somewhere.
fn unanimous_side(verdict: &BandVerdict) -> Option<Side> {
    if verdict.is_unanimous {
        verdict.direction.side()
    } else {
        None
    }
}

fn is_full_agreement(lower: &BandVerdict, higher: &BandVerdict) -> Option<Side> {
    let side = unanimous_side(lower)?;
    let agrees = unanimous_side(higher) == Some(side)
        && lower.neutral_count == 0
        && higher.neutral_count == 0;
    agrees.then_some(side)
}

fn single_compatible_dissent(unanimous: &BandVerdict, other: &BandVerdict) -> Option<Side> {
    let side = unanimous_side(unanimous)?;
    let compatible = other.dissent_count == 1
        && other
            .dissent_signal
            .is_some_and(|dissent| dissent != side.opposite());
    compatible.then_some(side)
}

fn quiet_agreement(unanimous: &BandVerdict, other: &BandVerdict) -> Option<Side> {
    let side = unanimous_side(unanimous)?;
    (other.dissent_count == 0 && other.neutral_count >= 1).then_some(side)
}

/// Rank tier and winning side for a pair of band verdicts.
pub fn assign_rank(lower: &BandVerdict, higher: &BandVerdict) -> Option<(Rank, Side)> {
    if let Some(side) = is_full_agreement(lower, higher) {
        return Some((Rank::APlus, side));
    }

    if let Some(side) = single_compatible_dissent(higher, lower)
        .or_else(|| single_compatible_dissent(lower, higher))
    {
        return Some((Rank::A, side));
    }

    quiet_agreement(higher, lower)
        .or_else(|| quiet_agreement(lower, higher))
        .map(|side| (Rank::BPlus, side))
}

/// Resolutions whose strong readings upgrade the composite signal.
pub const STRONG_CONFIRMATION: [Resolution; 2] = [Resolution::H1, Resolution::H4];

/// True when 1h or 4h reports a strong signal, on either side.
fn has_strong_confirmation(signals: &ResolutionSignals) -> bool {
    STRONG_CONFIRMATION
        .iter()
        .any(|&resolution| signals[resolution].is_strong())
}

/// Rank one instrument; `None` when no rule matches.
pub fn rank(symbol: &str, signals: &ResolutionSignals) -> Option<RankedSignal> {
    let lower = band_verdict(signals, Band::Lower);
    let higher = band_verdict(signals, Band::Higher);

    let (rank, side) = assign_rank(&lower, &higher)?;
    let composite_signal = side.signal(has_strong_confirmation(signals));

    Some(RankedSignal {
        symbol: symbol.to_string(),
        lower_band_direction: lower.direction,
        higher_band_direction: higher.direction,
        composite_signal,
        rank,
    })
}

/// Presentation order: rank tier, then symbol.
pub fn compare_setups(a: &RankedSignal, b: &RankedSignal) -> Ordering {
    a.rank.cmp(&b.rank).then_with(|| a.symbol.cmp(&b.symbol))
}

pub fn sort_setups(setups: &mut [RankedSignal]) {
    setups.sort_by(compare_setups);
}
