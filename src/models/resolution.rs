//! Candle resolutions and their static band membership.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use crate::models::signal::SignalValue;

/// Fast (Lower) or slow (Higher) group of resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Lower,
    Higher,
}

/// Candle aggregation period, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

pub const RESOLUTION_COUNT: usize = 8;

impl Resolution {
    pub const ALL: [Resolution; RESOLUTION_COUNT] = [
        Resolution::M1,
        Resolution::M5,
        Resolution::M15,
        Resolution::M30,
        Resolution::H1,
        Resolution::H4,
        Resolution::D1,
        Resolution::W1,
    ];

    pub const LOWER: [Resolution; 4] = [
        Resolution::M1,
        Resolution::M5,
        Resolution::M15,
        Resolution::M30,
    ];

    pub const HIGHER: [Resolution; 4] = [
        Resolution::H1,
        Resolution::H4,
        Resolution::D1,
        Resolution::W1,
    ];

    /// Position in [`Resolution::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn band(self) -> Band {
        match self {
            Resolution::M1 | Resolution::M5 | Resolution::M15 | Resolution::M30 => Band::Lower,
            Resolution::H1 | Resolution::H4 | Resolution::D1 | Resolution::W1 => Band::Higher,
        }
    }

    /// Interval label used by the upstream kline API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Resolution::M1 => "1m",
            Resolution::M5 => "5m",
            Resolution::M15 => "15m",
            Resolution::M30 => "30m",
            Resolution::H1 => "1h",
            Resolution::H4 => "4h",
            Resolution::D1 => "1d",
            Resolution::W1 => "1w",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Band {
    pub const fn resolutions(self) -> [Resolution; 4] {
        match self {
            Band::Lower => Resolution::LOWER,
            Band::Higher => Resolution::HIGHER,
        }
    }
}

/// One signal per resolution for a single instrument.
///
/// Only constructible fully populated, so a value of this type is always a
/// complete set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionSignals([SignalValue; RESOLUTION_COUNT]);

impl ResolutionSignals {
    pub fn new(signals: [SignalValue; RESOLUTION_COUNT]) -> Self {
        Self(signals)
    }

    /// Build from the two bands, each ordered finest to coarsest.
    pub fn from_bands(lower: [SignalValue; 4], higher: [SignalValue; 4]) -> Self {
        let mut signals = [SignalValue::Neutral; RESOLUTION_COUNT];
        signals[..4].copy_from_slice(&lower);
        signals[4..].copy_from_slice(&higher);
        Self(signals)
    }

    /// Returns `None` unless every resolution has a signal.
    pub fn from_partial(partial: [Option<SignalValue>; RESOLUTION_COUNT]) -> Option<Self> {
        let mut signals = [SignalValue::Neutral; RESOLUTION_COUNT];
        for (slot, value) in signals.iter_mut().zip(partial) {
            *slot = value?;
        }
        Some(Self(signals))
    }

    pub fn get(&self, resolution: Resolution) -> SignalValue {
        self.0[resolution.index()]
    }

    pub fn band(&self, band: Band) -> [SignalValue; 4] {
        band.resolutions().map(|r| self.get(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resolution, SignalValue)> + '_ {
        Resolution::ALL.iter().map(move |&r| (r, self.get(r)))
    }
}

impl Index<Resolution> for ResolutionSignals {
    type Output = SignalValue;

    fn index(&self, resolution: Resolution) -> &Self::Output {
        &self.0[resolution.index()]
    }
}
