use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete per-resolution classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalValue {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl SignalValue {
    pub fn is_bullish(self) -> bool {
        matches!(self, SignalValue::StrongBuy | SignalValue::Buy)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, SignalValue::StrongSell | SignalValue::Sell)
    }

    pub fn is_strong(self) -> bool {
        matches!(self, SignalValue::StrongBuy | SignalValue::StrongSell)
    }

    /// Side this signal leans to, `None` for neutral.
    pub fn side(self) -> Option<Side> {
        if self.is_bullish() {
            Some(Side::Buy)
        } else if self.is_bearish() {
            Some(Side::Sell)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalValue::StrongBuy => "STRONG_BUY",
            SignalValue::Buy => "BUY",
            SignalValue::Neutral => "NEUTRAL",
            SignalValue::Sell => "SELL",
            SignalValue::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bullish or bearish, without strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn signal(self, strong: bool) -> SignalValue {
        match (self, strong) {
            (Side::Buy, true) => SignalValue::StrongBuy,
            (Side::Buy, false) => SignalValue::Buy,
            (Side::Sell, true) => SignalValue::StrongSell,
            (Side::Sell, false) => SignalValue::Sell,
        }
    }
}

/// Aggregate lean of one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
    Neutral,
    Mixed,
}

impl Direction {
    pub fn side(self) -> Option<Side> {
        match self {
            Direction::Buy => Some(Side::Buy),
            Direction::Sell => Some(Side::Sell),
            Direction::Neutral | Direction::Mixed => None,
        }
    }
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => Direction::Buy,
            Side::Sell => Direction::Sell,
        }
    }
}

/// Confluence tier. Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
}

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::APlus, Rank::A, Rank::BPlus];

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::APlus => "A+",
            Rank::A => "A",
            Rank::BPlus => "B+",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict over the four signals of one band.
///
/// `dissent_signal` is the minority side; `None` when the band has no
/// non-neutral signals or is split evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandVerdict {
    pub direction: Direction,
    pub is_unanimous: bool,
    pub dissent_count: usize,
    pub dissent_signal: Option<Side>,
    pub neutral_count: usize,
}

/// Ranked per-instrument scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSignal {
    pub symbol: String,
    pub lower_band_direction: Direction,
    pub higher_band_direction: Direction,
    pub composite_signal: SignalValue,
    pub rank: Rank,
}
