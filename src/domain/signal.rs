//! Discrete per-row trading signals and the crossing-to-signal policy.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::MacrossError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Positive crossing buys, negative crossing sells.
    pub fn from_crossing(crossing: i8) -> Self {
        match crossing.signum() {
            1 => Signal::Buy,
            -1 => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}

pub fn signals_from_crossings(crossings: &[i8]) -> Vec<Signal> {
    crossings.iter().map(|&c| Signal::from_crossing(c)).collect()
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "-"),
        }
    }
}

impl FromStr for Signal {
    type Err = MacrossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Signal::Buy),
            "sell" => Ok(Signal::Sell),
            "-" | "" | "hold" => Ok(Signal::Hold),
            other => Err(MacrossError::invalid(format!("unknown signal '{}'", other))),
        }
    }
}
