//! Batch signal computation across a set of moving-average windows.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::crossing::{detect, CrossingSignal};
use crate::domain::error::MacrossError;
use crate::domain::indicator::sma::calculate_many;
use crate::domain::price::PriceSeries;

/// Unordered pair of distinct windows, stored shorter-first so `(3, 10)`
/// and `(10, 3)` are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowPair {
    short: usize,
    long: usize,
}

impl WindowPair {
    pub fn new(a: usize, b: usize) -> Result<Self, MacrossError> {
        if a == b {
            return Err(MacrossError::invalid(format!(
                "window pair needs two different windows, got {} twice",
                a
            )));
        }
        Ok(Self {
            short: a.min(b),
            long: a.max(b),
        })
    }

    pub fn short(&self) -> usize {
        self.short
    }

    pub fn long(&self) -> usize {
        self.long
    }
}

impl fmt::Display for WindowPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.short, self.long)
    }
}

/// Crossing signal per window pair. Each signal compares MA(short) against
/// MA(long): `+1` when the short average crosses above.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossingMatrix {
    signals: BTreeMap<WindowPair, CrossingSignal>,
}

impl CrossingMatrix {
    pub fn get(&self, pair: &WindowPair) -> Option<&CrossingSignal> {
        self.signals.get(pair)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &WindowPair> {
        self.signals.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WindowPair, &CrossingSignal)> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Signal at the final index for each pair.
    pub fn latest(&self) -> BTreeMap<WindowPair, i8> {
        self.signals
            .iter()
            .map(|(pair, s)| (*pair, s.last().copied().unwrap_or(0)))
            .collect()
    }
}

pub fn compute_crossing_matrix(
    series: &PriceSeries,
    windows: &[usize],
) -> Result<CrossingMatrix, MacrossError> {
    let mas = calculate_many(series, windows)?;
    let mut signals = BTreeMap::new();

    for (&w1, ma1) in &mas {
        for (&w2, ma2) in &mas {
            if w1 == w2 {
                continue;
            }
            let pair = WindowPair::new(w1, w2)?;
            if signals.contains_key(&pair) {
                continue;
            }
            let (short, long) = if w1 < w2 { (ma1, ma2) } else { (ma2, ma1) };
            let signal = detect(short, long)?;
            tracing::debug!(
                pair = %pair,
                crossings = signal.iter().filter(|s| **s != 0).count(),
                "computed crossing signal"
            );
            signals.insert(pair, signal);
        }
    }

    Ok(CrossingMatrix { signals })
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpDown {
    pub percent_changes: Vec<f64>,
    pub directions: Vec<i8>,
}

/// Day-over-day percent change and direction of the close. Index 0 is 0
/// for both; a zero previous close yields a 0 percent change.
pub fn compute_up_down(series: &PriceSeries) -> UpDown {
    let closes = series.closes();
    let mut percent_changes = Vec::with_capacity(closes.len());
    let mut directions = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            percent_changes.push(0.0);
            directions.push(0);
            continue;
        }
        let prev = closes[i - 1];
        percent_changes.push(if prev != 0.0 { close / prev - 1.0 } else { 0.0 });
        directions.push(if close > prev {
            1
        } else if close < prev {
            -1
        } else {
            0
        });
    }

    UpDown {
        percent_changes,
        directions,
    }
}
