//! Crossing detection between two aligned moving-average series.
//!
//! # Signal Semantics
//!
//! - Index 0 is always 0 (no prior day)
//! - `+1`: `a` ends strictly above `b` after being at or below it the day before
//! - `-1`: `a` ends strictly below `b` after being at or above it the day before
//! - `0`: no crossing, or either day has an undefined value on either side
//!
//! A day where the two series touch is the reference for the next day:
//! `below, equal, above` reports one crossing on the third day, and so does
//! `above, equal, above`.

use crate::domain::error::MacrossError;
use crate::domain::indicator::MovingAverageSeries;
use crate::domain::indicator::sma::sma_of;
use crate::domain::price::PriceSeries;

pub type CrossingSignal = Vec<i8>;

fn spread(a: &MovingAverageSeries, b: &MovingAverageSeries, index: usize) -> Option<f64> {
    Some(a.get(index)? - b.get(index)?)
}

fn crossing_at(prev: Option<f64>, curr: Option<f64>) -> i8 {
    match (prev, curr) {
        (Some(p), Some(c)) if c > 0.0 && p <= 0.0 => 1,
        (Some(p), Some(c)) if c < 0.0 && p >= 0.0 => -1,
        _ => 0,
    }
}

pub fn detect(
    a: &MovingAverageSeries,
    b: &MovingAverageSeries,
) -> Result<CrossingSignal, MacrossError> {
    if a.len() != b.len() {
        return Err(MacrossError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut signals = Vec::with_capacity(a.len());
    let mut prev = None;
    for i in 0..a.len() {
        let curr = spread(a, b, i);
        signals.push(if i == 0 { 0 } else { crossing_at(prev, curr) });
        prev = curr;
    }
    Ok(signals)
}

/// Indices at which `a` and `b` cross in either direction.
pub fn crossing_indices(
    a: &MovingAverageSeries,
    b: &MovingAverageSeries,
) -> Result<Vec<usize>, MacrossError> {
    Ok(detect(a, b)?
        .iter()
        .enumerate()
        .filter(|(_, s)| **s != 0)
        .map(|(i, _)| i)
        .collect())
}

/// True iff the sign of `a - b` changed between the final two entries.
/// Either final entry being undefined means no crossing.
pub fn has_crossed_in_last_two_days(
    a: &MovingAverageSeries,
    b: &MovingAverageSeries,
) -> Result<bool, MacrossError> {
    if a.len() != b.len() {
        return Err(MacrossError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let n = a.len();
    if n < 2 {
        return Ok(false);
    }
    Ok(crossing_at(spread(a, b, n - 2), spread(a, b, n - 1)) != 0)
}

/// Whether MA(`window1`) and MA(`window2`) crossed on the latest day, using
/// only the last `2 * max(window1, window2)` closes.
pub fn cross_signal(
    series: &PriceSeries,
    window1: usize,
    window2: usize,
) -> Result<bool, MacrossError> {
    let closes = series.closes();
    let take = window1.max(window2).saturating_mul(2).min(closes.len());
    let tail = &closes[closes.len() - take..];
    let ma1 = sma_of(tail, window1)?;
    let ma2 = sma_of(tail, window2)?;
    let crossed = has_crossed_in_last_two_days(&ma1, &ma2)?;
    tracing::debug!(window1, window2, crossed, "latest crossing check");
    Ok(crossed)
}
