//! Simple Moving Average.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) entries have no value.

use std::collections::BTreeMap;

use super::MovingAverageSeries;
use crate::domain::error::MacrossError;
use crate::domain::price::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, window: usize) -> Result<MovingAverageSeries, MacrossError> {
    sma_of(&series.closes(), window)
}

/// SMA over a raw slice of closes, oldest first.
pub fn sma_of(closes: &[f64], window: usize) -> Result<MovingAverageSeries, MacrossError> {
    if window == 0 {
        return Err(MacrossError::invalid("moving average window must be at least 1"));
    }

    let values = (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = closes[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect();

    Ok(MovingAverageSeries { window, values })
}

/// One SMA per distinct window, keyed by window size.
pub fn calculate_many(
    series: &PriceSeries,
    windows: &[usize],
) -> Result<BTreeMap<usize, MovingAverageSeries>, MacrossError> {
    let closes = series.closes();
    let mut out = BTreeMap::new();
    for &window in windows {
        if !out.contains_key(&window) {
            out.insert(window, sma_of(&closes, window)?);
        }
    }
    Ok(out)
}
