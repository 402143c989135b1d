//! Moving-average intersection prediction.
//!
//! Solves for the next close `x` at which MA(w1) and MA(w2) become equal:
//!
//! (S1 + x) / w1 = (S2 + x) / w2
//! x = (w1 * S2 - w2 * S1) / (w2 - w1)
//!
//! where S1 and S2 are the sums of the most recent `w1 - 1` and `w2 - 1`
//! closes. Run after the close to predict tomorrow's crossing price, or with
//! data up to yesterday to predict today's.

use chrono::NaiveDate;

use crate::domain::error::MacrossError;
use crate::domain::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionResult {
    pub predicted_price: f64,
    /// Index of the last record used, within the untruncated series.
    pub as_of_index: usize,
    pub as_of_date: NaiveDate,
    pub window1: usize,
    pub window2: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionDifference {
    pub predicted_price: f64,
    pub last_close: f64,
    pub difference: f64,
    pub difference_percent: f64,
}

fn tail_sum(closes: &[f64], count: usize) -> f64 {
    closes[closes.len() - count..].iter().sum()
}

fn resolve(series: &PriceSeries, as_of: Option<NaiveDate>) -> Result<PriceSeries, MacrossError> {
    match as_of {
        Some(date) => series.truncate_to(date),
        None => Ok(series.clone()),
    }
}

fn check_windows(window1: usize, window2: usize) -> Result<(), MacrossError> {
    if window1 == 0 || window2 == 0 {
        return Err(MacrossError::invalid("moving average window must be at least 1"));
    }
    if window1 == window2 {
        return Err(MacrossError::invalid(format!(
            "intersection needs two different windows, got {} twice",
            window1
        )));
    }
    Ok(())
}

fn predict_on(
    series: &PriceSeries,
    window1: usize,
    window2: usize,
) -> Result<IntersectionResult, MacrossError> {
    let need = window1.max(window2) - 1;
    let closes = series.closes();
    let last = match series.bars().last() {
        Some(bar) if closes.len() >= need => bar,
        _ => {
            return Err(MacrossError::InsufficientData {
                have: closes.len(),
                need: need.max(1),
            });
        }
    };

    let sum1 = tail_sum(&closes, window1 - 1);
    let sum2 = tail_sum(&closes, window2 - 1);
    let w1 = window1 as f64;
    let w2 = window2 as f64;
    let predicted_price = (w1 * sum2 - w2 * sum1) / (w2 - w1);

    tracing::debug!(
        window1,
        window2,
        sum1,
        sum2,
        predicted_price,
        as_of = %last.date,
        "predicted intersection"
    );

    Ok(IntersectionResult {
        predicted_price,
        as_of_index: closes.len() - 1,
        as_of_date: last.date,
        window1,
        window2,
    })
}

/// Predict the close at which MA(`window1`) and MA(`window2`) next meet,
/// using records dated on or before `as_of` when given.
pub fn predict(
    series: &PriceSeries,
    window1: usize,
    window2: usize,
    as_of: Option<NaiveDate>,
) -> Result<IntersectionResult, MacrossError> {
    check_windows(window1, window2)?;
    let truncated = resolve(series, as_of)?;
    predict_on(&truncated, window1, window2)
}

/// Distance from the latest close to the predicted intersection price,
/// absolute and as a fraction of the latest close.
pub fn difference(
    series: &PriceSeries,
    window1: usize,
    window2: usize,
    as_of: Option<NaiveDate>,
) -> Result<IntersectionDifference, MacrossError> {
    check_windows(window1, window2)?;
    let truncated = resolve(series, as_of)?;
    let result = predict_on(&truncated, window1, window2)?;
    let last_close = truncated.last_close().ok_or(MacrossError::InsufficientData {
        have: 0,
        need: 1,
    })?;
    if last_close == 0.0 {
        return Err(MacrossError::invalid("latest close is zero"));
    }

    Ok(IntersectionDifference {
        predicted_price: result.predicted_price,
        last_close,
        difference: result.predicted_price - last_close,
        difference_percent: result.predicted_price / last_close - 1.0,
    })
}
