//! Per-day table merging closes, up/down signals and crossing columns.

use chrono::NaiveDate;

use super::batch::{CrossingMatrix, UpDown, WindowPair};
use super::error::MacrossError;
use super::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalTableRow {
    pub date: NaiveDate,
    pub close: f64,
    pub percent_change: f64,
    pub direction: i8,
    /// One entry per column in `SignalTable::pairs`, same order.
    pub crossings: Vec<i8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    pub pairs: Vec<WindowPair>,
    pub rows: Vec<SignalTableRow>,
}

impl SignalTable {
    pub fn build(
        series: &PriceSeries,
        matrix: &CrossingMatrix,
        up_down: &UpDown,
    ) -> Result<Self, MacrossError> {
        let n = series.len();
        for len in [up_down.percent_changes.len(), up_down.directions.len()] {
            if len != n {
                return Err(MacrossError::LengthMismatch { left: n, right: len });
            }
        }
        if let Some((_, signal)) = matrix.iter().find(|(_, s)| s.len() != n) {
            return Err(MacrossError::LengthMismatch {
                left: n,
                right: signal.len(),
            });
        }

        let pairs: Vec<WindowPair> = matrix.pairs().copied().collect();
        let rows = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| SignalTableRow {
                date: bar.date,
                close: bar.close,
                percent_change: up_down.percent_changes[i],
                direction: up_down.directions[i],
                crossings: matrix.iter().map(|(_, s)| s[i]).collect(),
            })
            .collect();

        Ok(SignalTable { pairs, rows })
    }

    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![
            "Date".to_string(),
            "Close".to_string(),
            "PctChange".to_string(),
            "UpDown".to_string(),
        ];
        names.extend(self.pairs.iter().map(|p| p.to_string()));
        names
    }
}
