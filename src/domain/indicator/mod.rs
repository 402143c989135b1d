//! Technical indicator types.
//!
//! - `MovingAverageSeries`: rolling-mean values aligned index-for-index with
//!   the source price series, `None` during warmup
//! - `sma`: simple moving average computation

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

impl fmt::Display for MovingAverageSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MA({})", self.window)
    }
}
