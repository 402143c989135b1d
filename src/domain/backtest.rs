//! Crossing-driven backtest.
//!
//! Crossings are computed over the full history so the averages are warm on
//! the first simulated day, then rows before `start_date` are dropped.

use chrono::NaiveDate;

use super::batch::{compute_crossing_matrix, WindowPair};
use super::error::MacrossError;
use super::price::PriceSeries;
use super::signal::signals_from_crossings;
use super::simulator::{annotate, simulate, SignalRow, SimulationReport};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: Option<NaiveDate>,
    pub initial_capital: f64,
    pub fast_window: usize,
    pub slow_window: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            start_date: None,
            initial_capital: 10_000.0,
            fast_window: 3,
            slow_window: 13,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub pair: WindowPair,
    pub rows: Vec<SignalRow>,
    pub report: SimulationReport,
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, MacrossError> {
    let pair = WindowPair::new(config.fast_window, config.slow_window)?;
    let matrix = compute_crossing_matrix(series, &[pair.short(), pair.long()])?;
    let crossings = matrix.get(&pair).cloned().unwrap_or_default();

    let signals = signals_from_crossings(&crossings);
    let mut rows = annotate(series, &signals)?;
    if let Some(start) = config.start_date {
        rows.retain(|row| row.date >= start);
    }

    tracing::info!(
        pair = %pair,
        rows = rows.len(),
        start = ?config.start_date,
        "running backtest"
    );

    let report = simulate(&rows, config.initial_capital)?;
    Ok(BacktestResult { pair, rows, report })
}
