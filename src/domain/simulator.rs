//! Signal-driven trade simulation.
//!
//! Replays a long-only, single-position strategy over signal-annotated
//! closes. Any open position is sold at the final close before the gain is
//! reported.

use chrono::NaiveDate;

use super::error::MacrossError;
use super::portfolio::{TradeRecord, TradeState};
use super::price::PriceSeries;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub initial_capital: f64,
    pub final_cash: f64,
    pub gain: f64,
    pub gain_percent: f64,
    pub trades: Vec<TradeRecord>,
}

/// Pair each record of `series` with the signal at the same index.
pub fn annotate(series: &PriceSeries, signals: &[Signal]) -> Result<Vec<SignalRow>, MacrossError> {
    if series.len() != signals.len() {
        return Err(MacrossError::LengthMismatch {
            left: series.len(),
            right: signals.len(),
        });
    }
    Ok(series
        .bars()
        .iter()
        .zip(signals)
        .map(|(bar, &signal)| SignalRow {
            date: bar.date,
            close: bar.close,
            signal,
        })
        .collect())
}

pub fn simulate(rows: &[SignalRow], initial_capital: f64) -> Result<SimulationReport, MacrossError> {
    if initial_capital.is_nan() || initial_capital <= 0.0 {
        return Err(MacrossError::invalid(format!(
            "initial capital must be positive, got {}",
            initial_capital
        )));
    }

    let mut state = TradeState::new(initial_capital);
    let mut trades = Vec::new();

    for row in rows {
        let trade = match row.signal {
            Signal::Buy => state.buy(row.date, row.close),
            Signal::Sell => state.sell(row.date, row.close),
            Signal::Hold => None,
        };
        if let Some(trade) = trade {
            log_trade(&trade);
            trades.push(trade);
        }
    }

    if let Some(last) = rows.last() {
        if state.is_long() {
            if let Some(trade) = state.sell(last.date, last.close) {
                log_trade(&trade);
                trades.push(trade);
            }
        }
    }

    let final_cash = state.cash;
    let gain = final_cash - initial_capital;
    let gain_percent = final_cash / initial_capital - 1.0;
    tracing::info!(
        initial_capital,
        final_cash,
        gain,
        gain_percent,
        trades = trades.len(),
        "simulation finished"
    );

    Ok(SimulationReport {
        initial_capital,
        final_cash,
        gain,
        gain_percent,
        trades,
    })
}

fn log_trade(trade: &TradeRecord) {
    tracing::debug!(
        date = %trade.date,
        action = %trade.action,
        volume = trade.volume,
        price = trade.price,
        change_pct = trade.price_change_pct * 100.0,
        cash = trade.cash_after,
        "trade"
    );
}
