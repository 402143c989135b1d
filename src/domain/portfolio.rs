//! Single-asset, long-only trading state.

use chrono::NaiveDate;

use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: Signal,
    pub price: f64,
    pub volume: u64,
    pub cash_after: f64,
    /// Price move since the previous trade, 0 when there was none.
    pub price_change_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeState {
    pub cash: f64,
    pub volume: u64,
    pub last_trade_price: f64,
    pub state: PositionState,
}

impl TradeState {
    pub fn new(initial_capital: f64) -> Self {
        TradeState {
            cash: initial_capital,
            volume: 0,
            last_trade_price: 0.0,
            state: PositionState::Flat,
        }
    }

    pub fn is_long(&self) -> bool {
        self.state == PositionState::Long
    }

    fn price_change_pct(&self, price: f64) -> f64 {
        if self.last_trade_price != 0.0 {
            (price - self.last_trade_price) / self.last_trade_price
        } else {
            0.0
        }
    }

    /// FLAT -> LONG with as many whole units as cash allows. The transition
    /// happens even when that is zero units. Returns `None` when already long.
    pub fn buy(&mut self, date: NaiveDate, price: f64) -> Option<TradeRecord> {
        if self.is_long() {
            return None;
        }
        let price_change_pct = self.price_change_pct(price);
        let volume = if price > 0.0 {
            (self.cash / price).floor() as u64
        } else {
            0
        };
        self.cash -= volume as f64 * price;
        self.volume = volume;
        self.last_trade_price = price;
        self.state = PositionState::Long;

        Some(TradeRecord {
            date,
            action: Signal::Buy,
            price,
            volume,
            cash_after: self.cash,
            price_change_pct,
        })
    }

    /// LONG -> FLAT, liquidating the whole position. Returns `None` when flat.
    pub fn sell(&mut self, date: NaiveDate, price: f64) -> Option<TradeRecord> {
        if !self.is_long() {
            return None;
        }
        let price_change_pct = self.price_change_pct(price);
        let volume = self.volume;
        self.cash += volume as f64 * price;
        self.volume = 0;
        self.last_trade_price = price;
        self.state = PositionState::Flat;

        Some(TradeRecord {
            date,
            action: Signal::Sell,
            price,
            volume,
            cash_after: self.cash,
            price_change_pct,
        })
    }
}
