//! Price data access port.

use crate::domain::error::MacrossError;
use crate::domain::price::PriceSeries;

/// Source of daily closing-price histories, one per instrument code.
pub trait PriceDataPort {
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, MacrossError>;
}
