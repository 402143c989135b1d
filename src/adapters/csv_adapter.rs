//! CSV file price adapter.
//!
//! Reads `<base>/<CODE>.csv` files with a header row. The `Date` and `Close`
//! columns are located by name, so files with extra columns (open, high,
//! volume, ...) load unchanged.

use crate::domain::error::MacrossError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, MacrossError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| MacrossError::Data {
            reason: format!("missing {} column", name),
        })
}

/// Parse price CSV content into a date-sorted series.
pub fn parse_prices(content: &str) -> Result<PriceSeries, MacrossError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| MacrossError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();
    let date_col = column_index(&headers, "date")?;
    let close_col = column_index(&headers, "close")?;

    let mut bars = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| MacrossError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(date_col).unwrap_or("").trim();
        // yfinance exports may carry a time part: "2020-05-04 00:00:00"
        let date_str = date_str.get(..10).unwrap_or(date_str);
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            MacrossError::Data {
                reason: format!("invalid date '{}': {}", date_str, e),
            }
        })?;

        let close_str = record.get(close_col).unwrap_or("").trim();
        if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
            tracing::warn!(%date, "skipping row without a close");
            continue;
        }
        let close: f64 = close_str.parse().map_err(|e| MacrossError::Data {
            reason: format!("invalid close value '{}' on {}: {}", close_str, date, e),
        })?;
        if !close.is_finite() || close <= 0.0 {
            return Err(MacrossError::Data {
                reason: format!(
                    "invalid close value '{}' on {}: must be a positive number",
                    close_str, date
                ),
            });
        }

        bars.push(PriceBar { date, close });
    }

    bars.sort_by_key(|b| b.date);
    PriceSeries::new(bars).map_err(|e| MacrossError::Data {
        reason: e.to_string(),
    })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, MacrossError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| MacrossError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let series = parse_prices(&content)?;
        tracing::info!(code, records = series.len(), path = %path.display(), "loaded prices");
        Ok(series)
    }
}
