#![allow(dead_code)]

use chrono::NaiveDate;
use macross::domain::error::MacrossError;
use macross::domain::price::{PriceBar, PriceSeries};
use macross::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, code: &str, series: PriceSeries) -> Self {
        self.data.insert(code.to_string(), series);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockDataPort {
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, MacrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(MacrossError::Data {
                reason: reason.clone(),
            });
        }
        self.data.get(code).cloned().ok_or_else(|| MacrossError::Data {
            reason: format!("no data for {}", code),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily closes starting at `start_date`.
pub fn series_from(start_date: &str, closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect(),
    )
    .unwrap()
}

/// Falls for `down` days, then rallies for `up` days.
pub fn v_shape(down: usize, up: usize) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..down).map(|i| 100.0 - i as f64).collect();
    let bottom = 100.0 - down as f64;
    closes.extend((0..up).map(|i| bottom + 1.0 + 3.0 * i as f64));
    closes
}

pub fn write_csv(dir: &std::path::Path, code: &str, series: &PriceSeries) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in series.bars() {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            bar.date.format("%Y-%m-%d"),
            bar.close,
            bar.close,
            bar.close,
            bar.close
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", code)), content).unwrap();
}
