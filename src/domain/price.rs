//! Daily closing-price records and the ordered series built from them.

use chrono::NaiveDate;

use super::error::MacrossError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically ordered daily closes. Dates are strictly increasing and
/// closes finite;
/// missing trading days are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, MacrossError> {
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(MacrossError::invalid(format!(
                "dates must be strictly increasing ({} followed by {})",
                pair[0].date, pair[1].date
            )));
        }
        if let Some(bad) = bars.iter().find(|b| !b.close.is_finite()) {
            return Err(MacrossError::invalid(format!(
                "close on {} is not a finite number",
                bad.date
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Keep every record dated on or before `as_of`.
    pub fn truncate_to(&self, as_of: NaiveDate) -> Result<PriceSeries, MacrossError> {
        let end = self.bars.partition_point(|b| b.date <= as_of);
        if end == 0 {
            return Err(MacrossError::NotFound { date: as_of });
        }
        Ok(PriceSeries {
            bars: self.bars[..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2020, 5, day).unwrap(),
            close,
        }
    }

    fn sample_series() -> PriceSeries {
        PriceSeries::new(vec![bar(1, 10.0), bar(4, 11.0), bar(5, 12.0), bar(6, 13.0)]).unwrap()
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![bar(1, 10.0), bar(1, 11.0)]);
        assert!(matches!(result, Err(MacrossError::InvalidArgument { .. })));
    }

    #[test]
    fn new_rejects_descending_dates() {
        let result = PriceSeries::new(vec![bar(2, 10.0), bar(1, 11.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_non_finite_close() {
        for close in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = PriceSeries::new(vec![bar(1, 10.0), bar(2, close)]);
            assert!(matches!(result, Err(MacrossError::InvalidArgument { .. })));
        }
    }

    #[test]
    fn new_accepts_gaps() {
        let series = sample_series();
        assert_eq!(series.len(), 4);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn truncate_to_keeps_on_or_before() {
        let series = sample_series();
        let cut = series
            .truncate_to(NaiveDate::from_ymd_opt(2020, 5, 4).unwrap())
            .unwrap();
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.last_close(), Some(11.0));
    }

    #[test]
    fn truncate_to_date_in_gap() {
        let series = sample_series();
        let cut = series
            .truncate_to(NaiveDate::from_ymd_opt(2020, 5, 3).unwrap())
            .unwrap();
        assert_eq!(cut.len(), 1);
    }

    #[test]
    fn truncate_to_before_first_record_is_not_found() {
        let series = sample_series();
        let date = NaiveDate::from_ymd_opt(2020, 4, 30).unwrap();
        match series.truncate_to(date) {
            Err(MacrossError::NotFound { date: d }) => assert_eq!(d, date),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn empty_series_has_no_last_close() {
        let series = PriceSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
    }
}
