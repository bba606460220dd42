//! OHLCV bar and validated price series.

use crate::domain::error::SignalError;
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Daily bars for one instrument, sorted by strictly ascending date.
///
/// Immutable once built; trimming produces a new series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, SignalError> {
        let symbol = symbol.into();
        validate_bars(&symbol, &bars)?;
        Ok(Self { symbol, bars })
    }

    /// Sorts by date before validating. Duplicate dates are still rejected.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        mut bars: Vec<OhlcvBar>,
    ) -> Result<Self, SignalError> {
        bars.sort_by_key(|b| b.date);
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &OhlcvBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    pub fn bar_at(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.index_of(date).map(|i| &self.bars[i])
    }

    /// Index of the first bar strictly after `date`.
    pub fn first_index_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.bars.partition_point(|b| b.date <= date);
        (idx < self.bars.len()).then_some(idx)
    }

    /// Bars dated within `days` calendar days of the last bar, inclusive on
    /// both ends.
    pub fn trailing_window(&self, days: u32) -> PriceSeries {
        let end = self.last().date;
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let from = self.bars.partition_point(|b| b.date < start);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[from..].to_vec(),
        }
    }
}

fn validate_bars(symbol: &str, bars: &[OhlcvBar]) -> Result<(), SignalError> {
    if bars.is_empty() {
        return Err(SignalError::invalid_series(symbol, "series is empty"));
    }

    for (i, bar) in bars.iter().enumerate() {
        let prices = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(SignalError::invalid_series(
                    symbol,
                    format!("{} on {} must be positive, got {}", name, bar.date, value),
                ));
            }
        }
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(SignalError::invalid_series(
                symbol,
                format!("volume on {} must be non-negative, got {}", bar.date, bar.volume),
            ));
        }
        if i > 0 && bars[i - 1].date >= bar.date {
            return Err(SignalError::invalid_series(
                symbol,
                format!(
                    "dates must be strictly ascending: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        assert!((bar.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_accepts_valid_series() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2024-01-02", 10.0), bar("2024-01-03", 11.0)],
        )
        .unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn high_and_low_columns_follow_bar_order() {
        let series = PriceSeries::from_unsorted(
            "AAPL",
            vec![bar("2024-01-03", 20.0), bar("2024-01-02", 10.0)],
        )
        .unwrap();
        assert_eq!(series.highs(), vec![11.0, 21.0]);
        assert_eq!(series.lows(), vec![9.0, 19.0]);
    }

    #[test]
    fn new_rejects_empty() {
        let err = PriceSeries::new("AAPL", vec![]).unwrap_err();
        assert!(matches!(err, SignalError::InvalidSeries { .. }));
    }

    #[test]
    fn new_rejects_unsorted_dates() {
        let err = PriceSeries::new(
            "AAPL",
            vec![bar("2024-01-03", 10.0), bar("2024-01-02", 11.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let result = PriceSeries::from_unsorted(
            "AAPL",
            vec![bar("2024-01-02", 10.0), bar("2024-01-02", 11.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_non_positive_price() {
        let mut b = bar("2024-01-02", 10.0);
        b.low = 0.0;
        let err = PriceSeries::new("AAPL", vec![b]).unwrap_err();
        assert!(err.to_string().contains("low"));
    }

    #[test]
    fn new_rejects_nan_close() {
        let mut b = bar("2024-01-02", 10.0);
        b.close = f64::NAN;
        assert!(PriceSeries::new("AAPL", vec![b]).is_err());
    }

    #[test]
    fn new_rejects_negative_volume() {
        let mut b = bar("2024-01-02", 10.0);
        b.volume = -1.0;
        assert!(PriceSeries::new("AAPL", vec![b]).is_err());
    }

    #[test]
    fn from_unsorted_sorts() {
        let series = PriceSeries::from_unsorted(
            "AAPL",
            vec![bar("2024-01-05", 12.0), bar("2024-01-02", 10.0)],
        )
        .unwrap();
        assert_eq!(series.first().close, 10.0);
        assert_eq!(series.last().close, 12.0);
    }

    #[test]
    fn lookup_by_date() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                bar("2024-01-02", 10.0),
                bar("2024-01-03", 11.0),
                bar("2024-01-08", 12.0),
            ],
        )
        .unwrap();
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        assert_eq!(series.index_of(d("2024-01-03")), Some(1));
        assert_eq!(series.bar_at(d("2024-01-04")), None);
        assert_eq!(series.first_index_after(d("2024-01-04")), Some(2));
        assert_eq!(series.first_index_after(d("2024-01-03")), Some(2));
        assert_eq!(series.first_index_after(d("2024-01-08")), None);
    }

    #[test]
    fn trailing_window_is_inclusive() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                bar("2023-01-01", 9.0),
                bar("2023-01-02", 10.0),
                bar("2023-06-01", 11.0),
                bar("2024-01-02", 12.0),
            ],
        )
        .unwrap();

        // 2023-01-02 is exactly 365 days before the last bar.
        let window = series.trailing_window(365);
        assert_eq!(window.len(), 3);
        assert_eq!(
            window.first().date,
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );

        let shorter = series.trailing_window(364);
        assert_eq!(shorter.len(), 2);
        assert_eq!(
            shorter.first().date,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
        );

        assert_eq!(series.trailing_window(366).len(), 4);
        assert_eq!(series.len(), 4, "source series untouched");
    }
}
