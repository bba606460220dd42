#![allow(dead_code)]

use chrono::NaiveDate;
use signalscope::domain::error::SignalError;
pub use signalscope::domain::ohlcv::{OhlcvBar, PriceSeries};
use signalscope::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalError::Unavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) => PriceSeries::from_unsorted(symbol, bars.clone()),
            None => Err(SignalError::Unavailable {
                symbol: symbol.to_string(),
                reason: "no data".to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: date(date_str),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start`, closes from `close_at(i)`.
pub fn daily_bars(start: &str, n: usize, close_at: impl Fn(usize) -> f64) -> Vec<OhlcvBar> {
    let start = date(start);
    (0..n)
        .map(|i| {
            let close = close_at(i);
            OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 10_000.0,
            }
        })
        .collect()
}

/// Trend with oscillation, so both buy and sell conditions trigger somewhere.
pub fn wavy_bars(start: &str, n: usize) -> Vec<OhlcvBar> {
    daily_bars(start, n, |i| {
        let t = i as f64;
        100.0 + t * 0.05 + (t * 0.15).sin() * 12.0
    })
}

pub fn series(symbol: &str, bars: Vec<OhlcvBar>) -> PriceSeries {
    PriceSeries::new(symbol, bars).unwrap()
}
