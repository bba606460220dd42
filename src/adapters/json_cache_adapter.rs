//! JSON file price cache.
//!
//! One document holds every cached symbol:
//! `{"AAPL": {"2024-01-02": {"open": .., "high": .., "low": .., "close": .., "volume": ..}}}`.
//! An unreadable document is treated as empty: loads miss and the next store
//! rewrites it from scratch.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::cache_port::CachePort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

type Document = BTreeMap<String, BTreeMap<String, CachedBar>>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CachedBar {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<&OhlcvBar> for CachedBar {
    fn from(bar: &OhlcvBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

pub struct JsonCacheAdapter {
    path: PathBuf,
    // Serialises read-modify-write of the document across screening threads.
    lock: Mutex<()>,
}

impl JsonCacheAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_document(&self) -> Result<Document, SignalError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(SignalError::Cache {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache file is corrupt, ignoring it");
                Ok(Document::new())
            }
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), SignalError> {
        let json = serde_json::to_string_pretty(document).map_err(|e| SignalError::Cache {
            reason: format!("failed to serialize cache: {}", e),
        })?;
        fs::write(&self.path, json).map_err(|e| SignalError::Cache {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        })
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, SignalError> {
        self.lock.lock().map_err(|_| SignalError::Cache {
            reason: "cache lock poisoned".to_string(),
        })
    }
}

impl CachePort for JsonCacheAdapter {
    fn load(&self, symbol: &str) -> Result<Option<PriceSeries>, SignalError> {
        let _guard = self.guard()?;
        let mut document = self.read_document()?;
        let Some(entries) = document.remove(symbol) else {
            debug!(symbol, "cache miss");
            return Ok(None);
        };

        let bars = entries
            .into_iter()
            .map(|(date, bar)| {
                let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
                    SignalError::Cache {
                        reason: format!("bad date '{}' cached for {}: {}", date, symbol, e),
                    }
                })?;
                Ok(OhlcvBar {
                    date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                })
            })
            .collect::<Result<Vec<_>, SignalError>>()?;

        debug!(symbol, bars = bars.len(), "cache hit");
        PriceSeries::from_unsorted(symbol, bars).map(Some)
    }

    fn store(&self, series: &PriceSeries) -> Result<(), SignalError> {
        let _guard = self.guard()?;
        let mut document = self.read_document()?;
        let entries = series
            .bars()
            .iter()
            .map(|bar| (bar.date.format(DATE_FORMAT).to_string(), CachedBar::from(bar)))
            .collect();
        document.insert(series.symbol().to_string(), entries);
        self.write_document(&document)?;
        debug!(symbol = series.symbol(), bars = series.len(), "cached series");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: c,
                high: c + 1.0,
                low: c - 0.5,
                close: c,
                volume: 10.0,
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    fn cache_in(dir: &TempDir) -> JsonCacheAdapter {
        JsonCacheAdapter::new(dir.path().join("old_data.json"))
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        assert_eq!(cache_in(&dir).load("AAPL").unwrap(), None);
    }

    #[test]
    fn store_then_load_returns_same_series() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let stored = series("AAPL", &[10.0, 11.0, 12.5]);

        cache.store(&stored).unwrap();
        assert_eq!(cache.load("AAPL").unwrap(), Some(stored));
    }

    #[test]
    fn store_merges_symbols() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.store(&series("AAPL", &[10.0])).unwrap();
        cache.store(&series("MSFT", &[20.0, 21.0])).unwrap();
        cache.store(&series("AAPL", &[30.0, 31.0, 32.0])).unwrap();

        assert_eq!(cache.load("MSFT").unwrap().unwrap().len(), 2);
        assert_eq!(cache.load("AAPL").unwrap().unwrap().last().close, 32.0);
    }

    #[test]
    fn document_uses_symbol_then_date_keys() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.store(&series("AAPL", &[10.0])).unwrap();

        let raw = fs::read_to_string(dir.path().join("old_data.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["AAPL"]["2024-01-01"]["close"], 10.0);
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old_data.json"), "{not json").unwrap();
        let cache = cache_in(&dir);

        assert_eq!(cache.load("AAPL").unwrap(), None);
        cache.store(&series("AAPL", &[10.0])).unwrap();
        assert!(cache.load("AAPL").unwrap().is_some());
    }

    #[test]
    fn invalid_cached_prices_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("old_data.json"),
            r#"{"BAD": {"2024-01-01": {"open": 1, "high": 1, "low": 1, "close": -3, "volume": 0}}}"#,
        )
        .unwrap();
        assert!(matches!(
            cache_in(&dir).load("BAD"),
            Err(SignalError::InvalidSeries { .. })
        ));
    }
}
