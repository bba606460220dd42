//! Data port that writes through to a cache and falls back to it.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;
use crate::ports::cache_port::CachePort;
use crate::ports::data_port::DataPort;
use tracing::{info, warn};

/// Fetches from `primary`, storing each successful result in `cache`. When
/// the primary reports the symbol unavailable, a cached copy is served
/// instead. Other primary errors pass through untouched.
pub struct CachedDataPort<P, C> {
    primary: P,
    cache: C,
}

impl<P: DataPort, C: CachePort> CachedDataPort<P, C> {
    pub fn new(primary: P, cache: C) -> Self {
        Self { primary, cache }
    }
}

impl<P: DataPort, C: CachePort> DataPort for CachedDataPort<P, C> {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
        match self.primary.fetch_series(symbol) {
            Ok(series) => {
                if let Err(e) = self.cache.store(&series) {
                    warn!(symbol, error = %e, "failed to update cache");
                }
                Ok(series)
            }
            Err(SignalError::Unavailable { symbol: s, reason }) => {
                match self.cache.load(symbol)? {
                    Some(series) => {
                        info!(symbol, %reason, "primary source unavailable, using cached data");
                        Ok(series)
                    }
                    None => Err(SignalError::Unavailable { symbol: s, reason }),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        self.primary.list_symbols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn series(symbol: &str, close: f64) -> PriceSeries {
        PriceSeries::new(
            symbol,
            vec![OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            }],
        )
        .unwrap()
    }

    struct StubSource {
        series: HashMap<String, PriceSeries>,
        broken: bool,
    }

    impl DataPort for StubSource {
        fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
            if self.broken {
                return Err(SignalError::invalid_series(symbol, "garbled"));
            }
            self.series
                .get(symbol)
                .cloned()
                .ok_or_else(|| SignalError::unavailable(symbol, "not listed"))
        }

        fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
            Ok(self.series.keys().cloned().collect())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: RefCell<HashMap<String, PriceSeries>>,
        fail_store: bool,
    }

    impl CachePort for MemoryCache {
        fn load(&self, symbol: &str) -> Result<Option<PriceSeries>, SignalError> {
            Ok(self.entries.borrow().get(symbol).cloned())
        }

        fn store(&self, series: &PriceSeries) -> Result<(), SignalError> {
            if self.fail_store {
                return Err(SignalError::Cache {
                    reason: "disk full".to_string(),
                });
            }
            self.entries
                .borrow_mut()
                .insert(series.symbol().to_string(), series.clone());
            Ok(())
        }
    }

    fn source(symbols: &[(&str, f64)]) -> StubSource {
        StubSource {
            series: symbols
                .iter()
                .map(|&(s, c)| (s.to_string(), series(s, c)))
                .collect(),
            broken: false,
        }
    }

    #[test]
    fn successful_fetch_is_written_through() {
        let port = CachedDataPort::new(source(&[("AAPL", 10.0)]), MemoryCache::default());
        assert_eq!(port.fetch_series("AAPL").unwrap().last().close, 10.0);
        assert!(port.cache.load("AAPL").unwrap().is_some());
    }

    #[test]
    fn unavailable_falls_back_to_cache() {
        let cache = MemoryCache::default();
        cache.store(&series("MSFT", 42.0)).unwrap();
        let port = CachedDataPort::new(source(&[]), cache);

        assert_eq!(port.fetch_series("MSFT").unwrap().last().close, 42.0);
    }

    #[test]
    fn unavailable_everywhere_stays_unavailable() {
        let port = CachedDataPort::new(source(&[]), MemoryCache::default());
        assert!(matches!(
            port.fetch_series("NONE"),
            Err(SignalError::Unavailable { symbol, .. }) if symbol == "NONE"
        ));
    }

    #[test]
    fn invalid_series_is_not_masked_by_cache() {
        let cache = MemoryCache::default();
        cache.store(&series("AAPL", 1.0)).unwrap();
        let mut primary = source(&[("AAPL", 2.0)]);
        primary.broken = true;
        let port = CachedDataPort::new(primary, cache);

        assert!(matches!(
            port.fetch_series("AAPL"),
            Err(SignalError::InvalidSeries { .. })
        ));
    }

    #[test]
    fn cache_write_failure_does_not_fail_fetch() {
        let cache = MemoryCache {
            fail_store: true,
            ..MemoryCache::default()
        };
        let port = CachedDataPort::new(source(&[("AAPL", 10.0)]), cache);
        assert!(port.fetch_series("AAPL").is_ok());
    }
}
