//! Price series cache port.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;

/// Persistent store of previously fetched series, keyed by symbol.
///
/// A cached series is interchangeable with a freshly fetched one.
pub trait CachePort {
    /// `Ok(None)` when nothing is cached for `symbol`.
    fn load(&self, symbol: &str) -> Result<Option<PriceSeries>, SignalError>;

    /// Insert or replace the entry for `series.symbol()`.
    fn store(&self, series: &PriceSeries) -> Result<(), SignalError>;
}
