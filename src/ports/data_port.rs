//! Price data access port.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;

/// Source of daily price series keyed by instrument symbol.
///
/// `fetch_series` returns a validated, non-empty series or an error. A source
/// that has nothing for the symbol reports `SignalError::Unavailable`.
pub trait DataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SignalError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalError>;
}
