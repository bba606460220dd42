//! ATR (Average True Range).
//!
//! TR[i] = max(high - low, |high - C[i-1]|, |low - C[i-1]|), with
//! TR[0] = high - low. ATR(n) is the rolling n-bar mean of TR.
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::rolling::{present, rolling_mean};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    IndicatorSeries::from_simple(
        IndicatorType::Atr(period),
        bars.iter().map(|b| b.date),
        atr_values(bars, period),
    )
}

pub(crate) fn atr_values(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    rolling_mean(&present(&true_ranges(bars)), period)
}

pub(crate) fn true_ranges(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}
