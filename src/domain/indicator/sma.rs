//! Simple Moving Average of close.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). The first n-1 bars use an expanding
//! window over every bar seen so far, so the series is computable from bar 0.

use crate::domain::indicator::rolling::window_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = (0..closes.len())
        .map(|i| {
            if period == 0 {
                return None;
            }
            let start = (i + 1).saturating_sub(period);
            Some(window_mean(&closes[start..=i]))
        })
        .collect();

    IndicatorSeries::from_simple(
        IndicatorType::Sma(period),
        bars.iter().map(|b| b.date),
        values,
    )
}
