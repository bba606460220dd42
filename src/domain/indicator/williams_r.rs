//! Williams %R oscillator.
//!
//! %R = (HH(n) - C) / (HH(n) - LL(n)) × -100, in [-100, 0].
//! Undefined when the window's highest high equals its lowest low.
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::rolling::{present, rolling_max, rolling_min};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_williams_r(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let highs = present(&bars.iter().map(|b| b.high).collect::<Vec<_>>());
    let lows = present(&bars.iter().map(|b| b.low).collect::<Vec<_>>());
    let highest = rolling_max(&highs, period);
    let lowest = rolling_min(&lows, period);

    let values = bars
        .iter()
        .zip(highest.into_iter().zip(lowest))
        .map(|(bar, (hh, ll))| {
            let (hh, ll) = (hh?, ll?);
            let range = hh - ll;
            if range <= 0.0 {
                return None;
            }
            // Close can sit outside [low, high] on dirty data.
            Some(((hh - bar.close) / range * -100.0).clamp(-100.0, 0.0))
        })
        .collect();

    IndicatorSeries::from_simple(
        IndicatorType::WilliamsR(period),
        bars.iter().map(|b| b.date),
        values,
    )
}
