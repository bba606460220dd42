//! RSI (Relative Strength Index) indicator implementation.
//!
//! Simple (rolling-mean) averaging of gains and losses over the trailing
//! `period` close-to-close changes:
//! - change[0] = 0 (the first bar has no prior close)
//! - gain = max(change, 0), loss = max(-change, 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let change = if i == 0 {
            0.0
        } else {
            bars[i].close - bars[i - 1].close
        };
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    let values = avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(_), Some(l)) if l == 0.0 => Some(100.0),
            (Some(g), Some(l)) => Some(100.0 - (100.0 / (1.0 + g / l))),
            _ => None,
        })
        .collect();

    IndicatorSeries::from_simple(
        IndicatorType::Rsi(period),
        bars.iter().map(|b| b.date),
        values,
    )
}
