//! Exponential Moving Average.
//!
//! α = 2/(span+1), seeded with the first value, then
//! EMA[i] = EMA[i-1] + α·(x[i] - EMA[i-1]). No bias adjustment and no warmup:
//! every bar is computable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = if span == 0 {
        vec![None; bars.len()]
    } else {
        ema_values(&closes, span).into_iter().map(Some).collect()
    };

    IndicatorSeries::from_simple(
        IndicatorType::Ema(span),
        bars.iter().map(|b| b.date),
        values,
    )
}

/// EMA over raw values. `span` must be non-zero.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        let mut ema = first;
        out.push(ema);
        for &x in iter {
            ema += alpha * (x - ema);
            out.push(ema);
        }
    }

    out
}
