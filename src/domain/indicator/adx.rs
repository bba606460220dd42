//! ADX (Average Directional Index).
//!
//! up = H[i] - H[i-1], down = L[i-1] - L[i]
//! +DM = up if up > down and up > 0, else 0 (and symmetrically for -DM)
//! +DI = 100 × sum(+DM, n) / ATR(n), -DI likewise
//! DX  = 100 × |+DI - -DI| / (+DI + -DI)
//! ADX = rolling n-bar mean of DX
//!
//! DI is undefined when ATR is zero and DX when both DIs are zero; either
//! makes the ADX window containing that bar not computable.
//! Warmup: first 2·(period-1) bars are invalid.

use crate::domain::indicator::atr::atr_values;
use crate::domain::indicator::rolling::{rolling_mean, rolling_sum};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_adx(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let dx = dx_values(bars, period);
    IndicatorSeries::from_simple(
        IndicatorType::Adx(period),
        bars.iter().map(|b| b.date),
        rolling_mean(&dx, period),
    )
}

/// Per-bar DX, aligned to `bars`.
pub(crate) fn dx_values(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let mut plus_dm = Vec::with_capacity(bars.len());
    let mut minus_dm = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i == 0 {
            plus_dm.push(Some(0.0));
            minus_dm.push(Some(0.0));
            continue;
        }
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm.push(Some(if up > down && up > 0.0 { up } else { 0.0 }));
        minus_dm.push(Some(if down > up && down > 0.0 { down } else { 0.0 }));
    }

    let plus_sum = rolling_sum(&plus_dm, period);
    let minus_sum = rolling_sum(&minus_dm, period);
    let atr = atr_values(bars, period);

    (0..bars.len())
        .map(|i| {
            let atr = atr[i].filter(|a| *a > 0.0)?;
            let plus_di = 100.0 * plus_sum[i]? / atr;
            let minus_di = 100.0 * minus_sum[i]? / atr;
            let total = plus_di + minus_di;
            if total <= 0.0 {
                return None;
            }
            Some(100.0 * (plus_di - minus_di).abs() / total)
        })
        .collect()
}
