//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: rolling mean of close over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::rolling::{present, rolling_mean, rolling_stddev};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let closes = present(&bars.iter().map(|b| b.close).collect::<Vec<_>>());
    let means = rolling_mean(&closes, period);
    let stddevs = rolling_stddev(&closes, period);

    let values = bars
        .iter()
        .zip(means.into_iter().zip(stddevs))
        .map(|(bar, (mean, sd))| IndicatorPoint {
            date: bar.date,
            value: mean.zip(sd).map(|(middle, sd)| IndicatorValue::Bollinger {
                upper: middle + mult * sd,
                middle,
                lower: middle - mult * sd,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}
