//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All EMAs are seeded from their first input, so every bar is computable.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                value: None,
            })
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (&line, &signal))| IndicatorPoint {
            date: bar.date,
            value: Some(IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn unpack(point: &IndicatorPoint) -> (f64, f64, f64) {
        match point.value {
            Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) => (line, signal, histogram),
            _ => panic!("Expected Macd value"),
        }
    }

    #[test]
    fn macd_first_bar_is_zero() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let series = calculate_macd_default(&bars);
        let (line, signal, histogram) = unpack(&series.values[0]);
        assert_relative_eq!(line, 0.0);
        assert_relative_eq!(signal, 0.0);
        assert_relative_eq!(histogram, 0.0);
    }

    #[test]
    fn macd_matches_ema_difference() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bars = make_bars(&prices);
        let series = calculate_macd(&bars, 3, 6, 4);

        let fast = ema_values(&prices, 3);
        let slow = ema_values(&prices, 6);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_values(&line, 4);

        for i in 0..prices.len() {
            let (l, s, h) = unpack(&series.values[i]);
            assert_relative_eq!(l, line[i], epsilon = 1e-12);
            assert_relative_eq!(s, signal[i], epsilon = 1e-12);
            assert_relative_eq!(h, line[i] - signal[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + i as f64).collect();
        let series = calculate_macd_default(&make_bars(&prices));
        let (line, signal, _) = unpack(&series.values[59]);
        assert!(line > 0.0);
        assert!(line > signal);
    }

    #[test]
    fn macd_constant_prices() {
        let series = calculate_macd_default(&make_bars(&[100.0; 30]));
        for point in &series.values {
            let (line, signal, _) = unpack(point);
            assert_relative_eq!(line, 0.0);
            assert_relative_eq!(signal, 0.0);
        }
    }

    #[test]
    fn macd_zero_period_is_invalid() {
        let series = calculate_macd(&make_bars(&[1.0, 2.0]), 0, 26, 9);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|p| !p.is_valid()));
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd_default(&make_bars(&[1.0]));
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }
}
