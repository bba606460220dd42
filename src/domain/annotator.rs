//! Builds indicator frames from price series and scores them.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::frame::{IndicatorFrame, IndicatorRow, ScoredFrame, LONGEST_LOOKBACK};
use crate::domain::indicator::{
    adx, atr, bollinger, calculate_adx, calculate_atr, calculate_bollinger, calculate_macd,
    calculate_rsi, calculate_sma, calculate_williams_r, macd, rsi, williams_r, IndicatorValue,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::scoring::{score_bar, EvaluationMode, ScoringConfig};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SMA_FAST: usize = 50;
pub const SMA_SLOW: usize = 200;

/// Compute every indicator column for `series`.
pub fn build_indicator_frame(series: &PriceSeries) -> IndicatorFrame {
    let bars = series.bars();

    let sma50 = calculate_sma(bars, SMA_FAST).simple_values();
    let sma200 = calculate_sma(bars, SMA_SLOW).simple_values();
    let rsi_values = calculate_rsi(bars, rsi::DEFAULT_PERIOD).simple_values();
    let macd_series = calculate_macd(
        bars,
        macd::DEFAULT_FAST,
        macd::DEFAULT_SLOW,
        macd::DEFAULT_SIGNAL,
    );
    let bands = calculate_bollinger(
        bars,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_MULT_X100,
    );
    let atr_values = calculate_atr(bars, atr::DEFAULT_PERIOD).simple_values();
    let williams = calculate_williams_r(bars, williams_r::DEFAULT_PERIOD).simple_values();
    let adx_values = calculate_adx(bars, adx::DEFAULT_PERIOD).simple_values();

    let rows = (0..bars.len())
        .map(|i| {
            let (macd_line, macd_signal) = match macd_series.values[i].value {
                Some(IndicatorValue::Macd { line, signal, .. }) => (Some(line), Some(signal)),
                _ => (None, None),
            };
            let (upper_band, middle_band, lower_band) = match bands.values[i].value {
                Some(IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                }) => (Some(upper), Some(middle), Some(lower)),
                _ => (None, None, None),
            };
            IndicatorRow {
                sma50: sma50[i],
                sma200: sma200[i],
                rsi: rsi_values[i],
                macd: macd_line,
                macd_signal,
                middle_band,
                upper_band,
                lower_band,
                atr: atr_values[i],
                williams_r: williams[i],
                adx: adx_values[i],
            }
        })
        .collect();

    IndicatorFrame::new(series.clone(), rows)
}

/// Score `frame` under `config`. The frame itself is left untouched.
pub fn score_frame(
    frame: Arc<IndicatorFrame>,
    config: &ScoringConfig,
    mode: EvaluationMode,
) -> ScoredFrame {
    let last = frame.len().saturating_sub(1);
    let scores = frame
        .bars()
        .iter()
        .zip(frame.rows())
        .enumerate()
        .map(|(i, (bar, row))| match mode {
            EvaluationMode::AllRows => Some(score_bar(bar.close, row, config)),
            EvaluationMode::LatestOnly if i == last => Some(score_bar(bar.close, row, config)),
            EvaluationMode::LatestOnly => None,
        })
        .collect();

    ScoredFrame::new(frame, *config, mode, scores)
}

/// Trim `series` to the configured lookback window, build indicators and
/// score them.
pub fn annotate(series: &PriceSeries, config: &AnalysisConfig) -> ScoredFrame {
    let window = series.trailing_window(config.lookback_window.get());
    if window.len() < LONGEST_LOOKBACK {
        warn!(
            symbol = window.symbol(),
            bars = window.len(),
            needed = LONGEST_LOOKBACK,
            "short history, SMA200 is still an expanding average"
        );
    }

    let frame = Arc::new(build_indicator_frame(&window));
    let scored = score_frame(frame, &config.scoring, config.mode);
    debug!(
        symbol = window.symbol(),
        bars = scored.len(),
        buy_signals = scored.buy_signal_indices().len(),
        mode = %config.mode,
        "annotated series"
    );
    scored
}
