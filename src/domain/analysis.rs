//! Per-instrument pipeline: annotate, score and backtest one series.

use crate::domain::annotator::annotate;
use crate::domain::backtest::{backtest_all_signals, backtest_first_signal, BacktestResult};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::SignalError;
use crate::domain::frame::ScoredFrame;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::scoring::{EvaluationMode, ScoringConfig, SignalScore};
use crate::ports::config_port::ConfigPort;
use std::num::NonZeroU32;

pub const DEFAULT_HOLD_PERIOD: u32 = 30;
pub const DEFAULT_LOOKBACK_WINDOW: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub scoring: ScoringConfig,
    /// Calendar days between entry and exit.
    pub hold_period: NonZeroU32,
    /// Calendar days of history kept before the last bar.
    pub lookback_window: NonZeroU32,
    pub mode: EvaluationMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            hold_period: NonZeroU32::new(DEFAULT_HOLD_PERIOD).unwrap_or(NonZeroU32::MIN),
            lookback_window: NonZeroU32::new(DEFAULT_LOOKBACK_WINDOW).unwrap_or(NonZeroU32::MIN),
            mode: EvaluationMode::AllRows,
        }
    }
}

impl AnalysisConfig {
    /// Build from the `[signals]` section, falling back to defaults for
    /// missing keys.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SignalError> {
        validate_analysis_config(config)?;

        let defaults = Self::default();
        let scoring = ScoringConfig::new(
            config.get_double("signals", "buy_threshold", defaults.scoring.buy_threshold),
            config.get_double("signals", "sell_threshold", defaults.scoring.sell_threshold),
        )?;
        let mode = match config.get_string("signals", "mode") {
            Some(raw) => raw.parse().map_err(|reason| SignalError::ConfigInvalid {
                section: "signals".to_string(),
                key: "mode".to_string(),
                reason,
            })?,
            None => defaults.mode,
        };

        Ok(Self {
            scoring,
            hold_period: days(config, "hold_period", defaults.hold_period)?,
            lookback_window: days(config, "lookback_window", defaults.lookback_window)?,
            mode,
        })
    }
}

fn days(config: &dyn ConfigPort, key: &str, default: NonZeroU32) -> Result<NonZeroU32, SignalError> {
    let value = config.get_int("signals", key, i64::from(default.get()));
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| SignalError::ConfigInvalid {
            section: "signals".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive number of days", key),
        })
}

#[derive(Debug, Clone)]
pub struct InstrumentAnalysis {
    pub symbol: String,
    pub frame: ScoredFrame,
    pub first_signal: BacktestResult,
    pub all_signals: BacktestResult,
}

impl InstrumentAnalysis {
    pub fn latest_score(&self) -> Option<&SignalScore> {
        self.frame.latest()
    }
}

pub fn analyze(series: &PriceSeries, config: &AnalysisConfig) -> InstrumentAnalysis {
    let frame = annotate(series, config);
    let first_signal = backtest_first_signal(&frame, config.hold_period);
    let all_signals = backtest_all_signals(&frame, config.hold_period);

    InstrumentAnalysis {
        symbol: series.symbol().to_string(),
        frame,
        first_signal,
        all_signals,
    }
}
