//! Enriched views over a price series: indicator columns and signal scores.
//!
//! Each stage builds a new value. An `IndicatorFrame` is shared behind an
//! `Arc` so several `ScoredFrame`s (different thresholds or modes) can be
//! derived from one set of indicator columns without copying or mutating it.

use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::scoring::{EvaluationMode, ScoringConfig, SignalScore};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Bars needed before every indicator column has a full window (SMA200).
pub const LONGEST_LOOKBACK: usize = 200;

/// Indicator columns in their stable display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Sma50,
    Sma200,
    Rsi,
    Macd,
    MacdSignal,
    MiddleBand,
    UpperBand,
    LowerBand,
    Atr,
    WilliamsR,
    Adx,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Sma50,
        Column::Sma200,
        Column::Rsi,
        Column::Macd,
        Column::MacdSignal,
        Column::MiddleBand,
        Column::UpperBand,
        Column::LowerBand,
        Column::Atr,
        Column::WilliamsR,
        Column::Adx,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Sma50 => "SMA50",
            Column::Sma200 => "SMA200",
            Column::Rsi => "RSI",
            Column::Macd => "MACD",
            Column::MacdSignal => "Signal",
            Column::MiddleBand => "Middle Band",
            Column::UpperBand => "Upper Band",
            Column::LowerBand => "Lower Band",
            Column::Atr => "ATR",
            Column::WilliamsR => "Williams %R",
            Column::Adx => "ADX",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Indicator values for one bar. `None` means not yet computable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorRow {
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub middle_band: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub atr: Option<f64>,
    pub williams_r: Option<f64>,
    pub adx: Option<f64>,
}

impl IndicatorRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Sma50 => self.sma50,
            Column::Sma200 => self.sma200,
            Column::Rsi => self.rsi,
            Column::Macd => self.macd,
            Column::MacdSignal => self.macd_signal,
            Column::MiddleBand => self.middle_band,
            Column::UpperBand => self.upper_band,
            Column::LowerBand => self.lower_band,
            Column::Atr => self.atr,
            Column::WilliamsR => self.williams_r,
            Column::Adx => self.adx,
        }
    }
}

/// Close and moving averages for one bar, as consumed by charting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    series: PriceSeries,
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub(crate) fn new(series: PriceSeries, rows: Vec<IndicatorRow>) -> Self {
        debug_assert_eq!(series.len(), rows.len());
        Self { series, rows }
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        self.series.bars()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    /// False when the window is shorter than the longest indicator lookback.
    pub fn history_complete(&self) -> bool {
        self.len() >= LONGEST_LOOKBACK
    }

    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.bars()
            .iter()
            .zip(&self.rows)
            .map(|(bar, row)| ChartPoint {
                date: bar.date,
                close: bar.close,
                sma50: row.sma50,
                sma200: row.sma200,
            })
            .collect()
    }
}

/// One bar of a `ScoredFrame`.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRow<'a> {
    pub bar: &'a OhlcvBar,
    pub indicators: &'a IndicatorRow,
    /// `None` when the bar was not evaluated (latest-only mode).
    pub score: Option<&'a SignalScore>,
}

impl ScoredRow<'_> {
    pub fn buy_signal(&self) -> bool {
        self.score.is_some_and(|s| s.buy_signal)
    }

    pub fn sell_signal(&self) -> bool {
        self.score.is_some_and(|s| s.sell_signal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFrame {
    frame: Arc<IndicatorFrame>,
    config: ScoringConfig,
    mode: EvaluationMode,
    scores: Vec<Option<SignalScore>>,
}

impl ScoredFrame {
    pub(crate) fn new(
        frame: Arc<IndicatorFrame>,
        config: ScoringConfig,
        mode: EvaluationMode,
        scores: Vec<Option<SignalScore>>,
    ) -> Self {
        debug_assert_eq!(frame.len(), scores.len());
        Self {
            frame,
            config,
            mode,
            scores,
        }
    }

    pub fn indicators(&self) -> &IndicatorFrame {
        &self.frame
    }

    /// Shared handle to the indicator frame, for rescoring.
    pub fn indicator_frame(&self) -> Arc<IndicatorFrame> {
        Arc::clone(&self.frame)
    }

    pub fn series(&self) -> &PriceSeries {
        self.frame.series()
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> &[Option<SignalScore>] {
        &self.scores
    }

    pub fn history_complete(&self) -> bool {
        self.frame.history_complete()
    }

    pub fn row(&self, index: usize) -> Option<ScoredRow<'_>> {
        Some(ScoredRow {
            bar: self.frame.bars().get(index)?,
            indicators: self.frame.rows().get(index)?,
            score: self.scores.get(index)?.as_ref(),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = ScoredRow<'_>> {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// Score of the final bar, present in either mode.
    pub fn latest(&self) -> Option<&SignalScore> {
        self.scores.last()?.as_ref()
    }

    /// Bar indices with a buy signal, oldest first.
    pub fn buy_signal_indices(&self) -> Vec<usize> {
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some_and(|s| s.buy_signal))
            .map(|(i, _)| i)
            .collect()
    }
}
