//! Hold-period backtests over buy signals.
//!
//! Each buy signal enters at that bar's close and exits `hold` calendar days
//! later. The two variants differ in how they handle an exit date with no
//! bar:
//! - first-signal: use the next later bar, or the last close when history
//!   ends first (flagging insufficient data)
//! - all-signals: only exact exit-date matches count; others are excluded
//!   from the average and flag insufficient data

use crate::domain::frame::ScoredFrame;
use crate::domain::ohlcv::PriceSeries;
use chrono::{Days, NaiveDate};
use std::num::NonZeroU32;
use tracing::debug;

/// How an exit bar was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMatch {
    /// A bar exists on the exit date.
    Exact,
    /// Market closed on the exit date; first later bar used.
    NextBar,
    /// History ended before the exit date; last bar used.
    LastClose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeReturn {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_close: f64,
    pub exit_close: f64,
    pub exit: ExitMatch,
    pub return_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestOutcome {
    /// No buy signal produced a return.
    NoSignal,
    Resolved,
    /// Resolved with the last available close (first-signal variant only).
    ResolvedFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    /// `None` exactly when no signal produced a return.
    pub average_return: Option<f64>,
    /// Earliest buy signal, even if it produced no return.
    pub first_signal_date: Option<NaiveDate>,
    pub data_sufficient: bool,
    pub outcome: BacktestOutcome,
    pub trades: Vec<TradeReturn>,
}

impl BacktestResult {
    fn no_signal() -> Self {
        Self {
            average_return: None,
            first_signal_date: None,
            data_sufficient: true,
            outcome: BacktestOutcome::NoSignal,
            trades: Vec::new(),
        }
    }

    pub fn is_no_signal(&self) -> bool {
        self.outcome == BacktestOutcome::NoSignal
    }
}

/// Backtest the chronologically first buy signal only.
pub fn backtest_first_signal(frame: &ScoredFrame, hold: NonZeroU32) -> BacktestResult {
    let series = frame.series();
    let Some(&entry) = frame.buy_signal_indices().first() else {
        debug!(symbol = series.symbol(), "no buy signal");
        return BacktestResult::no_signal();
    };

    let entry_bar = &series.bars()[entry];
    let target = exit_target(entry_bar.date, hold);
    let (exit, matched) = match series.index_of(target) {
        Some(i) => (i, ExitMatch::Exact),
        None => match series.first_index_after(target) {
            Some(i) => (i, ExitMatch::NextBar),
            None => (series.len() - 1, ExitMatch::LastClose),
        },
    };

    let trade = trade_return(series, entry, exit, matched);
    debug!(
        symbol = series.symbol(),
        entry = %trade.entry_date,
        exit = %trade.exit_date,
        return_rate = trade.return_rate,
        "first-signal backtest"
    );

    let fallback = matched == ExitMatch::LastClose;
    BacktestResult {
        average_return: Some(trade.return_rate),
        first_signal_date: Some(entry_bar.date),
        data_sufficient: !fallback,
        outcome: if fallback {
            BacktestOutcome::ResolvedFallback
        } else {
            BacktestOutcome::Resolved
        },
        trades: vec![trade],
    }
}

/// Backtest every buy signal and average the returns of those whose exit
/// date has an exact bar.
pub fn backtest_all_signals(frame: &ScoredFrame, hold: NonZeroU32) -> BacktestResult {
    let series = frame.series();
    let signals = frame.buy_signal_indices();
    let Some(&first) = signals.first() else {
        debug!(symbol = series.symbol(), "no buy signal");
        return BacktestResult::no_signal();
    };

    let mut trades = Vec::with_capacity(signals.len());
    let mut data_sufficient = true;

    for &entry in &signals {
        let target = exit_target(series.bars()[entry].date, hold);
        match series.index_of(target) {
            Some(exit) => trades.push(trade_return(series, entry, exit, ExitMatch::Exact)),
            None => data_sufficient = false,
        }
    }

    let average_return = if trades.is_empty() {
        None
    } else {
        Some(trades.iter().map(|t| t.return_rate).sum::<f64>() / trades.len() as f64)
    };

    debug!(
        symbol = series.symbol(),
        signals = signals.len(),
        resolved = trades.len(),
        data_sufficient,
        "all-signals backtest"
    );

    BacktestResult {
        average_return,
        first_signal_date: Some(series.bars()[first].date),
        data_sufficient,
        outcome: if average_return.is_some() {
            BacktestOutcome::Resolved
        } else {
            BacktestOutcome::NoSignal
        },
        trades,
    }
}

fn exit_target(entry: NaiveDate, hold: NonZeroU32) -> NaiveDate {
    entry
        .checked_add_days(Days::new(u64::from(hold.get())))
        .unwrap_or(NaiveDate::MAX)
}

fn trade_return(series: &PriceSeries, entry: usize, exit: usize, matched: ExitMatch) -> TradeReturn {
    let entry_bar = &series.bars()[entry];
    let exit_bar = &series.bars()[exit];
    TradeReturn {
        entry_date: entry_bar.date,
        exit_date: exit_bar.date,
        entry_close: entry_bar.close,
        exit_close: exit_bar.close,
        exit: matched,
        return_rate: (exit_bar.close - entry_bar.close) / entry_bar.close,
    }
}
