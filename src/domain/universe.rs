//! Multi-instrument screening.
//!
//! Parses symbol lists from configuration or the command line and runs the
//! latest-only pipeline over each symbol independently. A symbol whose data
//! cannot be fetched or validated is skipped without affecting the others.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::annotator::annotate;
use crate::domain::error::SignalError;
use crate::domain::scoring::{EvaluationMode, SignalScore};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Latest-bar result for one screened symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenEntry {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub score: SignalScore,
    pub history_complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unavailable(String),
    InvalidSeries(String),
    Failed(String),
}

impl From<SignalError> for SkipReason {
    fn from(err: SignalError) -> Self {
        match err {
            SignalError::Unavailable { reason, .. } => SkipReason::Unavailable(reason),
            SignalError::InvalidSeries { reason, .. } => SkipReason::InvalidSeries(reason),
            other => SkipReason::Failed(other.to_string()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            SkipReason::InvalidSeries(reason) => write!(f, "invalid series: {}", reason),
            SkipReason::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// In input order.
    pub entries: Vec<ScreenEntry>,
    /// In input order.
    pub skipped: Vec<SkippedSymbol>,
}

impl ScreenReport {
    pub fn buy_candidates(&self) -> impl Iterator<Item = &ScreenEntry> {
        self.entries.iter().filter(|e| e.score.buy_signal)
    }

    pub fn sell_candidates(&self) -> impl Iterator<Item = &ScreenEntry> {
        self.entries.iter().filter(|e| e.score.sell_signal)
    }
}

/// Score the latest bar of every symbol. `config.mode` is ignored; screening
/// always evaluates latest-only.
pub fn screen_universe(
    data_port: &(dyn DataPort + Sync),
    symbols: &[String],
    config: &AnalysisConfig,
) -> ScreenReport {
    let config = AnalysisConfig {
        mode: EvaluationMode::LatestOnly,
        ..*config
    };

    let outcomes: Vec<Result<ScreenEntry, SkippedSymbol>> = symbols
        .par_iter()
        .map(|symbol| screen_one(data_port, symbol, &config))
        .collect();

    let mut report = ScreenReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(entry) => report.entries.push(entry),
            Err(skipped) => report.skipped.push(skipped),
        }
    }

    if !report.skipped.is_empty() {
        info!(
            screened = report.entries.len(),
            total = symbols.len(),
            "some symbols were skipped"
        );
    }
    report
}

fn screen_one(
    data_port: &(dyn DataPort + Sync),
    symbol: &str,
    config: &AnalysisConfig,
) -> Result<ScreenEntry, SkippedSymbol> {
    let series = data_port.fetch_series(symbol).map_err(|e| {
        warn!(symbol, error = %e, "skipping symbol");
        SkippedSymbol {
            symbol: symbol.to_string(),
            reason: SkipReason::from(e),
        }
    })?;

    let frame = annotate(&series, config);
    let last = frame.series().last();
    let score = frame.latest().copied().ok_or_else(|| SkippedSymbol {
        symbol: symbol.to_string(),
        reason: SkipReason::Failed("latest bar was not scored".to_string()),
    })?;
    debug!(symbol, buy = score.buy_score, sell = score.sell_score, "screened");

    Ok(ScreenEntry {
        symbol: symbol.to_string(),
        date: last.date,
        close: last.close,
        score,
        history_complete: frame.history_complete(),
    })
}
