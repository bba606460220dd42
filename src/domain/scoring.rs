//! Weighted buy/sell scoring over a single annotated bar.
//!
//! Six conditions each contribute a fixed weight when they hold. The same
//! table serves both directions; `Direction` flips each comparison. Weights
//! are kept in whole percentage points and converted once, so a score is
//! always an exact multiple of 0.01 and thresholds compare cleanly.

use crate::domain::error::SignalError;
use crate::domain::frame::IndicatorRow;
use std::fmt;
use std::str::FromStr;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const WILLIAMS_OVERSOLD: f64 = -80.0;
pub const WILLIAMS_OVERBOUGHT: f64 = -20.0;
pub const ADX_TRENDING: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// SMA50 above (buy) or below (sell) SMA200.
    TrendAlignment,
    /// RSI below 30 (buy) or above 70 (sell).
    RsiExtreme,
    /// Close at or through the lower (buy) or upper (sell) band.
    BandBreach,
    /// MACD above (buy) or below (sell) its signal line.
    MacdCross,
    /// Williams %R below -80 (buy) or above -20 (sell).
    WilliamsExtreme,
    /// ADX above 20, either direction.
    TrendStrength,
}

impl Condition {
    /// Whether the condition holds for `direction`. Missing inputs never hold.
    pub fn holds(self, direction: Direction, close: f64, row: &IndicatorRow) -> bool {
        use Direction::{Buy, Sell};

        match self {
            Condition::TrendAlignment => match (row.sma50, row.sma200, direction) {
                (Some(fast), Some(slow), Buy) => fast > slow,
                (Some(fast), Some(slow), Sell) => fast < slow,
                _ => false,
            },
            Condition::RsiExtreme => row.rsi.is_some_and(|rsi| match direction {
                Buy => rsi < RSI_OVERSOLD,
                Sell => rsi > RSI_OVERBOUGHT,
            }),
            Condition::BandBreach => match direction {
                Buy => row.lower_band.is_some_and(|lower| close <= lower),
                Sell => row.upper_band.is_some_and(|upper| close >= upper),
            },
            Condition::MacdCross => match (row.macd, row.macd_signal, direction) {
                (Some(line), Some(signal), Buy) => line > signal,
                (Some(line), Some(signal), Sell) => line < signal,
                _ => false,
            },
            Condition::WilliamsExtreme => row.williams_r.is_some_and(|wr| match direction {
                Buy => wr < WILLIAMS_OVERSOLD,
                Sell => wr > WILLIAMS_OVERBOUGHT,
            }),
            Condition::TrendStrength => row.adx.is_some_and(|adx| adx > ADX_TRENDING),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedRule {
    pub condition: Condition,
    /// Weight in percentage points.
    pub points: u32,
}

pub const RULES: [WeightedRule; 6] = [
    WeightedRule {
        condition: Condition::TrendAlignment,
        points: 25,
    },
    WeightedRule {
        condition: Condition::RsiExtreme,
        points: 15,
    },
    WeightedRule {
        condition: Condition::BandBreach,
        points: 15,
    },
    WeightedRule {
        condition: Condition::MacdCross,
        points: 15,
    },
    WeightedRule {
        condition: Condition::WilliamsExtreme,
        points: 15,
    },
    WeightedRule {
        condition: Condition::TrendStrength,
        points: 15,
    },
];

pub fn score_points(direction: Direction, close: f64, row: &IndicatorRow) -> u32 {
    RULES
        .iter()
        .filter(|rule| rule.condition.holds(direction, close, row))
        .map(|rule| rule.points)
        .sum()
}

/// Sum of the weights whose condition holds, in [0, 1].
pub fn score(direction: Direction, close: f64, row: &IndicatorRow) -> f64 {
    f64::from(score_points(direction, close, row)) / 100.0
}

/// Strict: a score equal to the threshold does not signal.
pub fn exceeds_threshold(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl ScoringConfig {
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Result<Self, SignalError> {
        check_threshold("buy_threshold", buy_threshold)?;
        check_threshold("sell_threshold", sell_threshold)?;
        Ok(Self {
            buy_threshold,
            sell_threshold,
        })
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            buy_threshold: 0.5,
            sell_threshold: 0.5,
        }
    }
}

fn check_threshold(key: &str, value: f64) -> Result<(), SignalError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SignalError::ConfigInvalid {
            section: "signals".to_string(),
            key: key.to_string(),
            reason: format!("{} must be between 0 and 1, got {}", key, value),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalScore {
    pub buy_score: f64,
    pub sell_score: f64,
    pub buy_signal: bool,
    pub sell_signal: bool,
}

pub fn score_bar(close: f64, row: &IndicatorRow, config: &ScoringConfig) -> SignalScore {
    let buy_score = score(Direction::Buy, close, row);
    let sell_score = score(Direction::Sell, close, row);
    SignalScore {
        buy_score,
        sell_score,
        buy_signal: exceeds_threshold(buy_score, config.buy_threshold),
        sell_signal: exceeds_threshold(sell_score, config.sell_threshold),
    }
}

/// Which bars of a frame get scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    #[default]
    AllRows,
    LatestOnly,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMode::AllRows => write!(f, "all-rows"),
            EvaluationMode::LatestOnly => write!(f, "latest-only"),
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all-rows" | "all" => Ok(EvaluationMode::AllRows),
            "latest-only" | "latest" => Ok(EvaluationMode::LatestOnly),
            other => Err(format!(
                "unknown evaluation mode '{}', expected all-rows or latest-only",
                other
            )),
        }
    }
}
