//! Core domain types and logic.

pub mod analysis;
pub mod annotator;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod frame;
pub mod indicator;
pub mod ohlcv;
pub mod scoring;
pub mod universe;
