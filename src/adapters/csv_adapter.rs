//! CSV file data adapter.
//!
//! One file per instrument at `<base_path>/<SYMBOL>.csv` with header
//! `date,open,high,low,close,volume`. Rows may be in any order.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Symbols name files directly under `base_path`, never a nested path.
    fn csv_path(&self, symbol: &str) -> Result<PathBuf, SignalError> {
        let mut components = Path::new(symbol).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !symbol.contains(['/', '\\']);
        if !plain {
            return Err(SignalError::invalid_series(
                symbol,
                "symbol must be a plain file name",
            ));
        }
        Ok(self.base_path.join(format!("{}.csv", symbol)))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
        let path = self.csv_path(symbol)?;
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                SignalError::unavailable(symbol, format!("no file at {}", path.display()))
            }
            _ => SignalError::unavailable(
                symbol,
                format!("failed to read {}: {}", path.display(), e),
            ),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| {
                SignalError::invalid_series(symbol, format!("CSV parse error: {}", e))
            })?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                SignalError::invalid_series(
                    symbol,
                    format!("invalid date '{}' on row {}: {}", row.date, line + 1, e),
                )
            })?;

            bars.push(OhlcvBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        if bars.is_empty() {
            return Err(SignalError::unavailable(
                symbol,
                format!("{} has no rows", path.display()),
            ));
        }

        PriceSeries::from_unsorted(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let entries = fs::read_dir(&self.base_path)?;
        let mut symbols = Vec::new();

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
