//! CSV report adapter implementing ReportPort.
//!
//! Writes one row per bar: OHLCV, every indicator column, both scores and
//! both signal flags. Not-computable values are left as empty cells.

use crate::domain::analysis::InstrumentAnalysis;
use crate::domain::error::SignalError;
use crate::domain::frame::{Column, ScoredFrame};
use crate::ports::report_port::ReportPort;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

const BASE_HEADERS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const SCORE_HEADERS: [&str; 4] = ["buy_score", "sell_score", "buy_signal", "sell_signal"];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, analysis: &InstrumentAnalysis, output_path: &Path) -> Result<(), SignalError> {
        let file = File::create(output_path).map_err(|e| SignalError::Report {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        write_frame(&analysis.frame, file)?;
        info!(
            symbol = %analysis.symbol,
            rows = analysis.frame.len(),
            path = %output_path.display(),
            "wrote scored frame"
        );
        Ok(())
    }
}

/// Serialise `frame` as CSV into `out`.
pub fn write_frame<W: Write>(frame: &ScoredFrame, out: W) -> Result<(), SignalError> {
    let mut wtr = csv::Writer::from_writer(out);

    let headers = BASE_HEADERS
        .iter()
        .copied()
        .chain(Column::ALL.iter().map(|c| c.name()))
        .chain(SCORE_HEADERS.iter().copied());
    wtr.write_record(headers).map_err(report_error)?;

    for row in frame.rows() {
        let bar = row.bar;
        let mut record = vec![
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        record.extend(Column::ALL.iter().map(|&c| cell(row.indicators.get(c))));
        record.push(cell(row.score.map(|s| s.buy_score)));
        record.push(cell(row.score.map(|s| s.sell_score)));
        record.push(row.buy_signal().to_string());
        record.push(row.sell_signal().to_string());
        wtr.write_record(&record).map_err(report_error)?;
    }

    wtr.flush()?;
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn report_error(e: csv::Error) -> SignalError {
    SignalError::Report {
        reason: format!("CSV write error: {}", e),
    }
}
