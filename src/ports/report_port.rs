//! Report generation port.

use crate::domain::analysis::InstrumentAnalysis;
use crate::domain::error::SignalError;
use std::path::Path;

/// Port for writing an instrument's scored frame for display elsewhere.
pub trait ReportPort {
    fn write(&self, analysis: &InstrumentAnalysis, output_path: &Path) -> Result<(), SignalError>;
}
