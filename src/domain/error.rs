//! Domain error types.

/// Top-level error type for signalscope.
///
/// Only structural problems surface here. Short history, missing signals and
/// exit-date gaps are absorbed into the result types instead.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("price data unavailable for {symbol}: {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("cache error: {reason}")]
    Cache { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub(crate) fn invalid_series(symbol: &str, reason: impl Into<String>) -> Self {
        SignalError::InvalidSeries {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        SignalError::Unavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::Cache { .. } | SignalError::Report { .. } => 3,
            SignalError::InvalidSeries { .. } => 4,
            SignalError::Unavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
