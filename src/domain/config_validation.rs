//! Configuration validation.
//!
//! Validates config fields before any instrument is analysed. Missing
//! `[signals]` keys fall back to defaults; present but malformed values are
//! errors rather than silently defaulted.

use crate::domain::error::SignalError;
use crate::domain::scoring::EvaluationMode;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_threshold(config, "buy_threshold")?;
    validate_threshold(config, "sell_threshold")?;
    validate_positive_days(config, "hold_period")?;
    validate_positive_days(config, "lookback_window")?;
    validate_mode(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(SignalError::ConfigInvalid {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
            reason: "csv_dir must not be empty".to_string(),
        }),
        None => Err(SignalError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

fn validate_threshold(config: &dyn ConfigPort, key: &str) -> Result<(), SignalError> {
    let Some(raw) = config.get_string("signals", key) else {
        return Ok(());
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid(key, "must be a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(key, &format!("{} must be between 0 and 1", key)));
    }
    Ok(())
}

fn validate_positive_days(config: &dyn ConfigPort, key: &str) -> Result<(), SignalError> {
    let Some(raw) = config.get_string("signals", key) else {
        return Ok(());
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(key, "must be a whole number of days"))?;
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(invalid(key, &format!("{} must be a positive number of days", key)));
    }
    Ok(())
}

fn validate_mode(config: &dyn ConfigPort) -> Result<(), SignalError> {
    if let Some(raw) = config.get_string("signals", "mode") {
        raw.parse::<EvaluationMode>()
            .map_err(|reason| invalid("mode", &reason))?;
    }
    Ok(())
}

fn invalid(key: &str, reason: &str) -> SignalError {
    SignalError::ConfigInvalid {
        section: "signals".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn assert_invalid_key(result: Result<(), SignalError>, expected: &str) {
        match result {
            Err(SignalError::ConfigInvalid { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected ConfigInvalid for {}, got {:?}", expected, other),
        }
    }

    #[test]
    fn empty_signals_section_uses_defaults() {
        assert!(validate_analysis_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn full_valid_config() {
        let config = MapConfig::new(&[
            ("signals", "buy_threshold", "0.55"),
            ("signals", "sell_threshold", "0"),
            ("signals", "hold_period", "10"),
            ("signals", "lookback_window", "730"),
            ("signals", "mode", "latest-only"),
        ]);
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn threshold_out_of_range() {
        let config = MapConfig::new(&[("signals", "buy_threshold", "1.2")]);
        assert_invalid_key(validate_analysis_config(&config), "buy_threshold");
    }

    #[test]
    fn threshold_not_a_number() {
        let config = MapConfig::new(&[("signals", "sell_threshold", "high")]);
        assert_invalid_key(validate_analysis_config(&config), "sell_threshold");
    }

    #[test]
    fn hold_period_must_be_positive() {
        let config = MapConfig::new(&[("signals", "hold_period", "0")]);
        assert_invalid_key(validate_analysis_config(&config), "hold_period");

        let config = MapConfig::new(&[("signals", "hold_period", "-5")]);
        assert_invalid_key(validate_analysis_config(&config), "hold_period");
    }

    #[test]
    fn lookback_must_be_whole_days() {
        let config = MapConfig::new(&[("signals", "lookback_window", "365.5")]);
        assert_invalid_key(validate_analysis_config(&config), "lookback_window");
    }

    #[test]
    fn unknown_mode() {
        let config = MapConfig::new(&[("signals", "mode", "weekly")]);
        assert_invalid_key(validate_analysis_config(&config), "mode");
    }

    #[test]
    fn csv_dir_required() {
        let result = validate_data_config(&MapConfig::new(&[]));
        assert!(matches!(result, Err(SignalError::ConfigMissing { .. })));

        let result = validate_data_config(&MapConfig::new(&[("data", "csv_dir", "  ")]));
        assert!(matches!(result, Err(SignalError::ConfigInvalid { .. })));

        let result = validate_data_config(&MapConfig::new(&[("data", "csv_dir", "./data")]));
        assert!(result.is_ok());
    }
}
