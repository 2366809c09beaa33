//! Serializable scan configuration.
//!
//! One `ScanConfig` is built at startup (from TOML or defaults) and handed to
//! the driver. There is no process-wide default symbol or handler state.

use std::path::{Path, PathBuf};

use fibscan_core::config::{EvaluatorConfig, DEFAULT_SERIES_CAPACITY};
use fibscan_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SYMBOL: &str = "XAUUSD";
pub const DEFAULT_RECORD_FILE: &str = "fibscan_signals.csv";
pub const DEFAULT_INTERVAL_MS: u64 = 3_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("invalid evaluator parameters: {0}")]
    Core(#[from] CoreError),
}

/// Everything the driver needs to run scan cycles for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Opaque instrument label stamped on records and notifications.
    pub symbol: String,

    /// Whether scan cycles run at all. Does not change evaluation logic.
    pub enabled: bool,

    /// Whether emitted signals are passed to the notifier.
    pub notifications: bool,

    /// Bound of the bar series buffer.
    pub series_capacity: usize,

    /// CSV file that receives one row per emitted signal.
    pub record_path: PathBuf,

    /// Delay between cycles in watch mode.
    pub interval_ms: u64,

    pub evaluator: EvaluatorConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            enabled: true,
            notifications: true,
            series_capacity: DEFAULT_SERIES_CAPACITY,
            record_path: PathBuf::from(DEFAULT_RECORD_FILE),
            interval_ms: DEFAULT_INTERVAL_MS,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.series_capacity == 0 {
            return Err(CoreError::InvalidCapacity {
                capacity: self.series_capacity,
            }
            .into());
        }
        self.evaluator.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.symbol, "XAUUSD");
        assert_eq!(config.series_capacity, 500);
        assert_eq!(config.evaluator.swing_lookback, 60);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ScanConfig {
            symbol: "EURUSD".into(),
            notifications: false,
            evaluator: EvaluatorConfig::with_periods(5, 10, 20),
            ..ScanConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        let back = ScanConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let text = r#"
            symbol = "BTCUSD"

            [evaluator]
            slow_period = 34
        "#;
        let config = ScanConfig::from_toml_str(text).unwrap();
        assert_eq!(config.symbol, "BTCUSD");
        assert_eq!(config.evaluator.slow_period, 34);
        assert_eq!(config.evaluator.fast_period, 8);
        assert!(config.enabled);
        assert_eq!(config.interval_ms, 3_000);
    }

    #[test]
    fn zero_period_rejected_on_load() {
        let text = r#"
            [evaluator]
            fast_period = 0
        "#;
        let err = ScanConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Core(CoreError::InvalidPeriod { period: 0 })
        ));
    }

    #[test]
    fn empty_symbol_rejected() {
        let err = ScanConfig::from_toml_str("symbol = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySymbol));
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ScanConfig::from_toml_str("series_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Core(CoreError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = ScanConfig::from_toml_str("symbol = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ScanConfig::load(Path::new("/nonexistent/fibscan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
