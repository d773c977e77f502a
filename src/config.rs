// ⚙️ Zakat Configuration - exchange rate, per-head rates, cash threshold
//
// Every calculation takes a &ZakatConfig explicitly. Nothing in the core
// reads settings from ambient state.

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "ZAKAT_CONFIG";

// ============================================================================
// CONFIG ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("exchange_rate must be positive, got {0}")]
    NonPositiveExchangeRate(f64),

    #[error("{field} must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("display_utc_offset_hours must be within -12..=14, got {0}")]
    OffsetOutOfRange(i32),
}

// ============================================================================
// ZAKAT CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatConfig {
    /// Rupiah per kg of rice
    pub exchange_rate: f64,

    /// Rice owed per dependent (kg)
    pub grain_per_head: f64,

    /// Cash owed per dependent (rupiah)
    pub cash_per_head: f64,

    /// Stored values at or above this are read as rupiah when nothing
    /// better is known
    pub cash_threshold: f64,

    /// Offset used when bucketing timestamps by calendar day (WIB = +7)
    pub display_utc_offset_hours: i32,
}

impl Default for ZakatConfig {
    fn default() -> Self {
        ZakatConfig {
            exchange_rate: 15_000.0,
            grain_per_head: 2.5,
            cash_per_head: 45_000.0,
            cash_threshold: 1_000.0,
            display_utc_offset_hours: 7,
        }
    }
}

impl ZakatConfig {
    /// Load config from a JSON file. Missing fields fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ZakatConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        tracing::info!(path = ?path.as_ref(), "loaded zakat config");
        Ok(config)
    }

    /// Load from the file named by `ZAKAT_CONFIG`, or use defaults when unset
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.exchange_rate > 0.0) {
            return Err(ConfigError::NonPositiveExchangeRate(self.exchange_rate));
        }

        for (field, value) in [
            ("grain_per_head", self.grain_per_head),
            ("cash_per_head", self.cash_per_head),
            ("cash_threshold", self.cash_threshold),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }

        if !(-12..=14).contains(&self.display_utc_offset_hours) {
            return Err(ConfigError::OffsetOutOfRange(self.display_utc_offset_hours));
        }

        Ok(())
    }

    /// Fixed offset for calendar-day bucketing
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display_utc_offset_hours * 3600).unwrap_or(Utc.fix())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = ZakatConfig::default();

        assert_eq!(config.exchange_rate, 15_000.0);
        assert_eq!(config.grain_per_head, 2.5);
        assert_eq!(config.cash_per_head, 45_000.0);
        assert_eq!(config.cash_threshold, 1_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_exchange_rate() {
        let config = ZakatConfig {
            exchange_rate: 0.0,
            ..ZakatConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveExchangeRate(0.0))
        );
    }

    #[test]
    fn test_rejects_negative_per_head() {
        let config = ZakatConfig {
            cash_per_head: -1.0,
            ..ZakatConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeValue { field: "cash_per_head", .. })
        ));
    }

    #[test]
    fn test_from_file_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "exchange_rate": 16000 }}"#).unwrap();

        let config = ZakatConfig::from_file(file.path()).unwrap();

        assert_eq!(config.exchange_rate, 16_000.0);
        assert_eq!(config.grain_per_head, 2.5);
    }

    #[test]
    fn test_from_file_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "display_utc_offset_hours": 30 }}"#).unwrap();

        assert!(ZakatConfig::from_file(file.path()).is_err());
    }
}
