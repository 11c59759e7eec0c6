//! Desk configuration
//!
//! Loaded from TOML; every section has defaults so an empty file is valid.

use crate::error::ConfigError;
use chrono::{Local, NaiveDate};
use sbb_model::HotelId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Front-desk session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Hotel the session works on
    pub hotel_id: HotelId,
    /// Fixed "today"; the local date when absent
    pub today: Option<NaiveDate>,
    /// Logging setup used by binaries
    pub logging: LoggingConfig,
    /// Rules enforced by the in-memory backend
    pub backend: BackendRules,
}

impl DeskConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With hotel
    #[inline]
    #[must_use]
    pub fn with_hotel(mut self, hotel_id: HotelId) -> Self {
        self.hotel_id = hotel_id;
        self
    }

    /// With a pinned "today"
    #[inline]
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Current day for occupancy boards and the calendar's today marker
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DeskConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotel_id.get() == 0 {
            return Err(ConfigError::Invalid("hotel_id must be positive".to_string()));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            hotel_id: HotelId(1),
            today: None,
            logging: LoggingConfig::default(),
            backend: BackendRules::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Business rules the backend applies on top of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendRules {
    /// Refuse checkout before the booking's check-out date
    pub forbid_early_checkout: bool,
    /// Refuse closures starting or ending before today
    pub forbid_past_closures: bool,
}

impl Default for BackendRules {
    fn default() -> Self {
        Self {
            forbid_early_checkout: true,
            forbid_past_closures: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = DeskConfig::from_toml("").unwrap();
        assert_eq!(config, DeskConfig::default());
        assert!(config.backend.forbid_early_checkout);
    }

    #[test]
    fn parses_sections() {
        let config = DeskConfig::from_toml(
            r#"
            hotel_id = 3
            today = "2025-06-10"

            [logging]
            filter = "sbb_core=debug"
            json = true

            [backend]
            forbid_past_closures = false
            "#,
        )
        .unwrap();

        assert_eq!(config.hotel_id, HotelId(3));
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert!(config.logging.json);
        assert!(!config.backend.forbid_past_closures);
        assert!(config.backend.forbid_early_checkout);
    }

    #[test]
    fn rejects_zero_hotel() {
        let err = DeskConfig::from_toml("hotel_id = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            DeskConfig::from_toml("hotel_id = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hotel_id = 9").unwrap();
        let config = DeskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hotel_id, HotelId(9));
    }
}
