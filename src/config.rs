//! Form configuration
//!
//! Loaded from a JSON file; every key is optional and falls back to its
//! default. The loaded configuration is validated before use.

use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::countries::{self, Country};
use crate::observability::{Logger, Severity};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Interpreter and host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Country preselected by phone inputs (alpha-2)
    #[serde(default = "default_country")]
    pub default_country: String,

    /// chrono format string for date picker display
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Lowest log severity written (trace, info, warn, error, fatal)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Message attached to each failing required field
    #[serde(default = "default_required_message")]
    pub required_message: String,
}

fn default_country() -> String {
    "PK".to_string()
}
fn default_date_format() -> String {
    // "January 5, 2025"
    "%B %-d, %Y".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_required_message() -> String {
    "This field is required".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_country: default_country(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            required_message: default_required_message(),
        }
    }
}

impl FormConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: FormConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if countries::lookup(&self.default_country).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown default_country '{}'",
                self.default_country
            )));
        }

        if self.date_format.trim().is_empty() {
            return Err(ConfigError::Invalid("date_format must not be empty".into()));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "invalid date_format '{}'",
                self.date_format
            )));
        }

        self.log_severity()?;

        if self.required_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "required_message must not be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// Applies the log level process-wide
    pub fn install_logging(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.log_severity()?);
        Ok(())
    }

    /// Country preselected by phone inputs
    pub fn phone_country(&self) -> &'static Country {
        countries::lookup(&self.default_country)
            .or_else(|| countries::lookup(&default_country()))
            .unwrap_or(&countries::COUNTRIES[0])
    }

    pub fn default_calling_code(&self) -> u16 {
        self.phone_country().calling_code
    }
}
