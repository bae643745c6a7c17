//! Engine configuration, read once at startup.

use std::env;
use std::time::Duration;

use thiserror::Error;

use boreal_core::constants::DEFAULT_MAX_POLL_ATTEMPTS;
use boreal_core::constants::DEFAULT_POLL_INTERVAL_MS;
use boreal_core::constants::MAX_RESULT_PAGE_SIZE;

/// Configuration problems that prevent engine construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be set")]
    MissingVariable { name: &'static str },

    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("result page size {size} is outside 1..={max}")]
    PageSizeOutOfRange { size: u32, max: u32 },
}

/// Connection settings for the Athena-backed query engine.
///
/// Everything is injected at construction; nothing here is re-read from
/// the environment after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthenaConfig {
    /// Glue database holding the `metadata` table.
    pub database: String,
    /// Workgroup the executions run under; the account default when `None`.
    pub workgroup: Option<String>,
    /// S3 location for result spill; the workgroup default when `None`.
    pub output_location: Option<String>,
    /// Delay between execution-status polls.
    pub poll_interval: Duration,
    /// Status polls before the execution is declared stuck.
    pub max_poll_attempts: u32,
    /// Rows requested per results page, header row included.
    pub result_page_size: u32,
}

impl AthenaConfig {
    /// Build a config for the given database with stock polling bounds.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            workgroup: None,
            output_location: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            result_page_size: MAX_RESULT_PAGE_SIZE,
        }
    }

    /// Read settings from the `ATHENA_*` environment variables.
    ///
    /// `ATHENA_DATABASE` is required. `ATHENA_WORKGROUP` and
    /// `ATHENA_OUTPUT_LOCATION` are optional strings; the polling and
    /// paging knobs are optional positive integers that fall back to the
    /// stock bounds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = env::var("ATHENA_DATABASE").ok().filter(|v| !v.is_empty()).ok_or(
            ConfigError::MissingVariable {
                name: "ATHENA_DATABASE",
            },
        )?;

        let mut config = Self::new(database);
        config.workgroup = env::var("ATHENA_WORKGROUP").ok().filter(|v| !v.is_empty());
        config.output_location = env::var("ATHENA_OUTPUT_LOCATION").ok().filter(|v| !v.is_empty());

        if let Some(value) = env::var("ATHENA_POLL_INTERVAL_MS").ok().filter(|v| !v.is_empty()) {
            config.poll_interval =
                Duration::from_millis(parse_positive("ATHENA_POLL_INTERVAL_MS", &value)?);
        }
        if let Some(value) = env::var("ATHENA_MAX_POLL_ATTEMPTS").ok().filter(|v| !v.is_empty()) {
            let parsed = parse_positive("ATHENA_MAX_POLL_ATTEMPTS", &value)?;
            config.max_poll_attempts = u32::try_from(parsed).map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "ATHENA_MAX_POLL_ATTEMPTS",
                    value,
                }
            })?;
        }
        if let Some(value) = env::var("ATHENA_RESULT_PAGE_SIZE").ok().filter(|v| !v.is_empty()) {
            let parsed = parse_positive("ATHENA_RESULT_PAGE_SIZE", &value)?;
            config.result_page_size = u32::try_from(parsed).map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "ATHENA_RESULT_PAGE_SIZE",
                    value,
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Bounds-check the numeric knobs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.is_empty() {
            return Err(ConfigError::MissingVariable {
                name: "ATHENA_DATABASE",
            });
        }
        if self.result_page_size == 0 || self.result_page_size > MAX_RESULT_PAGE_SIZE {
            return Err(ConfigError::PageSizeOutOfRange {
                size: self.result_page_size,
                max: MAX_RESULT_PAGE_SIZE,
            });
        }
        if self.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "ATHENA_MAX_POLL_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_config_is_valid() {
        assert!(AthenaConfig::new("geocore").validate().is_ok());
    }

    #[test]
    fn empty_database_is_rejected() {
        let config = AthenaConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingVariable { .. })
        ));
    }

    #[test]
    fn page_size_bounds_are_enforced() {
        let mut config = AthenaConfig::new("geocore");
        config.result_page_size = 0;
        assert!(config.validate().is_err());

        config.result_page_size = MAX_RESULT_PAGE_SIZE + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PageSizeOutOfRange { .. })
        ));

        config.result_page_size = MAX_RESULT_PAGE_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_poll_attempts_are_rejected() {
        let mut config = AthenaConfig::new("geocore");
        config.max_poll_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn positive_integer_parsing() {
        assert_eq!(parse_positive("X", "250").unwrap(), 250);
        assert!(parse_positive("X", "0").is_err());
        assert!(parse_positive("X", "-1").is_err());
        assert!(parse_positive("X", "fast").is_err());
        assert!(parse_positive("X", "").is_err());
    }
}
