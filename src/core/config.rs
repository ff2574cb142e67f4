//! Declarative logger configuration
//!
//! `LoggerConfig` can be deserialized from any serde format and turned into
//! a [`Logger`](crate::Logger) with [`Logger::from_config`](crate::Logger::from_config).

use super::{
    error::{LoggerError, Result},
    flags::LogFlags,
    log_level::LogLevel,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Logger settings
///
/// # Example
///
/// ```
/// use rust_remote_logger::LoggerConfig;
///
/// let config: LoggerConfig = serde_json::from_str(
///     r#"{"name": "billing", "level": "warn", "json": true}"#,
/// ).unwrap();
/// assert_eq!(config.name, "billing");
/// assert!(config.address.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Module name attached to every record
    pub name: String,
    /// Severity threshold name; `debug` when absent
    pub level: Option<String>,
    /// Collector `host:port`; local output when absent or empty
    pub address: Option<String>,
    /// Render the `xtime` field
    pub timestamp: bool,
    /// Render JSON instead of key=value text
    pub json: bool,
    pub timestamp_format: TimestampFormat,
    pub connect_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: None,
            address: None,
            timestamp: false,
            json: false,
            timestamp_format: TimestampFormat::default(),
            connect_timeout_ms: None,
            write_timeout_ms: None,
        }
    }
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> LogFlags {
        let mut flags = LogFlags::empty();
        if self.timestamp {
            flags |= LogFlags::TIMESTAMP;
        }
        if self.json {
            flags |= LogFlags::JSON;
        }
        flags
    }

    /// Parsed threshold
    ///
    /// # Errors
    ///
    /// [`LoggerError::InvalidLevel`] for an unrecognised name.
    pub fn level(&self) -> Result<LogLevel> {
        match self.level.as_deref() {
            None | Some("") => Ok(LogLevel::Debug),
            Some(name) => name.parse(),
        }
    }

    /// Collector address, with an empty string treated as absent
    pub fn remote_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }

    pub fn connect_timeout(&self) -> Result<Option<Duration>> {
        positive_millis("connect_timeout_ms", self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Result<Option<Duration>> {
        positive_millis("write_timeout_ms", self.write_timeout_ms)
    }
}

fn positive_millis(field: &str, value: Option<u64>) -> Result<Option<Duration>> {
    match value {
        Some(0) => Err(LoggerError::config(
            "LoggerConfig",
            format!("{} must be greater than zero", field),
        )),
        Some(ms) => Ok(Some(Duration::from_millis(ms))),
        None => Ok(None),
    }
}
