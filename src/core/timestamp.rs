//! Timestamp formatting utilities
//!
//! Provides the timestamp formats used for the `xtime` field. The default is
//! wall-clock time with microsecond precision in the local time zone.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format options for the `xtime` field
///
/// # Examples
///
/// ```
/// use rust_remote_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Clock;
/// let timestamp = format.format(&Local::now());
/// // Output: "10:30:45.123456"
/// assert_eq!(timestamp.len(), 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Clock time with microseconds: `10:30:45.123456`
    #[default]
    Clock,

    /// ISO 8601 with microseconds and offset: `2025-01-08T10:30:45.123456+01:00`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+01:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    ///
    /// Rendered as a JSON number by the JSON formatter.
    UnixMillis,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_remote_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Local>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Clock => datetime.format("%H:%M:%S%.6f").to_string(),
            TimestampFormat::Iso8601Micros => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
            }
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Check if this is a numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

/// Configuration shared by the built-in formatters
///
/// # Examples
///
/// ```
/// use rust_remote_logger::core::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp(true)
///     .with_timestamp_format(TimestampFormat::Rfc3339);
/// assert!(config.include_timestamp);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Whether the `xtime` field is rendered
    pub include_timestamp: bool,
    /// Timestamp format for the `xtime` field
    pub timestamp_format: TimestampFormat,
    /// Never colorize, even when writing to a terminal
    pub disable_colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_timestamp: false,
            timestamp_format: TimestampFormat::default(),
            disable_colors: false,
        }
    }
}

impl FormatterConfig {
    /// Create a new formatter configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to render the `xtime` field
    #[must_use]
    pub fn with_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Set the timestamp format
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Turn terminal colors off
    #[must_use]
    pub fn with_disable_colors(mut self, disable: bool) -> Self {
        self.disable_colors = disable;
        self
    }

    /// Render the entry timestamp, or `None` when timestamps are off
    pub(crate) fn render_timestamp(&self, datetime: &DateTime<Local>) -> Option<String> {
        self.include_timestamp
            .then(|| self.timestamp_format.format(datetime))
    }
}
