//! Core logger types and traits

pub mod config;
pub mod error;
pub mod flags;
pub mod formatter;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use flags::LogFlags;
pub use formatter::{field_key, Formatter, RESERVED_KEYS};
pub use log_context::{FieldValue, Fields, LogContext, LoggerContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{init_logger, ExitHandler, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::SinkMetrics;
pub use timestamp::{FormatterConfig, TimestampFormat};
