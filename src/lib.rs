//! # Rust Remote Logger
//!
//! A structured logging facade that streams records to a remote collector
//! over TCP and falls back to local output while the collector is
//! unreachable.
//!
//! ## Features
//!
//! - **Leveled**: debug, info, warning, error, fatal and panic records
//! - **Structured**: attached key/value fields, text or JSON rendering
//! - **Self-healing**: a dead connection is detected before each write and
//!   redialed on demand, with local fallback in between
//! - **Thread Safe**: one logger can be shared by any number of threads

pub mod core;
pub mod formatters;
pub mod macros;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_support;

pub mod prelude {
    pub use crate::core::{
        init_logger, FieldValue, Fields, Formatter, FormatterConfig, LogContext, LogEntry,
        LogFlags, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
        SinkMetrics, TimestampFormat,
    };
    pub use crate::formatters::{JsonFormatter, TextFormatter};
    pub use crate::sink::{
        Connection, ConnectionStatus, LocalStream, OutputSink, TcpTransport, Transport,
    };
}

pub use self::core::{
    init_logger, ExitHandler, FieldValue, Fields, Formatter, FormatterConfig, LogContext,
    LogEntry, LogFlags, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerContext,
    LoggerError, Result, SinkMetrics, TimestampFormat, FATAL_EXIT_CODE,
};
pub use formatters::{JsonFormatter, TextFormatter};
pub use sink::{Connection, ConnectionStatus, LocalStream, OutputSink, TcpTransport, Transport};
