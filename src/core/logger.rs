//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::Result,
    flags::LogFlags,
    formatter::Formatter,
    log_context::{FieldValue, Fields, LogContext, LoggerContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    timestamp::TimestampFormat,
};
use crate::formatters;
use crate::sink::{LocalStream, OutputSink, TcpTransport, Transport};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Called after a fatal record is written; must not return
pub type ExitHandler = fn(i32) -> !;

/// Exit code used for fatal records
pub const FATAL_EXIT_CODE: i32 = 1;

/// Named, level-gated logger writing through an [`OutputSink`]
///
/// All methods take `&self`; share a logger between threads with `Arc`.
///
/// # Example
///
/// ```
/// use rust_remote_logger::prelude::*;
///
/// let logger = Logger::new("AppName", "", LogFlags::empty())?;
/// logger.add_field("region", "eu-west");
/// logger.info("service started");
///
/// logger.set_log_level("error")?;
/// logger.info("this message is filtered");
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    context: LoggerContext,
    formatter: Box<dyn Formatter>,
    sink: Arc<OutputSink>,
    exit_handler: ExitHandler,
}

impl Logger {
    /// Create a logger at Debug level
    ///
    /// An empty `address` writes to stdout. Otherwise `address` is a
    /// `host:port` dialed over TCP before this returns.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Connection`](crate::LoggerError::Connection) if the
    /// collector cannot be reached.
    pub fn new(name: impl Into<String>, address: &str, flags: LogFlags) -> Result<Self> {
        Self::builder(name).address(address).flags(flags).build()
    }

    /// Build a logger from declarative settings
    ///
    /// Unlike [`init_logger`], an unknown level name is an error here.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let mut builder = Self::builder(config.name.clone())
            .level(config.level()?)
            .flags(config.flags())
            .timestamp_format(config.timestamp_format.clone());

        if let Some(address) = config.remote_address() {
            builder = builder.address(address);
        }
        if let Some(timeout) = config.connect_timeout()? {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.write_timeout()? {
            builder = builder.write_timeout(timeout);
        }

        builder.build()
    }

    /// Module name attached to every record
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the threshold by name
    ///
    /// # Errors
    ///
    /// [`LoggerError::InvalidLevel`](crate::LoggerError::InvalidLevel) for an
    /// unrecognised name; the current threshold is left unchanged.
    pub fn set_log_level(&self, name: &str) -> Result<()> {
        let level: LogLevel = name.parse()?;
        self.set_level(level);
        Ok(())
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn log_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Current threshold name, e.g. `"warning"`
    pub fn log_level_name(&self) -> &'static str {
        self.log_level().to_str()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Attach a field to every later record; the last value for a key wins
    pub fn add_field<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.set(key, value);
    }

    pub fn add_fields<I, K, V>(&self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.extend(fields);
    }

    /// Snapshot of the attached fields
    pub fn fields(&self) -> Fields {
        self.context.get_fields()
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(level, message.into(), LogContext::new());
    }

    /// Log with per-call fields; they win over attached fields of the same key
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(level, message.into(), context);
    }

    fn emit(&self, level: LogLevel, message: String, mut context: LogContext) {
        self.sink.check_and_reconnect();

        self.context.merge_into(&mut context);
        let entry = LogEntry::new(level, self.name.as_str(), message.as_str())
            .with_fields(context.into_fields());

        match self.formatter.format(&entry, self.sink.is_terminal()) {
            Ok(bytes) => self.sink.write(&bytes),
            Err(e) => eprintln!(
                "[LOGGER ERROR] Formatter '{}' failed: {}",
                self.formatter.name(),
                e
            ),
        }

        match level {
            LogLevel::Fatal => {
                let _ = self.sink.flush();
                (self.exit_handler)(FATAL_EXIT_CODE)
            }
            // Payload is the caller's text, not the escaped record message
            LogLevel::Panic => std::panic::panic_any(message),
            _ => {}
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Write the record, then terminate the process via the exit handler
    ///
    /// Returns only when Fatal is below the threshold.
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Write the record, then unwind with the message as panic payload
    ///
    /// The unwind can be caught with `std::panic::catch_unwind`.
    #[inline]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(LogLevel::Panic, message);
    }
}

/// Create a logger the forgiving way
///
/// An empty `severity` means `debug`. A severity that fails to parse is
/// downgraded to a warning on stderr and the logger is still returned at
/// Debug, so the caller never has to handle a logger and an error together.
/// A failed dial is the only error. Use [`Logger::from_config`] or
/// [`Logger::set_log_level`] to get the parse error back.
///
/// ```
/// use rust_remote_logger::{init_logger, LogFlags};
///
/// let logger = init_logger("AppName", "warning", "", LogFlags::TIMESTAMP).unwrap();
/// assert_eq!(logger.log_level_name(), "warning");
/// ```
pub fn init_logger(name: &str, severity: &str, address: &str, flags: LogFlags) -> Result<Logger> {
    let logger = Logger::new(name, address, flags)?;
    let severity = if severity.is_empty() { "debug" } else { severity };
    if let Err(e) = logger.set_log_level(severity) {
        eprintln!("[LOGGER WARNING] {}; keeping level '{}'", e, logger.log_level_name());
    }
    Ok(logger)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_remote_logger::prelude::*;
///
/// let logger = Logger::builder("worker")
///     .level(LogLevel::Info)
///     .flags(LogFlags::JSON | LogFlags::TIMESTAMP)
///     .local(LocalStream::Stderr)
///     .build()?;
/// assert_eq!(logger.name(), "worker");
/// # Ok::<(), LoggerError>(())
/// ```
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    address: Option<String>,
    flags: LogFlags,
    timestamp_format: TimestampFormat,
    formatter: Option<Box<dyn Formatter>>,
    transport: Option<Arc<dyn Transport>>,
    local: LocalStream,
    sink: Option<Arc<OutputSink>>,
    exit_handler: ExitHandler,
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Debug,
            address: None,
            flags: LogFlags::empty(),
            timestamp_format: TimestampFormat::default(),
            formatter: None,
            transport: None,
            local: LocalStream::Stdout,
            sink: None,
            exit_handler: std::process::exit,
            connect_timeout: None,
            write_timeout: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Collector `host:port`; an empty string keeps output local
    #[must_use = "builder methods return a new value"]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.address = (!address.is_empty()).then_some(address);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: LogFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Replace the formatter chosen by the flags
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Transport used to dial the collector (TCP by default)
    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Local stream used without a collector and as the fallback
    #[must_use = "builder methods return a new value"]
    pub fn local(mut self, local: LocalStream) -> Self {
        self.local = local;
        self
    }

    /// Write through an existing sink, e.g. one shared by several loggers
    ///
    /// Address, transport, local stream and timeouts are ignored.
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(mut self, handler: ExitHandler) -> Self {
        self.exit_handler = handler;
        self
    }

    /// Bound each dial of the default TCP transport
    #[must_use = "builder methods return a new value"]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound each write of the default TCP transport
    #[must_use = "builder methods return a new value"]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    fn default_transport(&self) -> Arc<dyn Transport> {
        let mut transport = TcpTransport::new();
        if let Some(timeout) = self.connect_timeout {
            transport = transport.with_connect_timeout(timeout);
        }
        if let Some(timeout) = self.write_timeout {
            transport = transport.with_write_timeout(timeout);
        }
        Arc::new(transport)
    }

    /// Build the Logger, dialing the collector if an address was given
    pub fn build(mut self) -> Result<Logger> {
        let sink = match (self.sink.take(), self.address.take()) {
            (Some(sink), _) => sink,
            (None, Some(address)) => {
                let transport = match self.transport.take() {
                    Some(transport) => transport,
                    None => self.default_transport(),
                };
                let local = std::mem::take(&mut self.local);
                Arc::new(OutputSink::connect(address, transport, local)?)
            }
            (None, None) => Arc::new(OutputSink::local(std::mem::take(&mut self.local))),
        };

        let formatter = match self.formatter {
            Some(formatter) => formatter,
            None => formatters::from_flags(self.flags, self.timestamp_format),
        };

        Ok(Logger {
            name: self.name,
            min_level: RwLock::new(self.level),
            context: LoggerContext::new(),
            formatter,
            sink,
            exit_handler: self.exit_handler,
        })
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}
