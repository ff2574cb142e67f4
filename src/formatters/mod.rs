//! Formatter implementations

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::core::{FormatterConfig, LogFlags, TimestampFormat};

pub use crate::core::Formatter;

/// Pick the formatter selected by `flags`
pub fn from_flags(flags: LogFlags, timestamp_format: TimestampFormat) -> Box<dyn Formatter> {
    let config = FormatterConfig::new()
        .with_timestamp(flags.contains(LogFlags::TIMESTAMP))
        .with_timestamp_format(timestamp_format);

    if flags.contains(LogFlags::JSON) {
        Box::new(JsonFormatter::with_config(config))
    } else {
        Box::new(TextFormatter::with_config(config))
    }
}
