//! Human-readable key=value formatter

use crate::core::{field_key, FieldValue, Formatter, FormatterConfig, LogEntry, Result};
#[cfg(feature = "console")]
use colored::Colorize;
#[cfg(feature = "console")]
use std::fmt::Write as _;

/// Renders `xtime="…" level=info message=… module=… key=value`
///
/// When writing to a terminal (and the `console` feature is on) the layout
/// switches to `INFO[time] message   key=value` with the level and keys
/// colored.
///
/// # Example
///
/// ```
/// use rust_remote_logger::formatters::TextFormatter;
/// use rust_remote_logger::{Formatter, LogEntry, LogLevel};
///
/// let formatter = TextFormatter::new();
/// let entry = LogEntry::new(LogLevel::Info, "billing", "invoice sent");
/// let line = String::from_utf8(formatter.format(&entry, false).unwrap()).unwrap();
/// assert_eq!(line, "level=info message=\"invoice sent\" module=billing\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    config: FormatterConfig,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn format_plain(&self, entry: &LogEntry) -> String {
        let mut out = String::with_capacity(128);

        if let Some(timestamp) = self.config.render_timestamp(&entry.timestamp) {
            append_pair(&mut out, "xtime", &timestamp);
        }
        append_pair(&mut out, "level", entry.level.to_str());
        append_pair(&mut out, "message", &entry.message);
        append_pair(&mut out, "module", &entry.module);
        for (key, value) in &entry.fields {
            append_pair(&mut out, &field_key(key), &value_text(value));
        }

        out.push('\n');
        out
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, entry: &LogEntry) -> String {
        let color = entry.level.color_code();
        let level_text = entry.level.to_str().to_uppercase().color(color);

        let mut out = String::with_capacity(128);
        match self.config.render_timestamp(&entry.timestamp) {
            Some(timestamp) => {
                let _ = write!(out, "{}[{}] {:<44}", level_text, timestamp, entry.message);
            }
            None => {
                let _ = write!(out, "{} {:<44}", level_text, entry.message);
            }
        }

        let _ = write!(out, " {}={}", "module".color(color), quote(&entry.module));
        for (key, value) in &entry.fields {
            let key = field_key(key);
            let _ = write!(
                out,
                " {}={}",
                (&*key).color(color),
                quote(&value_text(value))
            );
        }

        out.push('\n');
        out
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, entry: &LogEntry) -> String {
        self.format_plain(entry)
    }

    fn use_colors(&self, terminal: bool) -> bool {
        cfg!(feature = "console") && terminal && !self.config.disable_colors
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &LogEntry, terminal: bool) -> Result<Vec<u8>> {
        let text = if self.use_colors(terminal) {
            self.format_colored(entry)
        } else {
            self.format_plain(entry)
        };
        Ok(text.into_bytes())
    }

    fn name(&self) -> &str {
        "text"
    }
}

fn append_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(key);
    out.push('=');
    out.push_str(&quote(value));
}

fn value_text(value: &FieldValue) -> String {
    value.to_string()
}

/// Quote empty values and values with characters outside `[A-Za-z0-9-._/@^+]`
///
/// Only `"` and control characters are escaped. Backslashes pass through, so
/// a message already escaped by [`LogEntry`] is not escaped a second time.
fn quote(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}
