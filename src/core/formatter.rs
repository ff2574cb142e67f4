//! Formatter trait turning a log entry into bytes

use super::{error::Result, log_entry::LogEntry};
use std::borrow::Cow;

/// Keys every record carries; attached fields may not shadow them
pub const RESERVED_KEYS: [&str; 4] = ["xtime", "level", "message", "module"];

pub trait Formatter: Send + Sync {
    /// Render one record, including the trailing newline
    ///
    /// `terminal` tells whether the bytes are headed for an interactive
    /// terminal, so text output may use colors.
    fn format(&self, entry: &LogEntry, terminal: bool) -> Result<Vec<u8>>;
    fn name(&self) -> &str;
}

/// Rename an attached field that collides with a reserved key
pub fn field_key(key: &str) -> Cow<'_, str> {
    if RESERVED_KEYS.contains(&key) {
        Cow::Owned(format!("fields.{}", key))
    } else {
        Cow::Borrowed(key)
    }
}
