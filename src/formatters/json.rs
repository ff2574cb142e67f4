//! JSON formatter for structured logging

use crate::core::{field_key, Formatter, FormatterConfig, LogEntry, Result};

/// Writes each record as a single-line JSON object
///
/// Compatible with log aggregation tools like ELK, Loki, etc.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: false,
        }
    }

    /// Multi-line output, for humans reading a local stream
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn to_value(&self, entry: &LogEntry) -> serde_json::Value {
        let mut json_obj = serde_json::Map::new();

        if let Some(timestamp) = self.config.render_timestamp(&entry.timestamp) {
            let value = if self.config.timestamp_format.is_numeric() {
                serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
            } else {
                serde_json::Value::String(timestamp)
            };
            json_obj.insert("xtime".to_string(), value);
        }

        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        json_obj.insert(
            "module".to_string(),
            serde_json::Value::String(entry.module.clone()),
        );

        for (key, value) in &entry.fields {
            json_obj.insert(field_key(key).into_owned(), value.to_json_value());
        }

        serde_json::Value::Object(json_obj)
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry, _terminal: bool) -> Result<Vec<u8>> {
        let value = self.to_value(entry);
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn name(&self) -> &str {
        "json"
    }
}
