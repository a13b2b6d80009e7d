//! Line formats for records written by the appenders

use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// How an appender renders one record as a line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO ] net.tcp - accepted (src/net.rs:42) peer=10.0.0.7`
    #[default]
    Text,

    /// One JSON object per line with the record's fields as top-level keys
    Json,

    /// `key=value` pairs, message always quoted
    Logfmt,
}

impl OutputFormat {
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => Self::text_line(
                entry,
                timestamp_format.format(&entry.timestamp),
                format!("{:5}", entry.level.to_str()),
                Self::source_label(entry),
            ),
            OutputFormat::Json => json_line(entry, timestamp_format),
            OutputFormat::Logfmt => logfmt_line(entry, timestamp_format),
        }
    }

    /// Text layout shared with the colored console output
    pub(crate) fn text_line(
        entry: &LogEntry,
        timestamp: impl Display,
        level: impl Display,
        source: impl Display,
    ) -> String {
        let mut line = format!("[{}] [{}] {} - {}", timestamp, level, source, entry.message);
        if let Some(caller) = caller(entry) {
            line.push_str(&format!(" ({})", caller));
        }
        if let Some(context) = entry.context.as_ref().filter(|c| !c.is_empty()) {
            line.push(' ');
            line.push_str(&context.format_fields());
        }
        line
    }

    /// Subsystem name for named records, the thread otherwise
    pub(crate) fn source_label(entry: &LogEntry) -> &str {
        entry
            .logger_name
            .as_deref()
            .or(entry.thread_name.as_deref())
            .unwrap_or(&entry.thread_id)
    }
}

fn caller(entry: &LogEntry) -> Option<String> {
    let file = entry.file.as_deref()?;
    let line = entry.line?;
    Some(format!("{}:{}", file, line))
}

/// Record keys that fields with the same name never replace
const RESERVED: [&str; 6] = ["timestamp", "level", "logger", "message", "caller", "thread"];

fn json_line(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut object = Map::new();

    let timestamp = match timestamp_format.as_number(&entry.timestamp) {
        Some(epoch) => Value::from(epoch),
        None => Value::from(timestamp_format.format(&entry.timestamp)),
    };
    object.insert("timestamp".into(), timestamp);
    object.insert("level".into(), Value::from(entry.level.to_str()));
    if let Some(name) = &entry.logger_name {
        object.insert("logger".into(), Value::from(name.as_str()));
    }
    object.insert("message".into(), Value::from(entry.message.as_str()));
    if let Some(caller) = caller(entry) {
        object.insert("caller".into(), Value::from(caller));
    }
    let thread = entry.thread_name.as_deref().unwrap_or(&entry.thread_id);
    object.insert("thread".into(), Value::from(thread));

    if let Some(context) = &entry.context {
        for (key, value) in context.fields() {
            if !RESERVED.contains(&key.as_str()) {
                object.insert(key.clone(), value.to_json_value());
            }
        }
    }

    Value::Object(object).to_string()
}

fn logfmt_line(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut pairs = vec![
        format!(
            "timestamp={}",
            logfmt_value(&timestamp_format.format(&entry.timestamp))
        ),
        format!("level={}", entry.level.to_str()),
    ];
    if let Some(name) = &entry.logger_name {
        pairs.push(format!("logger={}", logfmt_value(name)));
    }
    pairs.push(format!("message={}", quoted(&entry.message)));
    if let Some(caller) = caller(entry) {
        pairs.push(format!("caller={}", logfmt_value(&caller)));
    }

    if let Some(context) = &entry.context {
        for (key, value) in context.fields() {
            let key: String = key
                .chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
                .collect();
            if key.is_empty() || RESERVED.contains(&key.as_str()) {
                continue;
            }
            let value = match value {
                FieldValue::String(s) => logfmt_value(s),
                other => other.to_string(),
            };
            pairs.push(format!("{}={}", key, value));
        }
    }

    pairs.join(" ")
}

/// Bare when it is a single token, quoted otherwise
fn logfmt_value(value: &str) -> String {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '=' | '\\'));
    if bare {
        value.to_string()
    } else {
        quoted(value)
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
