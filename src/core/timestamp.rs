//! Timestamp formats for log output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ISO8601_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const ISO8601_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// How appenders render `LogEntry::timestamp`
///
/// Deserializes from snake_case names (`"iso8601"`, `"unix_millis"`, ...) or
/// `{"custom": "<strftime>"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// UTC with millisecond precision
    #[default]
    Iso8601,
    Iso8601Micros,
    Rfc3339,
    /// Seconds since the epoch
    Unix,
    UnixMillis,
    UnixMicros,
    /// strftime pattern
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, time: &DateTime<Utc>) -> String {
        if let Some(epoch) = self.as_number(time) {
            return epoch.to_string();
        }
        match self {
            TimestampFormat::Iso8601Micros => time.format(ISO8601_MICROS).to_string(),
            TimestampFormat::Rfc3339 => time.to_rfc3339(),
            TimestampFormat::Custom(pattern) => time.format(pattern).to_string(),
            _ => time.format(ISO8601_MILLIS).to_string(),
        }
    }

    /// Epoch value of `time` for the Unix formats, `None` for textual ones
    #[must_use]
    pub fn as_number(&self, time: &DateTime<Utc>) -> Option<i64> {
        match self {
            TimestampFormat::Unix => Some(time.timestamp()),
            TimestampFormat::UnixMillis => Some(time.timestamp_millis()),
            TimestampFormat::UnixMicros => Some(time.timestamp_micros()),
            _ => None,
        }
    }

    /// Unix formats are emitted as JSON numbers rather than strings
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_number(&DateTime::<Utc>::UNIX_EPOCH).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-08T10:30:45.123456Z
    fn instant() -> DateTime<Utc> {
        DateTime::from_timestamp_micros(1_736_332_245_123_456).expect("in range")
    }

    #[test]
    fn test_textual_formats() {
        let cases = [
            (TimestampFormat::Iso8601, "2025-01-08T10:30:45.123Z"),
            (TimestampFormat::Iso8601Micros, "2025-01-08T10:30:45.123456Z"),
            (TimestampFormat::Rfc3339, "2025-01-08T10:30:45.123456+00:00"),
            (
                TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S".to_string()),
                "08/Jan/2025:10:30:45",
            ),
        ];
        for (format, expected) in cases {
            assert_eq!(format.format(&instant()), expected, "{:?}", format);
            assert_eq!(format.as_number(&instant()), None);
            assert!(!format.is_numeric());
        }
    }

    #[test]
    fn test_epoch_formats_render_their_number() {
        assert_eq!(
            TimestampFormat::Unix.as_number(&instant()),
            Some(1_736_332_245)
        );
        assert_eq!(
            TimestampFormat::UnixMillis.format(&instant()),
            "1736332245123"
        );
        assert_eq!(
            TimestampFormat::UnixMicros.format(&instant()),
            "1736332245123456"
        );
        assert!(TimestampFormat::UnixMicros.is_numeric());
    }

    #[test]
    fn test_config_names() {
        let format: TimestampFormat = serde_json::from_str("\"unix_millis\"").unwrap();
        assert_eq!(format, TimestampFormat::UnixMillis);

        let format: TimestampFormat = serde_json::from_str(r#"{"custom":"%Y"}"#).unwrap();
        assert_eq!(format, TimestampFormat::Custom("%Y".to_string()));
    }
}
