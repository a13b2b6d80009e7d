//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// Output destination driven by an [`AppenderCore`](super::AppenderCore)
///
/// Records reaching an appender already carry every field in
/// `entry.context`.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
