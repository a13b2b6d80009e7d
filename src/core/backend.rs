//! Backend capability shared by every layer between a logger and its output

use super::{error::Result, log_context::LogContext, log_entry::LogEntry, log_level::LogLevel};
use std::sync::Arc;

/// A log backend ("core")
///
/// Cores are composable: the registry hands every subsystem a
/// [`LevelGatedCore`](super::LevelGatedCore) over the shared
/// [`CoreHandle`](super::CoreHandle), which in turn delegates to whichever
/// concrete core is installed.
///
/// `write` is unconditional. Callers are expected to have consulted
/// [`check`](Core::check) first.
pub trait Core: Send + Sync {
    /// Whether records at `level` would be accepted
    fn enabled(&self, level: LogLevel) -> bool;

    /// Whether this particular record should be written
    fn check(&self, entry: &LogEntry) -> bool {
        self.enabled(entry.level)
    }

    /// Core that attaches `fields` to every record it writes
    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core>;

    /// Write one record; `fields` are added beneath the record's own context
    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()>;

    /// Flush anything buffered
    fn sync(&self) -> Result<()>;
}

/// A core that accepts nothing and writes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn with_fields(&self, _fields: &LogContext) -> Arc<dyn Core> {
        Arc::new(NopCore)
    }

    fn write(&self, _entry: &LogEntry, _fields: &LogContext) -> Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
