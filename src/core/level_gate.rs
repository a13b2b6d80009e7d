//! Level-gated core wrapper

use super::{
    atomic_level::LevelEnabler, backend::Core, error::Result, log_context::LogContext,
    log_entry::LogEntry, log_level::LogLevel,
};
use std::sync::Arc;

/// Forwards records to `inner` only when `level` enables them
///
/// The level source decides *whether* a record is written, the inner core
/// decides *where*. The inner core's own threshold is not consulted: once a
/// record passes the gate it is written.
///
/// Fields added through [`with_fields`](Core::with_fields) are kept on the
/// wrapper and handed to `inner` on every write, so a derived wrapper keeps
/// both the same gate and the same `inner` (typically a
/// [`CoreHandle`](super::CoreHandle), which must not be frozen to its current
/// backend).
pub struct LevelGatedCore {
    level: Arc<dyn LevelEnabler>,
    inner: Arc<dyn Core>,
    fields: LogContext,
}

impl LevelGatedCore {
    pub fn new(inner: Arc<dyn Core>, level: Arc<dyn LevelEnabler>) -> Self {
        Self {
            level,
            inner,
            fields: LogContext::new(),
        }
    }

    /// Fields accumulated on this wrapper
    pub fn fields(&self) -> &LogContext {
        &self.fields
    }
}

impl Core for LevelGatedCore {
    #[inline]
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core> {
        Arc::new(Self {
            level: Arc::clone(&self.level),
            inner: Arc::clone(&self.inner),
            fields: self.fields.merged(fields),
        })
    }

    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()> {
        if self.fields.is_empty() {
            self.inner.write(entry, fields)
        } else {
            self.inner.write(entry, &self.fields.merged(fields))
        }
    }

    fn sync(&self) -> Result<()> {
        self.inner.sync()
    }
}
