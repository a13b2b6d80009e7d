//! Swappable indirection to the active backend

use super::{
    appender_core::AppenderCore, backend::Core, error::Result, log_context::LogContext,
    log_entry::LogEntry, log_level::LogLevel,
};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Holds the currently installed backend and forwards every call to it
///
/// Loggers keep an `Arc<CoreHandle>` rather than the backend itself, so
/// [`set`](CoreHandle::set) re-points every logger at once. Each call loads
/// the backend afresh; nothing is cached between calls.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use subsystem_logger::{Core, CoreHandle, LogLevel, NopCore};
///
/// let handle = CoreHandle::development();
/// assert!(handle.enabled(LogLevel::Debug));
///
/// handle.set(Arc::new(NopCore));
/// assert!(!handle.enabled(LogLevel::Fatal));
/// ```
pub struct CoreHandle {
    current: ArcSwap<Arc<dyn Core>>,
}

impl CoreHandle {
    pub fn new(core: Arc<dyn Core>) -> Self {
        Self {
            current: ArcSwap::from_pointee(core),
        }
    }

    /// Handle over [`AppenderCore::development`]
    pub fn development() -> Self {
        Self::new(Arc::new(AppenderCore::development()))
    }

    /// Install a new backend
    ///
    /// The previous backend is dropped here if nothing else holds it. Use
    /// [`swap`](CoreHandle::swap) to control where that happens.
    pub fn set(&self, core: Arc<dyn Core>) {
        self.current.store(Arc::new(core));
    }

    /// Install a new backend and hand back the one it replaces
    pub fn swap(&self, core: Arc<dyn Core>) -> Arc<dyn Core> {
        let previous = self.current.swap(Arc::new(core));
        Arc::clone(&*previous)
    }

    /// The backend installed right now
    pub fn current(&self) -> Arc<dyn Core> {
        Arc::clone(&**self.current.load())
    }
}

impl Core for CoreHandle {
    fn enabled(&self, level: LogLevel) -> bool {
        self.current.load().enabled(level)
    }

    fn check(&self, entry: &LogEntry) -> bool {
        self.current.load().check(entry)
    }

    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core> {
        self.current.load().with_fields(fields)
    }

    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()> {
        self.current.load().write(entry, fields)
    }

    fn sync(&self) -> Result<()> {
        self.current.load().sync()
    }
}

impl Default for CoreHandle {
    fn default() -> Self {
        Self::development()
    }
}

impl fmt::Debug for CoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreHandle").finish_non_exhaustive()
    }
}
