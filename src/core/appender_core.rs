//! Core that fans records out to a list of appenders

use super::{
    appender::Appender,
    atomic_level::LevelEnabler,
    backend::Core,
    error::{LoggerError, Result},
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use crate::appenders::ConsoleAppender;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type SharedAppenders = Arc<Mutex<Vec<Box<dyn Appender>>>>;

/// Writes every record to each of its appenders
///
/// **Per-Appender Panic Isolation**: each appender call is wrapped in
/// `catch_unwind`, so one failing appender cannot keep the others from
/// receiving the record. The first failure (error or panic) is returned once
/// every appender has been tried.
///
/// Cores derived with [`with_fields`](Core::with_fields) share the appender
/// list with their parent.
///
/// # Example
///
/// ```
/// use subsystem_logger::prelude::*;
///
/// let core = AppenderCore::new(LogLevel::Info).with_appender(ConsoleAppender::with_colors(false));
/// assert!(core.enabled(LogLevel::Warn));
/// assert!(!core.enabled(LogLevel::Debug));
/// ```
pub struct AppenderCore {
    level: Arc<dyn LevelEnabler>,
    fields: LogContext,
    appenders: SharedAppenders,
}

impl AppenderCore {
    pub fn new(level: LogLevel) -> Self {
        Self::with_level_enabler(Arc::new(level))
    }

    pub fn with_level_enabler(level: Arc<dyn LevelEnabler>) -> Self {
        Self {
            level,
            fields: LogContext::new(),
            appenders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Console output at `Debug`, the backend installed before any setup
    pub fn development() -> Self {
        Self::new(LogLevel::Debug).with_appender(ConsoleAppender::new())
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_appender<A: Appender + 'static>(self, appender: A) -> Self {
        self.add_appender(Box::new(appender));
        self
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.lock().push(appender);
    }

    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|appender| appender.name().to_string())
            .collect()
    }
}

/// Extract a printable message from a caught panic payload
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn appender_panicked(name: &str, operation: &str, payload: Box<dyn Any + Send>) -> LoggerError {
    let message = panic_message(payload);
    eprintln!(
        "[LOGGER CRITICAL] Appender '{}' panicked during {}: {}. \
         Other appenders were not affected.",
        name, operation, message
    );
    LoggerError::appender_panic(name, message)
}

impl Core for AppenderCore {
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core> {
        Arc::new(Self {
            level: Arc::clone(&self.level),
            fields: self.fields.merged(fields),
            appenders: Arc::clone(&self.appenders),
        })
    }

    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()> {
        let entry = entry.with_merged_fields(&self.fields.merged(fields));
        let mut first_error = None;

        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            let outcome = match catch_unwind(AssertUnwindSafe(|| appender.append(&entry))) {
                Ok(result) => result,
                Err(payload) => Err(appender_panicked(appender.name(), "write", payload)),
            };
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn sync(&self) -> Result<()> {
        let mut first_error = None;

        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            let outcome = match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
                Ok(result) => result,
                Err(payload) => Err(appender_panicked(appender.name(), "flush", payload)),
            };
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
