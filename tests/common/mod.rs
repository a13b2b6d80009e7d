//! Test backends shared by the integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use subsystem_logger::{Core, LogContext, LogEntry, LogLevel, LoggerError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub logger: Option<String>,
    pub level: LogLevel,
    pub message: String,
    pub fields: LogContext,
}

/// Core that keeps every record it is asked to write
#[derive(Clone)]
pub struct Recorder {
    level: LogLevel,
    fields: LogContext,
    records: Arc<Mutex<Vec<Record>>>,
    syncs: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_level(LogLevel::Trace)
    }

    /// Recorder whose own `enabled` accepts only `level` and above
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            fields: LogContext::new(),
            records: Arc::new(Mutex::new(Vec::new())),
            syncs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }

    pub fn core(&self) -> Arc<dyn Core> {
        Arc::new(self.clone())
    }
}

impl Core for Recorder {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core> {
        let mut derived = self.clone();
        derived.fields = self.fields.merged(fields);
        Arc::new(derived)
    }

    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()> {
        let entry = entry.with_merged_fields(&self.fields.merged(fields));
        self.records.lock().push(Record {
            logger: entry.logger_name.clone(),
            level: entry.level,
            message: entry.message.clone(),
            fields: entry.context.unwrap_or_default(),
        });
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Core whose writes and syncs always fail
pub struct Failing;

impl Core for Failing {
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn with_fields(&self, _fields: &LogContext) -> Arc<dyn Core> {
        Arc::new(Failing)
    }

    fn write(&self, _entry: &LogEntry, _fields: &LogContext) -> Result<()> {
        Err(LoggerError::writer("disk on fire"))
    }

    fn sync(&self) -> Result<()> {
        Err(LoggerError::writer("cannot sync"))
    }
}
