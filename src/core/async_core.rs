//! Core that hands records to a background worker thread

use super::{
    backend::Core,
    error::{LoggerError, Result},
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy},
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for the async worker (5 seconds)
///
/// Used when the last [`AsyncCore`] referencing a worker is dropped.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// Entries drained per wake-up before the inner core is synced
const BATCH_SIZE: usize = 50;

enum Command {
    Write(LogEntry, LogContext),
    Flush(Sender<Result<()>>),
}

struct AsyncShared {
    inner: Arc<dyn Core>,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
    capacity: usize,
    metrics: Arc<LoggerMetrics>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

/// Queues records for a worker thread that writes them to `inner`
///
/// `write` returns as soon as the record is queued, so errors from the inner
/// core surface on the worker: they are counted in
/// [`LoggerMetrics::write_errors`] and reported on stderr. [`sync`](Core::sync)
/// waits until everything queued before it has been written and returns the
/// inner core's sync result.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use subsystem_logger::prelude::*;
///
/// let inner = Arc::new(AppenderCore::new(LogLevel::Info).with_appender(ConsoleAppender::new()));
/// let core = AsyncCore::new(inner, 1024);
/// core.sync().unwrap();
/// ```
#[derive(Clone)]
pub struct AsyncCore {
    shared: Arc<AsyncShared>,
    fields: LogContext,
}

impl AsyncCore {
    pub fn new(inner: Arc<dyn Core>, capacity: usize) -> Self {
        Self::with_config(inner, capacity, OverflowPolicy::default(), None)
    }

    pub fn with_config(
        inner: Arc<dyn Core>,
        capacity: usize,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
    ) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let metrics = Arc::new(LoggerMetrics::new());

        let worker_inner = Arc::clone(&inner);
        let worker_metrics = Arc::clone(&metrics);
        let worker = thread::Builder::new()
            .name("async-log-core".to_string())
            .spawn(move || Self::run_worker(receiver, worker_inner, worker_metrics));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to spawn async worker: {}", e);
                None
            }
        };
        // Without a worker nothing would drain the queue
        let sender = worker.as_ref().map(|_| sender);

        Self {
            shared: Arc::new(AsyncShared {
                inner,
                sender,
                worker,
                capacity,
                metrics,
                overflow_policy,
                on_overflow,
            }),
            fields: LogContext::new(),
        }
    }

    fn run_worker(receiver: Receiver<Command>, inner: Arc<dyn Core>, metrics: Arc<LoggerMetrics>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        // Ends once every sender is gone and the queue is drained
        while let Ok(command) = receiver.recv() {
            batch.push(command);
            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(command) => batch.push(command),
                    Err(_) => break,
                }
            }

            let mut unsynced = false;
            for command in batch.drain(..) {
                match command {
                    Command::Write(entry, fields) => match inner.write(&entry, &fields) {
                        Ok(()) => {
                            metrics.record_written();
                            unsynced = true;
                        }
                        Err(e) => {
                            metrics.record_write_error();
                            eprintln!("[LOGGER ERROR] Async write failed: {}", e);
                        }
                    },
                    Command::Flush(reply) => {
                        unsynced = false;
                        // The caller may have given up waiting
                        let _ = reply.send(inner.sync());
                    }
                }
            }

            if unsynced {
                if let Err(e) = inner.sync() {
                    eprintln!("[LOGGER ERROR] Async sync failed: {}", e);
                }
            }
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Records currently waiting for the worker
    pub fn queued(&self) -> usize {
        self.shared.sender.as_ref().map_or(0, Sender::len)
    }

    fn sender(&self) -> Result<&Sender<Command>> {
        self.shared.sender.as_ref().ok_or(LoggerError::LoggerStopped)
    }

    fn handle_overflow(&self, entry: LogEntry, fields: LogContext) -> Result<()> {
        let shared = &self.shared;
        shared.metrics.record_queue_full();

        if entry.level.priority() == LogPriority::Critical {
            shared.metrics.record_critical_preserved();
            return shared.inner.write(&entry, &fields);
        }

        match &shared.overflow_policy {
            OverflowPolicy::DropNewest => {
                shared.metrics.record_dropped();
                Ok(())
            }
            OverflowPolicy::Block => {
                shared.metrics.record_block();
                self.sender()?
                    .send(Command::Write(entry, fields))
                    .map_err(|_| LoggerError::LoggerStopped)
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                shared.metrics.record_block();
                match self.sender()?.send_timeout(Command::Write(entry, fields), *timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => {
                        self.alert_and_drop();
                        Ok(())
                    }
                    Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::LoggerStopped),
                }
            }
            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Ok(())
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped = self.shared.metrics.record_dropped() + 1;

        // Alert on the first drop and every thousandth after that
        if dropped == 1 || dropped.is_multiple_of(1000) {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} logs dropped. \
                 Consider increasing buffer size or using a different overflow policy.",
                dropped
            );
            if let Some(ref callback) = self.shared.on_overflow {
                callback(dropped);
            }
        }
    }
}

impl Core for AsyncCore {
    fn enabled(&self, level: LogLevel) -> bool {
        self.shared.inner.enabled(level)
    }

    fn with_fields(&self, fields: &LogContext) -> Arc<dyn Core> {
        Arc::new(Self {
            shared: Arc::clone(&self.shared),
            fields: self.fields.merged(fields),
        })
    }

    fn write(&self, entry: &LogEntry, fields: &LogContext) -> Result<()> {
        let fields = self.fields.merged(fields);
        match self.sender()?.try_send(Command::Write(entry.clone(), fields)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(command)) => match command {
                Command::Write(entry, fields) => self.handle_overflow(entry, fields),
                Command::Flush(_) => Ok(()),
            },
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::LoggerStopped),
        }
    }

    fn sync(&self) -> Result<()> {
        let (reply, response) = bounded(1);
        self.sender()?
            .send(Command::Flush(reply))
            .map_err(|_| LoggerError::LoggerStopped)?;
        response.recv().map_err(|_| LoggerError::LoggerStopped)?
    }
}

impl Drop for AsyncShared {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if handle.join().is_err() {
                        eprintln!("[LOGGER ERROR] Async worker thread panicked during shutdown");
                    }
                    break;
                }
                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Async worker thread did not finish within {:?} timeout. \
                         Some logs may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    break;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Async core shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}
