//! Logger handle and its construction options

use super::{
    atomic_level::LevelEnabler,
    backend::Core,
    error::{LoggerError, Result},
    level_gate::LevelGatedCore,
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Runs after every record a logger successfully writes
pub type EntryHook = Arc<dyn Fn(&LogEntry) -> Result<()> + Send + Sync>;

/// Receives write errors from the fire-and-forget logging methods
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Decorates the core a logger is built on
pub type CoreWrapper = Arc<dyn Fn(Arc<dyn Core>) -> Arc<dyn Core> + Send + Sync>;

/// Construction-time modifier for a [`Logger`]
///
/// Options are applied in order when the logger is built. A logger never
/// looks at them again, so changing the option list only affects loggers
/// built afterwards.
#[derive(Clone)]
pub enum LoggerOption {
    /// Attach fields to every record
    Fields(LogContext),
    /// Annotate records with the caller's file and line
    AddCaller,
    WithCaller(bool),
    /// Extra static gate; can raise the threshold but never lower it
    IncreaseLevel(LogLevel),
    Hooks(Vec<EntryHook>),
    ErrorOutput(ErrorHandler),
    WrapCore(CoreWrapper),
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerOption::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            LoggerOption::AddCaller => write!(f, "AddCaller"),
            LoggerOption::WithCaller(enabled) => {
                f.debug_tuple("WithCaller").field(enabled).finish()
            }
            LoggerOption::IncreaseLevel(level) => {
                f.debug_tuple("IncreaseLevel").field(level).finish()
            }
            LoggerOption::Hooks(hooks) => write!(f, "Hooks({})", hooks.len()),
            LoggerOption::ErrorOutput(_) => write!(f, "ErrorOutput(..)"),
            LoggerOption::WrapCore(_) => write!(f, "WrapCore(..)"),
        }
    }
}

fn stderr_error_output() -> ErrorHandler {
    Arc::new(|err: &LoggerError| {
        eprintln!("[LOGGER ERROR] Failed to write log entry: {}", err);
    })
}

#[derive(Clone)]
struct LoggerSettings {
    add_caller: bool,
    hooks: Vec<EntryHook>,
    error_output: ErrorHandler,
}

/// Handle a subsystem logs through
///
/// Cloning is cheap and clones share everything. Derived loggers
/// ([`with_fields`](Logger::with_fields), [`named`](Logger::named)) share the
/// level gate and the backend indirection of their parent.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use subsystem_logger::prelude::*;
///
/// let core = Arc::new(AppenderCore::new(LogLevel::Info).with_appender(ConsoleAppender::new()));
/// let logger = Logger::builder(core)
///     .name("net")
///     .option(LoggerOption::Fields(LogContext::new().with_field("pid", 42)))
///     .build();
///
/// logger.info("listening");
/// logger.named("tcp").warn("connection reset");
/// ```
#[derive(Clone)]
pub struct Logger {
    name: Option<Arc<str>>,
    core: Arc<dyn Core>,
    settings: Arc<LoggerSettings>,
}

impl Logger {
    /// Build a logger over `core` with `options` applied in order
    pub fn new(core: Arc<dyn Core>, options: &[LoggerOption]) -> Self {
        Logger::builder(core).options(options.iter().cloned()).build()
    }

    #[must_use]
    pub fn builder(core: Arc<dyn Core>) -> LoggerBuilder {
        LoggerBuilder::new(core)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn core(&self) -> &Arc<dyn Core> {
        &self.core
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    /// Child logger named `<name>.<child>`, sharing this logger's gate
    #[must_use]
    pub fn named(&self, child: &str) -> Logger {
        if child.is_empty() {
            return self.clone();
        }
        let name = match self.name {
            Some(ref parent) => format!("{}.{}", parent, child),
            None => child.to_string(),
        };
        Logger {
            name: Some(Arc::from(name)),
            core: Arc::clone(&self.core),
            settings: Arc::clone(&self.settings),
        }
    }

    /// Logger that attaches `fields` to every record
    #[must_use]
    pub fn with_fields(&self, fields: LogContext) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        Logger {
            name: self.name.clone(),
            core: self.core.with_fields(&fields),
            settings: Arc::clone(&self.settings),
        }
    }

    #[track_caller]
    fn make_entry(
        &self,
        level: LogLevel,
        message: String,
        context: Option<LogContext>,
    ) -> LogEntry {
        let mut entry = LogEntry::new(level, message);
        if let Some(ref name) = self.name {
            entry = entry.with_logger_name(name.as_ref());
        }
        if self.settings.add_caller {
            let caller = Location::caller();
            entry.file = Some(caller.file().to_string());
            entry.line = Some(caller.line());
        }
        if let Some(context) = context {
            entry = entry.with_context(context);
        }
        entry
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        if !self.core.check(entry) {
            return Ok(());
        }
        self.core.write(entry, &LogContext::new())?;
        for hook in &self.settings.hooks {
            hook(entry)?;
        }
        Ok(())
    }

    /// Log `message`, returning any backend error
    ///
    /// Records below the threshold are dropped and return `Ok`.
    #[track_caller]
    pub fn try_log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        let entry = self.make_entry(level, message.into(), None);
        self.write_entry(&entry)
    }

    #[track_caller]
    pub fn try_log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        let entry = self.make_entry(level, message.into(), Some(context));
        self.write_entry(&entry)
    }

    /// Log `message`; backend errors go to the configured error output
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if let Err(e) = self.try_log(level, message) {
            (self.settings.error_output)(&e);
        }
    }

    /// Log with structured context fields
    #[track_caller]
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) {
        if let Err(e) = self.try_log_with_context(level, message, context) {
            (self.settings.error_output)(&e);
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Logs at `Fatal`; the process keeps running
    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    #[track_caller]
    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    #[track_caller]
    pub fn error_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }

    /// Flush the backend
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("add_caller", &self.settings.add_caller)
            .field("hooks", &self.settings.hooks.len())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
pub struct LoggerBuilder {
    core: Arc<dyn Core>,
    name: Option<String>,
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    pub fn new(core: Arc<dyn Core>) -> Self {
        Self {
            core,
            name: None,
            options: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: impl IntoIterator<Item = LoggerOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn build(self) -> Logger {
        let mut core = self.core;
        let mut fields = LogContext::new();
        let mut settings = LoggerSettings {
            add_caller: false,
            hooks: Vec::new(),
            error_output: stderr_error_output(),
        };

        for option in self.options {
            match option {
                LoggerOption::Fields(extra) => fields.extend(&extra),
                LoggerOption::AddCaller => settings.add_caller = true,
                LoggerOption::WithCaller(enabled) => settings.add_caller = enabled,
                LoggerOption::IncreaseLevel(floor) => {
                    let gate = Arc::new(AtLeast {
                        floor,
                        inner: Arc::clone(&core),
                    });
                    core = Arc::new(LevelGatedCore::new(core, gate));
                }
                LoggerOption::Hooks(hooks) => settings.hooks.extend(hooks),
                LoggerOption::ErrorOutput(handler) => settings.error_output = handler,
                LoggerOption::WrapCore(wrap) => core = wrap(core),
            }
        }

        if !fields.is_empty() {
            core = core.with_fields(&fields);
        }

        Logger {
            name: self.name.map(Arc::from),
            core,
            settings: Arc::new(settings),
        }
    }
}

/// Static floor stacked on top of a core's own gate
struct AtLeast {
    floor: LogLevel,
    inner: Arc<dyn Core>,
}

impl LevelEnabler for AtLeast {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.floor && self.inner.enabled(level)
    }
}
