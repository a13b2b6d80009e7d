//! # Subsystem Logger
//!
//! Named per-subsystem loggers with independently adjustable levels, all
//! writing through one backend that can be replaced at runtime.
//!
//! ## Features
//!
//! - **Subsystem Levels**: every named logger has its own threshold, settable
//!   by name, by regex or all at once
//! - **Hot-Swappable Backend**: reconfiguring reaches loggers handed out earlier
//! - **Concrete Backends**: console and file appenders, plus an async queueing core
//! - **Configuration**: from the environment or any serde source
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use subsystem_logger::prelude::*;
//!
//! let registry = LoggerRegistry::new();
//! let log = registry.get_logger("net.tcp");
//! log.info("listening");
//!
//! // Route everything to stderr as JSON, with `net.tcp` at debug
//! let core = AppenderCore::new(LogLevel::Trace).with_appender(
//!     ConsoleAppender::with_colors(false)
//!         .with_output_format(OutputFormat::Json)
//!         .stderr_only(),
//! );
//! registry.setup_logging(
//!     Arc::new(core),
//!     Arc::new(|name: &str| if name == "net.tcp" { LogLevel::Debug } else { LogLevel::Info }),
//!     Vec::new(),
//! );
//! assert!(log.enabled(LogLevel::Debug));
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::config::{LogOutput, LoggingConfig};
    pub use crate::core::{
        Appender, AppenderCore, AsyncCore, AtomicLevel, Core, CoreHandle, FieldValue,
        LevelEnabler, LevelResolver, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerOption, LoggerRegistry, NopCore, OutputFormat, OverflowPolicy, Result,
        TimestampFormat,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender};
pub use crate::config::{LogOutput, LoggingConfig};
pub use crate::core::{
    default_resolver, Appender, AppenderCore, AsyncCore, AtomicLevel, Core, CoreHandle,
    CoreWrapper, EntryHook, ErrorHandler, FieldValue, LevelEnabler, LevelGatedCore, LevelResolver,
    LogContext, LogEntry, LogLevel, LogPriority, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    LoggerOption, LoggerRegistry, NopCore, OutputFormat, OverflowCallback, OverflowPolicy, Result,
    TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT, WILDCARD,
};
pub use crate::global::{
    get_logger, get_subsystems, registry, set_all_loggers, set_debug_logging, set_log_level,
    set_log_level_regex, setup_from_config, setup_logging,
};
