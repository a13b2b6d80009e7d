//! Process-wide registry and free-function façade
//!
//! Every function here operates on one [`LoggerRegistry`], created on first
//! use over the development console backend. Libraries call
//! [`get_logger`] with their subsystem name; the application calls
//! [`setup_logging`] (or [`setup_from_config`]) once it knows where records
//! should go.
//!
//! ```
//! use subsystem_logger::{global, LogLevel};
//!
//! let log = global::get_logger("docs.global");
//! global::set_log_level("docs.global", "error").unwrap();
//! assert!(!log.enabled(LogLevel::Warn));
//! ```

use crate::config::LoggingConfig;
use crate::core::{Core, LevelResolver, LogLevel, Logger, LoggerOption, LoggerRegistry, Result};
use once_cell::sync::Lazy;
use std::sync::Arc;

static REGISTRY: Lazy<LoggerRegistry> = Lazy::new(LoggerRegistry::new);

/// The process-wide registry behind the free functions
pub fn registry() -> &'static LoggerRegistry {
    &REGISTRY
}

/// See [`LoggerRegistry::get_logger`]
pub fn get_logger(name: &str) -> Logger {
    REGISTRY.get_logger(name)
}

/// See [`LoggerRegistry::setup_logging`]
pub fn setup_logging(core: Arc<dyn Core>, resolver: LevelResolver, options: Vec<LoggerOption>) {
    REGISTRY.setup_logging(core, resolver, options);
}

/// Build a backend and resolver from `config` and install them
pub fn setup_from_config(config: &LoggingConfig) -> Result<()> {
    config.apply(&REGISTRY)
}

pub fn set_debug_logging() {
    REGISTRY.set_debug_logging();
}

pub fn set_all_loggers(level: LogLevel) {
    REGISTRY.set_all_loggers(level);
}

/// See [`LoggerRegistry::set_log_level`]
pub fn set_log_level(name: &str, level: &str) -> Result<()> {
    REGISTRY.set_log_level(name, level)
}

/// See [`LoggerRegistry::set_log_level_regex`]
pub fn set_log_level_regex(pattern: &str, level: &str) -> Result<()> {
    REGISTRY.set_log_level_regex(pattern, level)
}

pub fn get_subsystems() -> Vec<String> {
    REGISTRY.get_subsystems()
}
