//! Core logger types and traits

pub mod appender;
pub mod appender_core;
pub mod async_core;
pub mod atomic_level;
pub mod backend;
pub mod core_handle;
pub mod error;
pub mod level_gate;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod overflow_policy;
pub mod registry;
pub mod timestamp;

pub use appender::Appender;
pub use appender_core::AppenderCore;
pub use async_core::{AsyncCore, DEFAULT_SHUTDOWN_TIMEOUT};
pub use atomic_level::{AtomicLevel, LevelEnabler};
pub use backend::{Core, NopCore};
pub use core_handle::CoreHandle;
pub use error::{LoggerError, Result};
pub use level_gate::LevelGatedCore;
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{CoreWrapper, EntryHook, ErrorHandler, Logger, LoggerBuilder, LoggerOption};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
pub use registry::{default_resolver, LevelResolver, LoggerRegistry, WILDCARD};
pub use timestamp::TimestampFormat;
