//! Mutable, shareable level thresholds

use super::log_level::LogLevel;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Anything that can answer "is this level enabled"
pub trait LevelEnabler: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;
}

/// A fixed threshold
impl LevelEnabler for LogLevel {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= *self
    }
}

impl<T: LevelEnabler + ?Sized> LevelEnabler for Arc<T> {
    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }
}

/// A threshold that can be changed while loggers are reading it
///
/// Each registered subsystem owns one of these behind an `Arc`; every logger
/// derived from that subsystem reads the same cell.
///
/// # Example
///
/// ```
/// use subsystem_logger::{AtomicLevel, LevelEnabler, LogLevel};
///
/// let level = AtomicLevel::new(LogLevel::Info);
/// assert!(!level.enabled(LogLevel::Debug));
///
/// level.set_level(LogLevel::Debug);
/// assert!(level.enabled(LogLevel::Debug));
/// ```
pub struct AtomicLevel {
    level: AtomicU8,
}

impl AtomicLevel {
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
        }
    }

    pub fn level(&self) -> LogLevel {
        // Only ever stores values produced by `level as u8`
        LogLevel::from_u8(self.level.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Release);
    }
}

impl LevelEnabler for AtomicLevel {
    #[inline]
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for AtomicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLevel").field(&self.level()).finish()
    }
}
