//! Registry of named subsystem loggers

use super::{
    atomic_level::AtomicLevel,
    backend::Core,
    core_handle::CoreHandle,
    error::{LoggerError, Result},
    level_gate::LevelGatedCore,
    log_level::LogLevel,
    logger::{Logger, LoggerOption},
};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps a subsystem name to its default level
pub type LevelResolver = Arc<dyn Fn(&str) -> LogLevel + Send + Sync>;

/// Subsystem name that addresses every registered logger in
/// [`LoggerRegistry::set_log_level`]
pub const WILDCARD: &str = "*";

/// Resolver used until the registry is configured: everything at `Info`
pub fn default_resolver() -> LevelResolver {
    Arc::new(|_name: &str| LogLevel::Info)
}

struct RegistryState {
    loggers: HashMap<String, Logger>,
    levels: HashMap<String, Arc<AtomicLevel>>,
    resolver: LevelResolver,
    options: Vec<LoggerOption>,
}

/// Named subsystem loggers over one swappable backend
///
/// Each subsystem gets its own [`AtomicLevel`] the first time it is asked
/// for, and a [`Logger`] gated by that level over the registry's shared
/// [`CoreHandle`]. Subsystems are never removed.
///
/// Levels change per subsystem ([`set_log_level`](Self::set_log_level)), by
/// pattern ([`set_log_level_regex`](Self::set_log_level_regex)) or all at once
/// ([`set_all_loggers`](Self::set_all_loggers)); the backend changes for
/// everyone at once ([`setup_logging`](Self::setup_logging)). Neither kind of
/// change rebuilds a logger, so handles obtained earlier stay valid.
///
/// # Example
///
/// ```
/// use subsystem_logger::{LoggerRegistry, LogLevel};
///
/// let registry = LoggerRegistry::new();
/// let net = registry.get_logger("net.tcp");
/// assert!(!net.enabled(LogLevel::Debug));
///
/// registry.set_log_level("net.tcp", "debug").unwrap();
/// assert!(net.enabled(LogLevel::Debug));
/// ```
pub struct LoggerRegistry {
    core: Arc<CoreHandle>,
    state: RwLock<RegistryState>,
}

impl LoggerRegistry {
    /// Registry over the development console backend, every subsystem at `Info`
    pub fn new() -> Self {
        Self::with_core(Arc::new(super::AppenderCore::development()))
    }

    pub fn with_core(core: Arc<dyn Core>) -> Self {
        Self {
            core: Arc::new(CoreHandle::new(core)),
            state: RwLock::new(RegistryState {
                loggers: HashMap::new(),
                levels: HashMap::new(),
                resolver: default_resolver(),
                options: Vec::new(),
            }),
        }
    }

    /// Logger for subsystem `name`, created on first use
    ///
    /// Concurrent first calls for the same name create exactly one entry and
    /// all return handles to it.
    pub fn get_logger(&self, name: &str) -> Logger {
        if let Some(logger) = self.state.read().loggers.get(name) {
            return logger.clone();
        }

        let mut state = self.state.write();
        // Another thread may have created it between the two locks
        if let Some(logger) = state.loggers.get(name) {
            return logger.clone();
        }

        let level = Arc::new(AtomicLevel::new((state.resolver)(name)));
        let gated = LevelGatedCore::new(self.core.clone(), level.clone());
        let logger = Logger::builder(Arc::new(gated))
            .name(name)
            .options(state.options.iter().cloned())
            .build();

        state.levels.insert(name.to_string(), level);
        state.loggers.insert(name.to_string(), logger.clone());
        logger
    }

    /// Install a new backend, resolver and logger options
    ///
    /// Every registered subsystem is re-resolved with `resolver`, overwriting
    /// any level set on it since it was created. Existing loggers are not
    /// rebuilt: they pick up the new backend through the shared handle, but
    /// keep the options they were built with.
    ///
    /// The replaced backend is released after the registry lock, so a slow
    /// shutdown (an [`AsyncCore`](super::AsyncCore) draining its queue) only
    /// delays the caller.
    pub fn setup_logging(
        &self,
        core: Arc<dyn Core>,
        resolver: LevelResolver,
        options: Vec<LoggerOption>,
    ) {
        let previous = {
            let mut state = self.state.write();
            let previous = self.core.swap(core);

            for (name, level) in &state.levels {
                level.set_level(resolver(name));
            }
            state.resolver = resolver;
            state.options = options;
            previous
        };

        // Shutting down the old backend may flush or join a worker, so it
        // happens after the lock is released
        drop(previous);
    }

    /// Set every registered subsystem to `Debug`
    pub fn set_debug_logging(&self) {
        self.set_all_loggers(LogLevel::Debug);
    }

    pub fn set_all_loggers(&self, level: LogLevel) {
        let state = self.state.read();
        for cell in state.levels.values() {
            cell.set_level(level);
        }
    }

    /// Set the level of one subsystem, or of all of them when `name` is `"*"`
    ///
    /// Fails with [`LoggerError::NoSuchLogger`] for a name that was never
    /// passed to [`get_logger`](Self::get_logger); the subsystem is not
    /// created.
    pub fn set_log_level(&self, name: &str, level: &str) -> Result<()> {
        let level: LogLevel = level.parse()?;

        if name == WILDCARD {
            self.set_all_loggers(level);
            return Ok(());
        }

        let state = self.state.read();
        let cell = state
            .levels
            .get(name)
            .ok_or_else(|| LoggerError::no_such_logger(name))?;
        cell.set_level(level);
        Ok(())
    }

    /// Set the level of every registered subsystem whose name matches `pattern`
    ///
    /// Both the level and the pattern are validated before anything changes.
    /// Matching no subsystem is not an error.
    pub fn set_log_level_regex(&self, pattern: &str, level: &str) -> Result<()> {
        let level: LogLevel = level.parse()?;
        let pattern = Regex::new(pattern)?;

        let state = self.state.read();
        for (name, cell) in &state.levels {
            if pattern.is_match(name) {
                cell.set_level(level);
            }
        }
        Ok(())
    }

    /// Names of all registered subsystems, in no particular order
    pub fn get_subsystems(&self) -> Vec<String> {
        self.state.read().loggers.keys().cloned().collect()
    }

    /// Current level of a registered subsystem
    pub fn level(&self, name: &str) -> Option<LogLevel> {
        self.state.read().levels.get(name).map(|cell| cell.level())
    }

    /// The backend currently installed
    pub fn core(&self) -> Arc<dyn Core> {
        self.core.current()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("LoggerRegistry")
            .field("subsystems", &state.loggers.len())
            .field("options", &state.options)
            .finish_non_exhaustive()
    }
}
