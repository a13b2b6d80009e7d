//! Declarative logging configuration
//!
//! A [`LoggingConfig`] describes the backend (format, destination, optional
//! async queue) and the per-subsystem levels. It can be deserialized with
//! serde or read from the environment:
//!
//! | Variable       | Meaning                                               |
//! |----------------|-------------------------------------------------------|
//! | `LOG_LEVEL`    | `"<default>,<name>=<level>,..."`, e.g. `warn,net=debug` |
//! | `LOG_FORMAT`   | `text`, `json` or `logfmt`                             |
//! | `LOG_FILE`     | write to this file instead of the console             |
//! | `LOG_OUTPUT`   | `stdout`, `stderr`, or a file path                     |
//! | `LOG_NO_COLOR` | any non-empty value disables colors                   |

use crate::appenders::{ConsoleAppender, FileAppender};
use crate::core::{
    AppenderCore, AsyncCore, Core, LevelResolver, LogLevel, LoggerError, LoggerRegistry,
    OutputFormat, OverflowPolicy, Result, TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_LEVEL: &str = "LOG_LEVEL";
pub const ENV_FORMAT: &str = "LOG_FORMAT";
pub const ENV_FILE: &str = "LOG_FILE";
pub const ENV_OUTPUT: &str = "LOG_OUTPUT";
pub const ENV_NO_COLOR: &str = "LOG_NO_COLOR";

/// Where the configured backend writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Console; `Error` and `Fatal` still go to stderr
    #[default]
    Stdout,
    /// Console, everything on stderr
    Stderr,
    File(PathBuf),
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value {
            "stdout" => LogOutput::Stdout,
            "stderr" => LogOutput::Stderr,
            path => LogOutput::File(PathBuf::from(path)),
        }
    }
}

/// Backend and level configuration for a [`LoggerRegistry`]
///
/// ```
/// use subsystem_logger::config::LoggingConfig;
/// use subsystem_logger::LogLevel;
///
/// let config: LoggingConfig = serde_json::from_str(
///     r#"{"level": "warn", "subsystems": {"net": "debug"}, "format": "json"}"#,
/// ).unwrap();
///
/// let resolve = config.resolver();
/// assert_eq!(resolve("net"), LogLevel::Debug);
/// assert_eq!(resolve("db"), LogLevel::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level of every subsystem without an override
    pub level: LogLevel,
    pub subsystems: BTreeMap<String, LogLevel>,
    pub format: OutputFormat,
    pub timestamp: TimestampFormat,
    pub output: LogOutput,
    pub colors: bool,
    /// Queue records through an [`AsyncCore`] of this capacity
    pub async_buffer: Option<usize>,
    pub overflow_policy: OverflowPolicy,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            subsystems: BTreeMap::new(),
            format: OutputFormat::Text,
            timestamp: TimestampFormat::default(),
            output: LogOutput::Stdout,
            colors: true,
            async_buffer: None,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl LoggingConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(spec) = lookup(ENV_LEVEL) {
            let (level, subsystems) = parse_level_spec(&spec)?;
            if let Some(level) = level {
                config.level = level;
            }
            config.subsystems = subsystems;
        }

        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = parse_format(&format)?;
        }

        if let Some(output) = lookup(ENV_OUTPUT).filter(|v| !v.is_empty()) {
            config.output = LogOutput::parse(&output);
        }
        if let Some(path) = lookup(ENV_FILE).filter(|v| !v.is_empty()) {
            config.output = LogOutput::File(PathBuf::from(path));
        }

        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            config.colors = false;
        }

        Ok(config)
    }

    /// Per-subsystem overrides falling back to the default level
    pub fn resolver(&self) -> LevelResolver {
        let default = self.level;
        let overrides = self.subsystems.clone();
        Arc::new(move |name: &str| overrides.get(name).copied().unwrap_or(default))
    }

    /// Lowest level any subsystem is configured at
    pub fn min_level(&self) -> LogLevel {
        self.subsystems
            .values()
            .copied()
            .fold(self.level, LogLevel::min)
    }

    /// Build the backend this configuration describes
    pub fn build_core(&self) -> Result<Arc<dyn Core>> {
        let core = AppenderCore::new(self.min_level());

        let core = match &self.output {
            LogOutput::Stdout => core.with_appender(self.console()),
            LogOutput::Stderr => core.with_appender(self.console().stderr_only()),
            LogOutput::File(path) => core.with_appender(
                FileAppender::new(path)?
                    .with_output_format(self.format.clone())
                    .with_timestamp_format(self.timestamp.clone()),
            ),
        };

        match self.async_buffer {
            Some(0) => Err(LoggerError::config(
                "async_buffer",
                "queue capacity must be at least 1",
            )),
            Some(capacity) => Ok(Arc::new(AsyncCore::with_config(
                Arc::new(core),
                capacity,
                self.overflow_policy.clone(),
                None,
            ))),
            None => Ok(Arc::new(core)),
        }
    }

    /// Install this configuration into `registry`
    ///
    /// Nothing changes if the backend cannot be built.
    pub fn apply(&self, registry: &LoggerRegistry) -> Result<()> {
        let core = self.build_core()?;
        registry.setup_logging(core, self.resolver(), Vec::new());
        Ok(())
    }

    fn console(&self) -> ConsoleAppender {
        ConsoleAppender::with_colors(self.colors)
            .with_output_format(self.format.clone())
            .with_timestamp_format(self.timestamp.clone())
    }
}

/// Parse `"<default>,<name>=<level>,..."`
///
/// The default part is optional and may appear anywhere; empty items are
/// skipped. Later entries win.
pub fn parse_level_spec(spec: &str) -> Result<(Option<LogLevel>, BTreeMap<String, LogLevel>)> {
    let mut default = None;
    let mut subsystems = BTreeMap::new();

    for item in spec.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        match item.split_once('=') {
            Some((name, level)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(LoggerError::config(
                        ENV_LEVEL,
                        format!("missing subsystem name in '{}'", item),
                    ));
                }
                subsystems.insert(name.to_string(), level.trim().parse()?);
            }
            None => default = Some(item.parse()?),
        }
    }

    Ok((default, subsystems))
}

fn parse_format(value: &str) -> Result<OutputFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        "logfmt" => Ok(OutputFormat::Logfmt),
        other => Err(LoggerError::config(
            ENV_FORMAT,
            format!("unknown format '{}', expected text, json or logfmt", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_level_spec() {
        let (default, subsystems) = parse_level_spec("warn, net=debug,db.pool = TRACE,").unwrap();

        assert_eq!(default, Some(LogLevel::Warn));
        assert_eq!(subsystems.get("net"), Some(&LogLevel::Debug));
        assert_eq!(subsystems.get("db.pool"), Some(&LogLevel::Trace));
    }

    #[test]
    fn test_level_spec_without_default() {
        let (default, subsystems) = parse_level_spec("net=error").unwrap();
        assert_eq!(default, None);
        assert_eq!(subsystems.len(), 1);
    }

    #[test]
    fn test_level_spec_errors() {
        assert!(matches!(
            parse_level_spec("net=loud"),
            Err(LoggerError::UnknownLevel(_))
        ));
        assert!(matches!(
            parse_level_spec("=debug"),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_from_lookup() {
        let config = LoggingConfig::from_lookup(lookup(&[
            (ENV_LEVEL, "error,http=info"),
            (ENV_FORMAT, "JSON"),
            (ENV_OUTPUT, "stderr"),
            (ENV_NO_COLOR, "1"),
        ]))
        .unwrap();

        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(!config.colors);
        assert_eq!(config.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_file_overrides_output() {
        let config = LoggingConfig::from_lookup(lookup(&[
            (ENV_OUTPUT, "stdout"),
            (ENV_FILE, "/tmp/app.log"),
        ]))
        .unwrap();
        assert_eq!(config.output, LogOutput::File(PathBuf::from("/tmp/app.log")));
    }

    #[test]
    fn test_unknown_format() {
        let err = LoggingConfig::from_lookup(lookup(&[(ENV_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_empty_environment_is_default() {
        let config = LoggingConfig::from_lookup(|_key: &str| None).unwrap();
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{"output": {"file": "app.log"}, "async_buffer": 64, "overflow_policy": "block"}"#,
        )
        .unwrap();

        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.output, LogOutput::File(PathBuf::from("app.log")));
        assert_eq!(config.async_buffer, Some(64));
        assert_eq!(config.overflow_policy, OverflowPolicy::Block);
    }

    #[test]
    fn test_apply_writes_to_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("app.log");
        let config = LoggingConfig {
            level: LogLevel::Warn,
            subsystems: BTreeMap::from([("chatty".to_string(), LogLevel::Debug)]),
            output: LogOutput::File(path.clone()),
            format: OutputFormat::Logfmt,
            ..LoggingConfig::default()
        };

        let registry = LoggerRegistry::with_core(Arc::new(crate::core::NopCore));
        let quiet = registry.get_logger("quiet");
        config.apply(&registry).unwrap();
        let chatty = registry.get_logger("chatty");

        quiet.info("dropped");
        quiet.warn("kept");
        chatty.debug("also kept");
        registry.core().sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("dropped"));
        assert!(content.contains("logger=quiet"));
        assert!(content.contains("logger=chatty"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_zero_async_buffer_is_rejected() {
        let config = LoggingConfig {
            async_buffer: Some(0),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            config.build_core(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
