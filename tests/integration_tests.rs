//! Integration tests for the subsystem registry
//!
//! These tests verify:
//! - Subsystem creation and identity
//! - Level changes by name, wildcard, regex and in bulk
//! - Backend hot swap reaching loggers handed out earlier
//! - Field accumulation on derived loggers
//! - Error propagation from backends
//! - File and async backends end to end

mod common;

use common::{Failing, Recorder};
use std::fs;
use std::sync::Arc;
use subsystem_logger::{
    AppenderCore, AsyncCore, FileAppender, LogContext, LogLevel, LoggerError, LoggerOption,
    LoggerRegistry, LoggingConfig, OutputFormat, OverflowPolicy,
};
use tempfile::TempDir;

fn registry_with(recorder: &Recorder) -> LoggerRegistry {
    LoggerRegistry::with_core(recorder.core())
}

#[test]
fn test_same_subsystem_is_one_entry() {
    let recorder = Recorder::new();
    let registry = registry_with(&recorder);

    let first = registry.get_logger("storage");
    let second = registry.get_logger("storage");
    assert_eq!(registry.get_subsystems(), vec!["storage".to_string()]);

    registry.set_log_level("storage", "error").unwrap();
    first.warn("hidden");
    second.warn("hidden");
    second.error("shown");

    assert_eq!(recorder.messages(), vec!["shown".to_string()]);
}

#[test]
fn test_gating_follows_set_log_level() {
    let recorder = Recorder::new();
    let registry = registry_with(&recorder);
    let log = registry.get_logger("net");

    log.debug("before");
    registry.set_log_level("net", "DEBUG").unwrap();
    log.debug("after");
    registry.set_log_level("net", "warning").unwrap();
    log.info("muted");
    log.warn("loud");

    assert_eq!(recorder.messages(), vec!["after", "loud"]);
    assert_eq!(registry.level("net"), Some(LogLevel::Warn));
}

#[test]
fn test_unknown_level_and_missing_subsystem() {
    let registry = LoggerRegistry::with_core(Recorder::new().core());
    registry.get_logger("known");

    assert!(matches!(
        registry.set_log_level("known", "verbose"),
        Err(LoggerError::UnknownLevel(ref level)) if level == "verbose"
    ));
    assert!(matches!(
        registry.set_log_level("unknown", "info"),
        Err(LoggerError::NoSuchLogger(ref name)) if name == "unknown"
    ));
    assert_eq!(registry.get_subsystems(), vec!["known".to_string()]);
}

#[test]
fn test_regex_only_touches_matches() {
    let registry = LoggerRegistry::with_core(Recorder::new().core());
    for name in ["net.tcp", "net.udp", "db", "internet"] {
        registry.get_logger(name);
    }

    registry.set_log_level_regex("^net\\.", "trace").unwrap();

    assert_eq!(registry.level("net.tcp"), Some(LogLevel::Trace));
    assert_eq!(registry.level("net.udp"), Some(LogLevel::Trace));
    assert_eq!(registry.level("db"), Some(LogLevel::Info));
    assert_eq!(registry.level("internet"), Some(LogLevel::Info));

    // No match is fine
    registry.set_log_level_regex("^cache", "error").unwrap();
}

#[test]
fn test_regex_does_not_create_subsystems() {
    let registry = LoggerRegistry::with_core(Recorder::new().core());
    registry.set_log_level_regex(".*", "debug").unwrap();
    assert!(registry.get_subsystems().is_empty());

    let later = registry.get_logger("later");
    assert!(!later.enabled(LogLevel::Debug));
}

#[test]
fn test_set_all_and_debug_logging() {
    let registry = LoggerRegistry::with_core(Recorder::new().core());
    let a = registry.get_logger("a");
    let b = registry.get_logger("b");

    registry.set_all_loggers(LogLevel::Fatal);
    assert!(!a.enabled(LogLevel::Error));
    assert!(!b.enabled(LogLevel::Error));

    registry.set_debug_logging();
    assert!(a.enabled(LogLevel::Debug));
    assert!(!b.enabled(LogLevel::Trace));

    registry.set_log_level("*", "error").unwrap();
    assert_eq!(registry.level("a"), Some(LogLevel::Error));
    assert_eq!(registry.level("b"), Some(LogLevel::Error));
}

#[test]
fn test_setup_logging_swaps_backend_and_re_resolves() {
    let old = Recorder::new();
    let new = Recorder::new();
    let registry = registry_with(&old);

    let api = registry.get_logger("api");
    let db = registry.get_logger("db");
    registry.set_log_level("api", "trace").unwrap();
    api.info("to old backend");

    registry.setup_logging(
        new.core(),
        Arc::new(|name: &str| {
            if name == "db" {
                LogLevel::Debug
            } else {
                LogLevel::Warn
            }
        }),
        Vec::new(),
    );

    // The manual trace level on "api" is overwritten by the resolver
    assert_eq!(registry.level("api"), Some(LogLevel::Warn));
    assert_eq!(registry.level("db"), Some(LogLevel::Debug));

    api.info("muted");
    api.warn("to new backend");
    db.debug("db debug");

    assert_eq!(old.messages(), vec!["to old backend"]);
    assert_eq!(new.messages(), vec!["to new backend", "db debug"]);
}

#[test]
fn test_gate_ignores_backend_level() {
    // The backend alone would only accept errors
    let recorder = Recorder::with_level(LogLevel::Error);
    let registry = registry_with(&recorder);
    let log = registry.get_logger("verbose");
    registry.set_log_level("verbose", "debug").unwrap();

    log.debug("passes the subsystem gate");
    assert_eq!(recorder.messages(), vec!["passes the subsystem gate"]);
}

#[test]
fn test_derived_loggers_keep_gate_and_follow_swaps() {
    let first = Recorder::new();
    let second = Recorder::new();
    let registry = registry_with(&first);

    let base = registry.get_logger("svc");
    let with_fields = base.with_fields(LogContext::new().with_field("request", "r-1"));
    let child = base.named("worker");

    registry.set_log_level("svc", "warn").unwrap();
    with_fields.info("gated");
    child.info("gated");

    registry.setup_logging(second.core(), Arc::new(|_name: &str| LogLevel::Info), Vec::new());
    with_fields.info("after swap");
    child.info("child after swap");

    assert!(first.records().is_empty());
    let records = second.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].logger.as_deref(), Some("svc"));
    assert_eq!(
        records[0].fields.get("request").map(|v| v.to_string()),
        Some("r-1".to_string())
    );
    assert_eq!(records[1].logger.as_deref(), Some("svc.worker"));
    assert!(records[1].fields.is_empty());
}

#[test]
fn test_field_precedence() {
    let recorder = Recorder::new();
    let registry = registry_with(&recorder);
    registry.setup_logging(
        recorder.core(),
        Arc::new(|_name: &str| LogLevel::Info),
        vec![LoggerOption::Fields(
            LogContext::new()
                .with_field("service", "billing")
                .with_field("zone", "a"),
        )],
    );

    let log = registry
        .get_logger("invoices")
        .with_fields(LogContext::new().with_field("zone", "b"));
    log.info_with_context("sent", LogContext::new().with_field("zone", "c").with_field("id", 7));

    let records = recorder.records();
    let fields = &records[0].fields;
    assert_eq!(fields.get("service").map(|v| v.to_string()), Some("billing".to_string()));
    assert_eq!(fields.get("zone").map(|v| v.to_string()), Some("c".to_string()));
    assert_eq!(fields.get("id").map(|v| v.to_string()), Some("7".to_string()));
}

#[test]
fn test_backend_errors_surface() {
    let registry = LoggerRegistry::with_core(Arc::new(Failing));
    let log = registry.get_logger("broken");

    assert!(matches!(
        log.try_log(LogLevel::Error, "boom"),
        Err(LoggerError::WriterError(_))
    ));
    assert!(log.sync().is_err());

    // Below the gate nothing reaches the backend
    assert!(log.try_log(LogLevel::Debug, "quiet").is_ok());
}

#[test]
fn test_error_output_receives_fire_and_forget_failures() {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let registry = LoggerRegistry::with_core(Arc::new(Failing));
    registry.setup_logging(
        Arc::new(Failing),
        Arc::new(|_name: &str| LogLevel::Info),
        vec![LoggerOption::ErrorOutput(Arc::new(move |err: &LoggerError| {
            sink.lock().push(err.to_string());
        }))],
    );

    registry.get_logger("noisy").error("lost");
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn test_async_backend_drains_on_sync() {
    let recorder = Recorder::new();
    let core = AsyncCore::with_config(recorder.core(), 16, OverflowPolicy::Block, None);
    let registry = LoggerRegistry::with_core(Arc::new(core.clone()));
    let log = registry.get_logger("queue");

    for i in 0..200 {
        log.info(format!("message {}", i));
    }
    log.sync().unwrap();

    let messages = recorder.messages();
    assert_eq!(messages.len(), 200);
    assert_eq!(messages[0], "message 0");
    assert_eq!(messages[199], "message 199");
    assert_eq!(core.metrics().dropped_count(), 0);
    assert!(recorder.syncs() >= 1);
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let core = AppenderCore::new(LogLevel::Trace)
        .with_appender(FileAppender::new(&log_file).expect("Failed to create appender"));
    let registry = LoggerRegistry::with_core(Arc::new(core));
    let log = registry.get_logger("auth");

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    log.info(malicious_message);
    log.sync().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));
    assert_eq!(content.lines().count(), 1, "Log should be a single line");
}

#[test]
fn test_config_applies_levels_and_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("config.log");
    let path = log_file.to_string_lossy().to_string();

    let config = LoggingConfig::from_lookup(|key: &str| match key {
        "LOG_LEVEL" => Some("warn,net=debug".to_string()),
        "LOG_FORMAT" => Some("json".to_string()),
        "LOG_FILE" => Some(path.clone()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.format, OutputFormat::Json);

    let registry = LoggerRegistry::with_core(Recorder::new().core());
    let net = registry.get_logger("net");
    let db = registry.get_logger("db");
    config.apply(&registry).unwrap();

    net.debug("net detail");
    db.info("db detail");
    db.warn("db warning");
    registry.core().sync().unwrap();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["logger"], "net");
    assert_eq!(lines[0]["level"], "DEBUG");
    assert_eq!(lines[1]["message"], "db warning");
}
