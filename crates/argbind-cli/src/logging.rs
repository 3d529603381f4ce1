//! Logging utilities for the argbind CLI
//!
//! This module provides:
//! - Structured logging setup (compact, full or JSON; stderr or a file)
//! - Run ID generation
//! - Redaction of sensitive-looking values before they are logged
//! - Timing spans

use crate::config;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global run ID for the current invocation
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Optional file output path
    pub file: Option<PathBuf>,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                // trace shows every slot the matcher binds
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply the `[logging]` section of the configuration file
    ///
    /// The file's level only applies when no `-v` flag raised it.
    pub fn merge_with_file(&mut self, file: &config::LoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            if let Some(level) = &file.level {
                self.level = level.clone();
            }
        }
        if let Some(format) = LogFormat::from_name(&file.format) {
            if verbosity < 3 {
                self.format = format;
            }
        }
        if file.file.is_some() {
            self.file = file.file.clone();
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("ARGBIND_LOG_FORMAT") {
            match LogFormat::from_name(&format) {
                Some(format) => self.format = format,
                None => tracing::warn!("Invalid log format: {}, using default", format),
            }
        }

        if let Ok(file) = std::env::var("ARGBIND_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        if let Ok(console) = std::env::var("ARGBIND_LOG_CONSOLE") {
            self.console = console.to_lowercase() == "true" || console == "1";
        }
    }

    fn writer(&self) -> Result<BoxMakeWriter> {
        match &self.file {
            Some(path) => {
                let (dir, name) = split_log_path(path)?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(name.to_string_lossy().into_owned())
                    .build(&dir)
                    .map_err(|e| Error::Logging(format!("cannot open {}: {}", path.display(), e)))?;
                Ok(BoxMakeWriter::new(appender))
            }
            None if self.console => Ok(BoxMakeWriter::new(std::io::stderr)),
            None => Ok(BoxMakeWriter::new(std::io::sink)),
        }
    }

    fn use_ansi(&self) -> bool {
        self.file.is_none() && self.console && std::io::stderr().is_terminal()
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::Logging(format!("log file path {} has no file name", path.display())))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, PathBuf::from(name)))
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let writer = config.writer()?;
    let ansi = config.use_ansi();

    // Each format yields a different subscriber type
    let installed = match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };
    installed.map_err(|e| Error::Logging(format!("Failed to initialize logging: {}", e)))?;

    let run_id = generate_run_id();
    RUN_ID
        .set(run_id.clone())
        .map_err(|_| Error::Logging("run ID was already set".to_string()))?;

    tracing::info!(run_id = %run_id, config = ?config, "Logging system initialized");

    Ok(())
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level)
        .map_err(|e| Error::Logging(format!("Invalid filter directive {:?}: {}", config.level, e)))
}

/// Generate a unique ID for this run
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Get the current run ID
pub fn current_run_id() -> Option<&'static str> {
    RUN_ID.get().map(|s| s.as_str())
}

/// Create a span tagged with the run ID and an empty duration field
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        run_id = current_run_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Sensitive data redaction utilities
///
/// Argument lists are user data; anything under a key that looks like a
/// credential is masked before it reaches the log.
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    static SENSITIVE_KEY: OnceLock<Option<Regex>> = OnceLock::new();
    static INLINE_SECRET: OnceLock<Option<Regex>> = OnceLock::new();

    fn sensitive_key() -> Option<&'static Regex> {
        SENSITIVE_KEY
            .get_or_init(|| {
                Regex::new(r"(?i)(api[_-]?key|token|secret|passw(or)?d|credential|auth)").ok()
            })
            .as_ref()
    }

    fn inline_secret() -> Option<&'static Regex> {
        INLINE_SECRET
            .get_or_init(|| {
                Regex::new(
                    r#"(?i)(api[_-]?key|token|bearer|password|passwd|pwd)[=:\s]+['"]?([^\s'",}]{3,})['"]?"#,
                )
                .ok()
            })
            .as_ref()
    }

    /// Redact `key=value` style secrets from a string
    pub fn redact_sensitive(input: &str) -> String {
        match inline_secret() {
            Some(regex) => regex.replace_all(input, "$1=***").into_owned(),
            None => input.to_string(),
        }
    }

    /// Check if an object key names sensitive information
    pub fn is_sensitive_key(key: &str) -> bool {
        sensitive_key().is_some_and(|regex| regex.is_match(key))
    }

    /// Redact sensitive information from JSON values in place
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            Value::String(s) => *s = redact_sensitive(s),
            _ => {}
        }
    }

    /// A redacted copy of `value`, rendered for a log line
    pub fn redacted(value: &Value) -> String {
        let mut copy = value.clone();
        redact_json_value(&mut copy);
        copy.to_string()
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
