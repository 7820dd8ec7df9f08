//! Structured logging with injected context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Name of the service emitting the entry.
    pub service: String,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a structured field.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Where a logger sends its entries.
#[derive(Debug, Clone, Default)]
enum Sink {
    /// Forward to the process-wide `tracing` subscriber.
    #[default]
    Tracing,
    /// Drop everything.
    Noop,
    /// Keep entries in memory.
    Memory(Arc<Mutex<Vec<LogEntry>>>),
}

/// Structured logger passed into each component constructor.
///
/// Cloning is cheap; `with_field` and `with_error` return a new logger
/// carrying the extra fields and leave the original untouched. Entries
/// emitted inside a request span (see `RequestId`) inherit the span's
/// `request_id` through the subscriber.
#[derive(Debug, Clone)]
pub struct Logger {
    service: Arc<str>,
    fields: BTreeMap<String, serde_json::Value>,
    min_level: LogLevel,
    sink: Sink,
}

impl Logger {
    /// Create a logger for the named service.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: Arc::from(service.into()),
            fields: BTreeMap::new(),
            min_level: LogLevel::Trace,
            sink: Sink::Tracing,
        }
    }

    /// A logger that discards every entry.
    pub fn noop() -> Self {
        Self {
            sink: Sink::Noop,
            ..Self::new("noop")
        }
    }

    /// A logger that records entries in memory, plus a handle to read them.
    pub fn memory(service: impl Into<String>) -> (Self, LogCapture) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            sink: Sink::Memory(Arc::clone(&entries)),
            ..Self::new(service)
        };
        (logger, LogCapture { entries })
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add a structured field to every entry emitted by the returned logger.
    pub fn with_field(&self, key: &str, value: impl Serialize) -> Self {
        let mut logger = self.clone();
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        logger.fields.insert(key.to_string(), value);
        logger
    }

    /// Attach an error under the `error` field.
    pub fn with_error(&self, err: &dyn fmt::Display) -> Self {
        self.with_field("error", err.to_string())
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Service name attached to every entry.
    pub fn service(&self) -> &str {
        &self.service
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            service: self.service.to_string(),
            fields: self.fields.clone(),
        };

        match &self.sink {
            Sink::Tracing => emit(&entry),
            Sink::Noop => {}
            Sink::Memory(entries) => entries.lock().push(entry),
        }
    }
}

fn emit(entry: &LogEntry) {
    let fields = serde_json::Value::Object(
        entry
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    );
    let service = entry.service.as_str();
    let message = entry.message.as_str();

    match entry.level {
        LogLevel::Trace => tracing::trace!(service, %fields, "{}", message),
        LogLevel::Debug => tracing::debug!(service, %fields, "{}", message),
        LogLevel::Info => tracing::info!(service, %fields, "{}", message),
        LogLevel::Warn => tracing::warn!(service, %fields, "{}", message),
        LogLevel::Error => tracing::error!(service, %fields, "{}", message),
    }
}

/// Read handle for a memory logger.
#[derive(Debug, Clone)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LogCapture {
    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Entries at exactly the given level.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

/// Output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Pretty,
    /// JSON format (for production/log aggregation).
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected pretty or json", other)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format {
            LogFormat::Json => {
                subscriber_fmt().json().with_env_filter(filter).init();
            }
            LogFormat::Pretty => {
                subscriber_fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_do_not_leak_into_parent() {
        let (logger, capture) = Logger::memory("catalog");
        let child = logger.with_field("key", "42");

        child.info("with field");
        logger.info("without field");

        let entries = capture.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].field("key"), Some(&serde_json::json!("42")));
        assert!(entries[1].fields.is_empty());
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, capture) = Logger::memory("catalog");
        let logger = logger.with_min_level(LogLevel::Warn);

        logger.debug("hidden");
        logger.info("hidden");
        logger.warn("shown");
        logger.error("shown");

        assert_eq!(capture.entries().len(), 2);
        assert_eq!(capture.at_level(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_with_error_records_message() {
        let (logger, capture) = Logger::memory("catalog");
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");

        logger.with_error(&err).error("save failed");

        let entries = capture.at_level(LogLevel::Error);
        assert_eq!(entries[0].field("error"), Some(&serde_json::json!("disk full")));
        assert_eq!(entries[0].service, "catalog");
    }

    #[test]
    fn test_entry_formats() {
        let (logger, capture) = Logger::memory("catalog");
        logger.with_field("quantity", 3).info("listed");

        let entry = &capture.entries()[0];
        assert_eq!(entry.to_human(), "[INFO] listed | quantity=3");

        let json: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["service"], "catalog");
    }

    #[test]
    fn test_noop_logger_accepts_everything() {
        let logger = Logger::noop().with_field("a", 1);
        logger.error("ignored");
        assert_eq!(logger.service(), "noop");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
