//! Structured logging with request context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use northwind_core::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Log level for structured logs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
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

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "pretty" => Ok(Self::Human),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(route) = &self.route {
            s.push_str(&format!(" {}", route));
        }
        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }
        if !self.fields.is_empty() {
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(" | ");
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a structured field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Shared in-memory buffer of log entries.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<LogEntry>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(entry);
        }
    }

    /// Snapshot of all entries captured so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entries whose message equals `message`.
    pub fn find(&self, message: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

/// Where formatted log lines go.
#[derive(Debug, Clone, Default)]
pub enum LogOutput {
    /// Write to stderr (Spin captures this).
    #[default]
    Stderr,
    /// Keep entries in memory.
    Buffer(LogBuffer),
}

/// Structured logger with request context.
///
/// Carries the request ID, workload and route into every entry and stamps
/// each with the time since the logger was created.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    workload: Option<String>,
    route: Option<String>,
    start_time: Instant,
    min_level: LogLevel,
    format: LogFormat,
    output: LogOutput,
}

impl StructuredLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            workload: None,
            route: None,
            start_time: Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stderr,
        }
    }

    /// Set the workload name.
    pub fn with_workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = Some(workload.into());
        self
    }

    /// Set the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, Value>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            workload: self.workload.clone(),
            route: self.route.clone(),
            fields,
            elapsed_us: Some(self.elapsed_us()),
        };

        match &self.output {
            LogOutput::Stderr => match self.format {
                LogFormat::Json => eprintln!("{}", entry.to_json()),
                LogFormat::Human => eprintln!("{}", entry.to_human()),
            },
            LogOutput::Buffer(buffer) => buffer.push(entry),
        }
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn field(self, key: &str, value: impl Into<String>) -> Self {
        self.with(key, Value::String(value.into()))
    }

    pub fn field_u64(self, key: &str, value: u64) -> Self {
        self.with(key, value.into())
    }

    pub fn field_bool(self, key: &str, value: bool) -> Self {
        self.with(key, Value::Bool(value))
    }

    /// Whole milliseconds.
    pub fn duration_ms(self, key: &str, duration: Duration) -> Self {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.with(key, ms.into())
    }

    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffered() -> (StructuredLogger, LogBuffer) {
        let buffer = LogBuffer::new();
        let logger = StructuredLogger::new(RequestId::from_string("req-1"))
            .with_workload("northwind")
            .with_route("/customers")
            .with_output(LogOutput::Buffer(buffer.clone()));
        (logger, buffer)
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, buffer) = buffered();
        logger.debug("hidden");
        logger.info("shown");
        logger.error("also shown");

        let messages: Vec<String> = buffer.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["shown", "also shown"]);
    }

    #[test]
    fn test_builder_fields() {
        let (logger, buffer) = buffered();
        logger
            .info_builder("settings loaded")
            .field("mode", "defer")
            .field_u64("delay_ms", 250)
            .field_bool("should_defer", true)
            .duration_ms("took", Duration::from_millis(3))
            .emit();

        let entry = &buffer.find("settings loaded")[0];
        assert_eq!(entry.request_id, "req-1");
        assert_eq!(entry.field("mode"), Some(&Value::from("defer")));
        assert_eq!(entry.field("delay_ms"), Some(&Value::from(250u64)));
        assert_eq!(entry.field("should_defer"), Some(&Value::Bool(true)));
        assert_eq!(entry.field("took"), Some(&Value::from(3u64)));
    }

    #[test]
    fn test_json_shape() {
        let (logger, buffer) = buffered();
        logger.warn_builder("slow").field("entry", "orders").emit();

        let json: Value = serde_json::from_str(&buffer.entries()[0].to_json()).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["message"], "slow");
        assert_eq!(json["workload"], "northwind");
        assert_eq!(json["route"], "/customers");
        assert_eq!(json["entry"], "orders");
    }

    #[test]
    fn test_human_format() {
        let (logger, buffer) = buffered();
        logger.error_builder("region failed").field("region", "orders").emit();
        let line = buffer.entries()[0].to_human();
        assert!(line.starts_with("[ERROR] region failed /customers"));
        assert!(line.ends_with("| region=\"orders\""));
    }

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!("human".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
    }
}
