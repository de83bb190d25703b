//! # Logger Service
//!
//! This crate implements structured logging for mailboxes.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! A logger is a handle passed to whoever logs; nothing here reads
//! process-wide state. [`FacadeLogger`] is the one bridge to the `log`
//! facade, for binaries that already install a `log` backend.

use core_types::MailboxRef;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Mailbox that produced the entry (if known)
    pub source: Option<MailboxRef>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Sets the source mailbox
    pub fn with_source(mut self, source: MailboxRef) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Returns the value of the first field named `key`
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Renders as a single text line: `[LEVEL] source: message key=value ...`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.level)?;
        if let Some(source) = &self.source {
            write!(f, "{}: ", source)?;
        }
        f.write_str(&self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// A log sink
pub trait Logger {
    /// Records a structured entry
    fn log(&self, entry: LogEntry);

    /// Records a plain text line at info level
    fn line(&self, text: &str) {
        self.log(LogEntry::info(text));
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _entry: LogEntry) {}
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Returns the recorded messages in order
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|entry| entry.message.clone()).collect()
    }

    /// Returns the entries recorded at `level`
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Checks whether any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|entry| entry.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        self.lock().push(entry);
    }
}

/// Forwards entries to the `log` facade under a fixed target
#[derive(Debug, Clone)]
pub struct FacadeLogger {
    target: String,
}

impl FacadeLogger {
    pub const DEFAULT_TARGET: &'static str = "mailbox";

    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for FacadeLogger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET)
    }
}

impl Logger for FacadeLogger {
    fn log(&self, entry: LogEntry) {
        let level = log::Level::from(entry.level);
        if log::log_enabled!(target: self.target.as_str(), level) {
            log::log!(target: self.target.as_str(), level, "{}", entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source() {
        let entry = LogEntry::info("test").with_source(MailboxRef::new("/door"));
        assert_eq!(entry.source, Some(MailboxRef::new("/door")));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::info("test")
            .with_field("key1", "value1")
            .with_field("size", 42);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("key1"), Some("value1"));
        assert_eq!(entry.field("size"), Some("42"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_entry_renders_as_line() {
        let entry = LogEntry::warn("send failed")
            .with_source(MailboxRef::new("/keypad"))
            .with_field("destination", "/door");
        assert_eq!(
            entry.to_string(),
            "[WARN] /keypad: send failed destination=/door"
        );
    }

    #[test]
    fn test_null_logger_accepts_everything() {
        let logger = NullLogger;
        logger.log(LogEntry::error("ignored"));
        logger.line("also ignored");
    }

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.line("first");
        logger.log(LogEntry::error("second"));

        assert_eq!(logger.messages(), vec!["first", "second"]);
        assert_eq!(logger.at_level(LogLevel::Error).len(), 1);
        assert!(logger.contains("sec"));

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_facade_logger_without_backend() {
        let logger = FacadeLogger::default();
        assert_eq!(logger.target(), "mailbox");
        logger.log(LogEntry::debug("no backend installed"));
    }

    #[test]
    fn test_level_maps_to_log_crate() {
        assert_eq!(log::Level::from(LogLevel::Warn), log::Level::Warn);
    }
}
