//! Log record structure
//!
//! A [`LogMessage`] is produced upstream, fully formed. The worker only moves,
//! clones and (for fatal records) appends a trailer to it.

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

// Thread-local caches so every record from one thread reuses the same strings
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    pub thread_id: String,
    pub thread_name: Option<String>,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            file: None,
            line: None,
            function: None,
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
        }
    }

    pub fn with_location(mut self, file: &str, line: u32, function: &str) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self.function = Some(function.to_string());
        self
    }

    /// Mutable access to the text, used to append trailers.
    pub fn write(&mut self) -> &mut String {
        &mut self.message
    }

    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

/// Single-line rendering used by the fallback channel and the plain text sinks.
impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:7}",
            self.timestamp.format("%Y/%m/%d %H:%M:%S%.6f"),
            self.level.to_str()
        )?;
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            write!(f, " [{} L: {}]", file, line)?;
        }
        write!(f, " {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_when_present() {
        let msg = LogMessage::new(LogLevel::Info, "started").with_location("main.rs", 42, "main");
        let text = msg.to_string();
        assert!(text.contains("INFO"));
        assert!(text.contains("[main.rs L: 42]"));
        assert!(text.ends_with("started"));

        let bare = LogMessage::new(LogLevel::Debug, "no location").to_string();
        assert!(!bare.contains(" L: "));
    }

    #[test]
    fn test_clones_are_independent() {
        let original = LogMessage::new(LogLevel::Warning, "disk almost full");
        let mut copy = original.clone();
        copy.write().push_str(" (edited)");
        assert_eq!(original.message, "disk almost full");
        assert_eq!(copy.message, "disk almost full (edited)");
    }

    #[test]
    fn test_thread_label_prefers_name() {
        let handle = std::thread::Builder::new()
            .name("producer-7".into())
            .spawn(|| LogMessage::new(LogLevel::Info, "x"))
            .expect("spawn");
        let msg = handle.join().expect("join");
        assert_eq!(msg.thread_label(), "producer-7");
    }
}
