//! File sink implementation

use crate::core::{LogMessage, LoggerError, Result, Sink};
use crate::sinks::OutputFormat;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per record to a file.
///
/// Writes are buffered; the buffer is flushed after every fatal record and
/// when the sink is dropped.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
    output_format: OutputFormat,
}

impl FileSink {
    /// Create `<prefix>.<YYYYMMDD-HHMMSS>.log` inside `directory`, creating
    /// the directory if needed.
    pub fn new(prefix: &str, directory: impl AsRef<Path>) -> Result<Self> {
        let prefix = prefix.trim();
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(LoggerError::config(
                "FileSink",
                format!("invalid log file prefix '{}'", prefix),
            ));
        }

        let directory = directory.as_ref();
        fs::create_dir_all(directory).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                directory.display().to_string(),
                e,
            )
        })?;

        let file_name = format!("{}.{}.log", prefix, Local::now().format("%Y%m%d-%H%M%S"));
        Self::open(directory.join(file_name))
    }

    /// Append to an explicit path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_sink(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            output_format: OutputFormat::default(),
        })
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, message: LogMessage) -> Result<()> {
        let mut output = self.output_format.format(&message)?;
        output.push('\n');
        self.writer.write_all(output.as_bytes())?;

        if message.level.is_fatal() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn receive(&mut self, message: LogMessage) -> Result<()> {
        self.write_line(message)
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_new_builds_prefixed_name_in_directory() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("logs");
        let sink = FileSink::new("service", &nested).expect("sink");

        let name = sink.path().file_name().and_then(|n| n.to_str()).expect("name");
        assert!(name.starts_with("service."));
        assert!(name.ends_with(".log"));
        assert!(nested.is_dir());
    }

    #[test]
    fn test_rejects_prefix_with_separator() {
        let dir = TempDir::new().expect("temp dir");
        let result = FileSink::new("a/b", dir.path());
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_fatal_record_is_flushed_immediately() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fatal.log");
        let mut sink = FileSink::open(&path).expect("sink");

        sink.receive(LogMessage::new(LogLevel::Info, "buffered")).expect("write");
        sink.receive(LogMessage::new(LogLevel::Fatal, "crash")).expect("write");

        // Sink still alive: content must already be on disk
        let content = fs::read_to_string(&path).expect("read");
        assert!(content.contains("buffered"));
        assert!(content.contains("crash"));
    }
}
