//! Console sink implementation

use crate::core::{LogLevel, LogMessage, Result, Sink};
use crate::sinks::OutputFormat;
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this sink
    ///
    /// ```
    /// use rust_log_worker::sinks::{ConsoleSink, OutputFormat};
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    fn render(&self, message: &LogMessage) -> Result<String> {
        if self.output_format != OutputFormat::Text || !self.use_colors {
            return self.output_format.format(message);
        }

        let level = format!("{:7}", message.level.to_str())
            .color(message.level.color_code())
            .to_string();
        Ok(format!(
            "{} {} {} - {}",
            message.timestamp.format("%Y/%m/%d %H:%M:%S%.6f"),
            level,
            message.thread_label(),
            message.message
        ))
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn receive(&mut self, message: LogMessage) -> Result<()> {
        let output = self.render(&message)?;

        // Warning and Fatal go to stderr, the rest to stdout
        match message.level {
            LogLevel::Warning | LogLevel::Fatal => {
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "{}", output)?;
                if message.level.is_fatal() {
                    stderr.flush()?;
                }
            }
            _ => {
                writeln!(std::io::stdout().lock(), "{}", output)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
