//! Output format for sinks that render records as lines
//!
//! - Text: the record's single-line rendering (default)
//! - Json: one JSON object per record

use crate::core::{LogMessage, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `2025/01/08 10:30:45.123456 INFO    [main.rs L: 12] Request processed`
    #[default]
    Text,

    /// Example: `{"level":"Info","message":"Request processed","timestamp":"2025-01-08T10:30:45.123456Z",...}`
    Json,
}

impl OutputFormat {
    pub fn format(&self, message: &LogMessage) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(message.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string(message)?),
        }
    }
}
