//! Error types for the log worker

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The background worker no longer accepts tasks
    #[error("Log worker already stopped")]
    WorkerStopped,

    /// Logging was shut down, by a fatal event or by destroying the worker
    #[error("Logging is disabled, message rejected")]
    LoggingDisabled,

    /// Another fatal event already started the shutdown sequence
    #[error("A fatal event is already being handled")]
    FatalInProgress,

    /// A process-wide worker is already installed
    #[error("Logging already initialized with another worker")]
    AlreadyInitialized,

    /// No process-wide worker is installed
    #[error("Logging has not been initialized")]
    NotInitialized,

    /// The sink behind a handle was released by the registry
    #[error("Sink '{name}' is no longer registered")]
    SinkGone { name: String },

    /// Blocking on the worker from the worker thread would never complete
    #[error("Cannot wait for a worker task from the worker thread itself")]
    WaitOnWorkerThread,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn sink_gone(name: impl Into<String>) -> Self {
        LoggerError::SinkGone { name: name.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
