//! Core worker types and traits

pub mod active;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod global;
pub mod log_level;
pub mod log_message;
pub mod log_worker;
pub mod metrics;
mod registry;
pub mod signal;
pub mod sink;
pub mod state;
mod worker;

pub use active::{Active, CompletionToken, TaskSender};
pub use envelope::{FatalEnvelope, LogEnvelope};
pub use error::{LoggerError, Result};
pub use fallback::{FallbackChannel, StderrFallback};
pub use global::{
    fatal_message, initialize_logging, is_logging_initialized, save_message, shutdown_logging,
};
pub use log_level::LogLevel;
pub use log_message::LogMessage;
#[cfg(feature = "file")]
pub use log_worker::DefaultFileLogger;
pub use log_worker::{LogWorker, LogWorkerBuilder, WorkerHandle, DEFAULT_WORKER_THREAD_NAME};
pub use metrics::WorkerMetrics;
pub use signal::{DefaultTerminationHandler, FatalSignal, TerminationHandler};
pub use sink::{ReceiveFn, SharedSink, Sink, SinkHandle, SinkWrapper};
pub use state::{LoggingPhase, LoggingState};
