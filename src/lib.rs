//! # Rust Log Worker
//!
//! The asynchronous delivery core of a logging library: every record is
//! funneled through one background worker that owns an ordered queue of
//! pending work and a dynamic set of output sinks.
//!
//! ## Features
//!
//! - **Never blocks producers**: saving a record only enqueues it
//! - **Strict ordering**: one worker thread, one FIFO queue, one total order
//! - **Fan-out**: every registered sink gets its own copy of each record
//! - **Loss-free fatal path**: flush all sinks, disable logging, then
//!   re-raise the triggering signal
//!
//! ## Example
//!
//! ```
//! use rust_log_worker::prelude::*;
//!
//! struct Stdout;
//!
//! impl Sink for Stdout {
//!     fn receive(&mut self, message: LogMessage) -> Result<()> {
//!         println!("{}", message);
//!         Ok(())
//!     }
//! }
//!
//! let worker = LogWorker::new().unwrap();
//! worker.add_sink(Stdout).unwrap();
//! worker.save_message(LogMessage::new(LogLevel::Info, "service started"));
//! ```

pub mod core;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::OutputFormat;
    pub use crate::core::{
        DefaultTerminationHandler, FallbackChannel, FatalEnvelope, FatalSignal, LogEnvelope,
        LogLevel, LogMessage, LogWorker, LogWorkerBuilder, LoggerError, LoggingPhase, Result,
        Sink, SinkHandle, StderrFallback, TerminationHandler, WorkerHandle, WorkerMetrics,
    };
}

#[cfg(feature = "console")]
pub use crate::sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use crate::sinks::FileSink;
pub use crate::sinks::OutputFormat;
pub use crate::core::{
    fatal_message, initialize_logging, is_logging_initialized, save_message, shutdown_logging,
    DefaultTerminationHandler, FallbackChannel, FatalEnvelope, FatalSignal, LogEnvelope, LogLevel,
    LogMessage, LogWorker, LogWorkerBuilder, LoggerError, LoggingPhase, Result, Sink, SinkHandle,
    StderrFallback, TerminationHandler, WorkerHandle, WorkerMetrics,
};
#[cfg(feature = "file")]
pub use crate::core::DefaultFileLogger;
