//! Log worker facade
//!
//! [`LogWorker`] owns the background thread. Producers submit envelopes
//! through it (or through a cloned [`WorkerHandle`]); every submission is an
//! enqueued task, so the worker sees one total order of saves, fatal events
//! and sink registrations.

use super::active::{Active, TaskSender};
use super::envelope::{FatalEnvelope, LogEnvelope};
use super::error::{LoggerError, Result};
use super::fallback::{FallbackChannel, StderrFallback};
use super::global;
use super::log_message::LogMessage;
use super::metrics::WorkerMetrics;
use super::signal::{DefaultTerminationHandler, TerminationHandler};
use super::sink::{BoundSink, Sink, SinkHandle};
use super::state::{LoggingPhase, LoggingState};
use super::worker::WorkerCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Name given to the worker thread unless the builder overrides it
pub const DEFAULT_WORKER_THREAD_NAME: &str = "log-worker";

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Cloneable producer handle to a running worker.
///
/// Checks the logging phase before enqueueing; once logging is disabled,
/// saves are counted as rejected and never reach the queue.
#[derive(Clone)]
pub struct WorkerHandle {
    id: u64,
    tasks: TaskSender<WorkerCore>,
    state: Arc<LoggingState>,
    metrics: Arc<WorkerMetrics>,
    fallback: Arc<dyn FallbackChannel>,
}

impl WorkerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue a record for delivery to every sink. Never blocks.
    pub fn save(&self, envelope: LogEnvelope) {
        if !self.state.is_accepting() {
            self.metrics.record_rejected();
            return;
        }

        match self.tasks.send(move |core| core.bg_save(envelope)) {
            Ok(()) => {
                self.metrics.record_enqueued();
            }
            Err(_) => {
                // Worker is shutting down
                self.metrics.record_rejected();
            }
        }
    }

    /// Queue the fatal sequence. Only the first fatal call is dispatched;
    /// a rejected record is still written to the fallback channel.
    pub fn fatal(&self, envelope: FatalEnvelope) -> Result<()> {
        if !self.state.claim_fatal() {
            self.report_undispatched(&envelope, "a fatal event is already being handled");
            return Err(LoggerError::FatalInProgress);
        }
        if !self.state.is_accepting() {
            self.report_undispatched(&envelope, "logging is disabled");
            return Err(LoggerError::LoggingDisabled);
        }

        let rendered = envelope.message().to_string();
        let signal = envelope.signal();
        if let Err(e) = self.tasks.send(move |core| core.bg_fatal(envelope)) {
            self.fallback.write(&format!(
                "[LOGGER WARNING] Fatal record not dispatched ({}), signal {}: {}",
                e, signal, rendered
            ));
            return Err(e);
        }
        self.metrics.record_enqueued();
        Ok(())
    }

    pub fn phase(&self) -> LoggingPhase {
        self.state.phase()
    }

    fn report_undispatched(&self, envelope: &FatalEnvelope, reason: &str) {
        self.metrics.record_rejected();
        self.fallback.write(&format!(
            "[LOGGER WARNING] Fatal record not dispatched ({}), signal {}: {}",
            reason,
            envelope.signal(),
            envelope.message()
        ));
    }
}

pub struct LogWorker {
    handle: WorkerHandle,
    active: Active<WorkerCore>,
}

impl LogWorker {
    /// Worker with no sinks, stderr fallback and the default termination handler.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for LogWorker
    ///
    /// # Example
    /// ```
    /// use rust_log_worker::prelude::*;
    ///
    /// let worker = LogWorker::builder()
    ///     .thread_name("app-log-worker")
    ///     .build()
    ///     .expect("worker thread starts");
    /// ```
    #[must_use]
    pub fn builder() -> LogWorkerBuilder {
        LogWorkerBuilder::new()
    }

    fn spawn(
        thread_name: &str,
        fallback: Arc<dyn FallbackChannel>,
        terminator: Arc<dyn TerminationHandler>,
    ) -> Result<Self> {
        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(LoggingState::new());
        let metrics = Arc::new(WorkerMetrics::new());

        let core = WorkerCore::new(
            id,
            Arc::clone(&state),
            Arc::clone(&metrics),
            Arc::clone(&fallback),
            terminator,
        );
        let active = Active::spawn(thread_name, core)?;

        Ok(Self {
            handle: WorkerHandle {
                id,
                tasks: active.tasks().clone(),
                state,
                metrics,
                fallback,
            },
            active,
        })
    }

    pub fn id(&self) -> u64 {
        self.handle.id
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    #[inline]
    pub fn save(&self, envelope: LogEnvelope) {
        self.handle.save(envelope);
    }

    #[inline]
    pub fn save_message(&self, message: LogMessage) {
        self.handle.save(LogEnvelope::new(message));
    }

    pub fn fatal(&self, envelope: FatalEnvelope) -> Result<()> {
        self.handle.fatal(envelope)
    }

    /// Register `sink` with its [`Sink::receive`] operation.
    ///
    /// Blocks until the worker has appended it, so every save issued after
    /// this returns reaches the sink.
    pub fn add_sink<T: Sink>(&self, sink: T) -> Result<SinkHandle<T>> {
        let name = sink.name().to_string();
        self.add_bound(sink, T::receive, name)
    }

    /// Register `sink` with a custom receive operation.
    ///
    /// ```
    /// use rust_log_worker::prelude::*;
    ///
    /// #[derive(Default)]
    /// struct Lines(Vec<String>);
    ///
    /// impl Lines {
    ///     fn push_line(&mut self, message: LogMessage) -> Result<()> {
    ///         self.0.push(message.message);
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let worker = LogWorker::new().unwrap();
    /// let handle = worker.add_sink_with(Lines::default(), Lines::push_line).unwrap();
    /// worker.save_message(LogMessage::new(LogLevel::Info, "ready"));
    /// worker.sink_count().unwrap(); // waits behind the save
    /// assert_eq!(handle.call(|lines| lines.0.clone()).unwrap(), vec!["ready"]);
    /// ```
    pub fn add_sink_with<T, F>(&self, sink: T, receive: F) -> Result<SinkHandle<T>>
    where
        T: Send + 'static,
        F: Fn(&mut T, LogMessage) -> Result<()> + Send + Sync + 'static,
    {
        self.add_bound(sink, receive, std::any::type_name::<T>().to_string())
    }

    fn add_bound<T, F>(&self, sink: T, receive: F, name: String) -> Result<SinkHandle<T>>
    where
        T: Send + 'static,
        F: Fn(&mut T, LogMessage) -> Result<()> + Send + Sync + 'static,
    {
        if !self.handle.state.is_accepting() {
            return Err(LoggerError::LoggingDisabled);
        }
        // Must not enqueue: a queued task runs even if we return an error
        if self.handle.tasks.is_worker_thread() {
            return Err(LoggerError::WaitOnWorkerThread);
        }

        let (shared, handle) = BoundSink::bind(sink, receive, name);
        let added = self
            .handle
            .tasks
            .spawn_task(move |core| core.bg_add_sink(shared))?
            .wait()?;

        if added {
            Ok(handle)
        } else {
            Err(LoggerError::LoggingDisabled)
        }
    }

    /// Number of registered sinks, observed after every earlier task ran.
    pub fn sink_count(&self) -> Result<usize> {
        if self.handle.tasks.is_worker_thread() {
            return Err(LoggerError::WaitOnWorkerThread);
        }
        self.handle
            .tasks
            .spawn_task(|core| core.sink_count())?
            .wait()
    }

    pub fn metrics(&self) -> &WorkerMetrics {
        &self.handle.metrics
    }

    pub fn phase(&self) -> LoggingPhase {
        self.handle.phase()
    }

    pub(crate) fn phase_accepting(&self) -> bool {
        self.handle.state.is_accepting()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_running()
    }

    /// Disable logging through this worker, wait for every record queued so
    /// far to be delivered, release the sinks and stop the thread.
    ///
    /// Calling it again (or dropping afterwards) is a no-op.
    pub fn shutdown(&mut self) {
        if !self.active.is_running() {
            return;
        }

        global::shutdown_logging_for_active_only(self.handle.id);
        self.handle.state.advance(LoggingPhase::Disabled);

        // Dropped from a task: the sinks go with the worker state once the
        // loop exits
        if self.handle.tasks.is_worker_thread() {
            self.active.stop();
            return;
        }

        let cleared = self
            .handle
            .tasks
            .spawn_task(|core| core.bg_clear_sinks())
            .and_then(|token| token.wait());
        if let Err(e) = cleared {
            self.handle.fallback.write(&format!(
                "[LOGGER ERROR] Failed to clear sinks during shutdown: {}",
                e
            ));
        }

        self.active.stop();
    }
}

impl Drop for LogWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker plus the file sink created for it.
#[cfg(feature = "file")]
pub struct DefaultFileLogger {
    pub worker: LogWorker,
    pub sink: SinkHandle<crate::sinks::FileSink>,
}

#[cfg(feature = "file")]
impl LogWorker {
    /// Worker with a single [`FileSink`](crate::sinks::FileSink) writing to
    /// `<prefix>.<YYYYMMDD-HHMMSS>.log` in `directory`.
    pub fn create_with_default_logger(
        prefix: &str,
        directory: impl AsRef<std::path::Path>,
    ) -> Result<DefaultFileLogger> {
        let worker = Self::new()?;
        let sink = worker.add_sink(crate::sinks::FileSink::new(prefix, directory)?)?;
        Ok(DefaultFileLogger { worker, sink })
    }
}

type PendingSink = Box<dyn FnOnce(&LogWorker) -> Result<()>>;

/// Builder for constructing LogWorker with a fluent API
///
/// # Example
/// ```
/// use rust_log_worker::prelude::*;
/// use std::sync::Arc;
///
/// let worker = LogWorker::builder()
///     .thread_name("app-log-worker")
///     .fallback(Arc::new(StderrFallback))
///     .termination_handler(Arc::new(DefaultTerminationHandler))
///     .build()
///     .unwrap();
/// assert_eq!(worker.sink_count().unwrap(), 0);
/// ```
pub struct LogWorkerBuilder {
    thread_name: String,
    fallback: Arc<dyn FallbackChannel>,
    terminator: Arc<dyn TerminationHandler>,
    sinks: Vec<PendingSink>,
}

impl LogWorkerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            thread_name: DEFAULT_WORKER_THREAD_NAME.to_string(),
            fallback: Arc::new(StderrFallback),
            terminator: Arc::new(DefaultTerminationHandler),
            sinks: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Channel used for no-sink reports, the fatal trailer and diagnostics
    #[must_use = "builder methods return a new value"]
    pub fn fallback(mut self, fallback: Arc<dyn FallbackChannel>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Handoff invoked after a fatal record was flushed
    #[must_use = "builder methods return a new value"]
    pub fn termination_handler(mut self, terminator: Arc<dyn TerminationHandler>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Register a sink as soon as the worker starts
    #[must_use = "builder methods return a new value"]
    pub fn sink<T: Sink>(mut self, sink: T) -> Self {
        self.sinks
            .push(Box::new(move |worker: &LogWorker| worker.add_sink(sink).map(|_| ())));
        self
    }

    /// Build the LogWorker
    pub fn build(self) -> Result<LogWorker> {
        if self.thread_name.trim().is_empty() {
            return Err(LoggerError::config(
                "LogWorkerBuilder",
                "worker thread name must not be empty",
            ));
        }
        if self.thread_name.contains('\0') {
            return Err(LoggerError::config(
                "LogWorkerBuilder",
                "worker thread name must not contain NUL bytes",
            ));
        }

        let worker = LogWorker::spawn(&self.thread_name, self.fallback, self.terminator)?;
        for register in self.sinks {
            register(&worker)?;
        }
        Ok(worker)
    }
}

impl Default for LogWorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
