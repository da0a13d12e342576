//! State owned by the worker thread and the tasks that run against it
//!
//! Every method here runs on the worker thread, in queue order. The facade
//! never touches this state directly.

use super::envelope::{FatalEnvelope, LogEnvelope};
use super::fallback::FallbackChannel;
use super::global;
use super::metrics::WorkerMetrics;
use super::registry::SinkRegistry;
use super::signal::TerminationHandler;
use super::sink::SharedSink;
use super::state::{LoggingPhase, LoggingState};
use std::sync::Arc;

pub(crate) struct WorkerCore {
    id: u64,
    registry: SinkRegistry,
    /// Set by the fatal task; later saves are dropped here even if they were
    /// enqueued before the facade noticed the phase change.
    fatal_handled: bool,
    state: Arc<LoggingState>,
    metrics: Arc<WorkerMetrics>,
    fallback: Arc<dyn FallbackChannel>,
    terminator: Arc<dyn TerminationHandler>,
}

impl WorkerCore {
    pub(crate) fn new(
        id: u64,
        state: Arc<LoggingState>,
        metrics: Arc<WorkerMetrics>,
        fallback: Arc<dyn FallbackChannel>,
        terminator: Arc<dyn TerminationHandler>,
    ) -> Self {
        Self {
            id,
            registry: SinkRegistry::new(),
            fatal_handled: false,
            state,
            metrics,
            fallback,
            terminator,
        }
    }

    pub(crate) fn bg_save(&mut self, envelope: LogEnvelope) {
        let message = envelope.into_message();

        if self.fatal_handled {
            self.metrics.record_rejected();
            return;
        }

        if self.registry.is_empty() {
            self.metrics.record_no_sink();
            self.fallback.write(&format!(
                "[LOGGER WARNING] Log worker has no sinks registered. Message: [{}]",
                message
            ));
            return;
        }

        self.registry
            .fan_out(&message, &*self.fallback, &self.metrics);
    }

    /// Flush the record to every sink, disable logging, tear the registry
    /// down and hand the process to the termination handler.
    pub(crate) fn bg_fatal(&mut self, envelope: FatalEnvelope) {
        let (mut message, signal) = envelope.into_parts();
        self.fatal_handled = true;
        self.metrics.record_fatal();

        let trailer = format!(
            "\nExiting after fatal event ({}). Exiting with signal: {}\n\
             Log content flushed successfully to sink\n",
            message.level, signal
        );
        message.write().push_str(&trailer);
        self.fallback.write(&message.to_string());

        self.state.advance(LoggingPhase::Flushing);
        self.registry
            .fan_out(&message, &*self.fallback, &self.metrics);

        self.state.advance(LoggingPhase::Disabled);
        global::shutdown_logging_for_active_only(self.id);
        self.registry.clear();

        self.state.advance(LoggingPhase::Terminated);
        self.terminator.exit_with_signal(signal);

        // Only reachable if the handoff returned
        self.fallback.write(&format!(
            "[LOGGER CRITICAL] Log worker exited after receiving FATAL trigger ({}) \
             but the process is still alive. Forcing exit.",
            signal
        ));
        self.terminator.force_exit();
    }

    /// Returns false once logging is disabled; the registry is never grown
    /// after that point.
    pub(crate) fn bg_add_sink(&mut self, sink: SharedSink) -> bool {
        if self.fatal_handled || self.state.phase() >= LoggingPhase::Disabled {
            return false;
        }
        self.registry.push(sink);
        true
    }

    pub(crate) fn bg_clear_sinks(&mut self) {
        self.registry.clear();
    }

    pub(crate) fn sink_count(&self) -> usize {
        self.registry.len()
    }
}
