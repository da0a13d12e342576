//! Test doubles shared by the integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use rust_log_worker::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Fallback channel that keeps every report in memory
#[derive(Default)]
pub struct CaptureFallback {
    reports: Mutex<Vec<String>>,
}

impl CaptureFallback {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }
}

impl FallbackChannel for CaptureFallback {
    fn write(&self, text: &str) {
        self.reports.lock().push(text.to_string());
    }
}

/// Termination handler that records the handoff instead of ending the process
#[derive(Default)]
pub struct RecordingTerminator {
    signals: Mutex<Vec<FatalSignal>>,
    forced_exits: Mutex<u32>,
}

impl RecordingTerminator {
    pub fn signals(&self) -> Vec<FatalSignal> {
        self.signals.lock().clone()
    }

    pub fn forced_exits(&self) -> u32 {
        *self.forced_exits.lock()
    }
}

impl TerminationHandler for RecordingTerminator {
    fn exit_with_signal(&self, signal: FatalSignal) {
        self.signals.lock().push(signal);
    }

    fn force_exit(&self) {
        *self.forced_exits.lock() += 1;
    }
}

/// Sink that stores every record it receives
#[derive(Clone, Default)]
pub struct CollectingSink {
    received: Arc<Mutex<Vec<LogMessage>>>,
    delay: Option<Duration>,
}

impl CollectingSink {
    pub fn slow(delay: Duration) -> Self {
        Self {
            received: Arc::default(),
            delay: Some(delay),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.received.lock().iter().map(|m| m.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.received.lock().len()
    }
}

impl Sink for CollectingSink {
    fn receive(&mut self, message: LogMessage) -> Result<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.received.lock().push(message);
        Ok(())
    }

    fn name(&self) -> &str {
        "collecting"
    }
}

pub struct TestWorker {
    pub worker: LogWorker,
    pub fallback: Arc<CaptureFallback>,
    pub terminator: Arc<RecordingTerminator>,
}

pub fn test_worker() -> TestWorker {
    let fallback = Arc::new(CaptureFallback::default());
    let terminator = Arc::new(RecordingTerminator::default());
    let worker = LogWorker::builder()
        .thread_name("test-log-worker")
        .fallback(fallback.clone())
        .termination_handler(terminator.clone())
        .build()
        .expect("Failed to start worker");
    TestWorker {
        worker,
        fallback,
        terminator,
    }
}

pub fn info(text: impl Into<String>) -> LogMessage {
    LogMessage::new(LogLevel::Info, text)
}

/// Returns once every task queued before the call has run
pub fn barrier(worker: &LogWorker) {
    worker.sink_count().expect("Worker should still be running");
}
