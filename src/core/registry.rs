//! Ordered sink registry and fan-out delivery
//!
//! Owned by the worker state, so it is only read and mutated on the worker
//! thread. Insertion order is delivery order.

use super::fallback::FallbackChannel;
use super::log_message::LogMessage;
use super::metrics::WorkerMetrics;
use super::sink::SharedSink;

#[derive(Default)]
pub(crate) struct SinkRegistry {
    sinks: Vec<SharedSink>,
}

impl SinkRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sink: SharedSink) {
        self.sinks.push(sink);
    }

    /// Release every sink. Deliveries holding a clone keep theirs alive.
    pub(crate) fn clear(&mut self) {
        self.sinks.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hand every sink its own copy of `message`, in registration order.
    ///
    /// A failing sink is reported on the fallback channel and counted; the
    /// remaining sinks still receive the record. Nothing is retried.
    /// Returns the number of receive calls made.
    pub(crate) fn fan_out(
        &self,
        message: &LogMessage,
        fallback: &dyn FallbackChannel,
        metrics: &WorkerMetrics,
    ) -> usize {
        for (idx, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = sink.send(message.clone()) {
                metrics.record_sink_error();
                fallback.write(&format!(
                    "[LOGGER ERROR] Sink #{} ({}) failed: {}",
                    idx,
                    sink.name(),
                    e
                ));
            }
        }
        metrics.record_delivered(self.sinks.len() as u64);
        self.sinks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{LoggerError, Result};
    use crate::core::log_level::LogLevel;
    use crate::core::sink::{BoundSink, Sink};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl FallbackChannel for Capture {
        fn write(&self, text: &str) {
            self.0.lock().push(text.to_string());
        }
    }

    struct Tagging {
        tag: &'static str,
        out: Arc<Mutex<Vec<String>>>,
    }

    impl Sink for Tagging {
        fn receive(&mut self, mut message: LogMessage) -> Result<()> {
            message.write().push_str(self.tag);
            self.out.lock().push(message.message);
            Ok(())
        }
    }

    struct Broken;

    impl Sink for Broken {
        fn receive(&mut self, _message: LogMessage) -> Result<()> {
            Err(LoggerError::writer("device unplugged"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn tagging(tag: &'static str, out: &Arc<Mutex<Vec<String>>>) -> SharedSink {
        let sink = Tagging {
            tag,
            out: Arc::clone(out),
        };
        BoundSink::bind(sink, Tagging::receive, tag.to_string()).0
    }

    #[test]
    fn test_fan_out_gives_each_sink_an_independent_copy() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SinkRegistry::new();
        registry.push(tagging("-a", &out));
        registry.push(tagging("-b", &out));
        registry.push(tagging("-c", &out));

        let metrics = WorkerMetrics::new();
        let message = LogMessage::new(LogLevel::Info, "msg");
        let calls = registry.fan_out(&message, &Capture::default(), &metrics);

        assert_eq!(calls, 3);
        assert_eq!(*out.lock(), vec!["msg-a", "msg-b", "msg-c"]);
        assert_eq!(message.message, "msg");
        assert_eq!(metrics.delivered(), 3);
    }

    #[test]
    fn test_failing_sink_does_not_stop_delivery() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SinkRegistry::new();
        registry.push(BoundSink::bind(Broken, Broken::receive, "broken".into()).0);
        registry.push(tagging("-ok", &out));

        let fallback = Capture::default();
        let metrics = WorkerMetrics::new();
        registry.fan_out(&LogMessage::new(LogLevel::Info, "m"), &fallback, &metrics);

        assert_eq!(*out.lock(), vec!["m-ok"]);
        assert_eq!(metrics.sink_errors(), 1);
        let reports = fallback.0.lock();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("Sink #0 (broken) failed: Writer error: device unplugged"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SinkRegistry::new();
        registry.push(tagging("-a", &out));

        registry.clear();
        assert!(registry.is_empty());
        registry.clear();
        assert_eq!(registry.len(), 0);
    }
}
