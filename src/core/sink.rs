//! Sink trait and the type-erased wrapper the registry stores
//!
//! A concrete sink is registered together with the operation that receives
//! records (`Sink::receive` by default, or any method with the same shape).
//! The pair is erased into an `Arc<dyn SinkWrapper>` so that the registry and
//! any delivery that already captured it share ownership.

use super::error::{LoggerError, Result};
use super::log_message::LogMessage;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Output destination for records.
pub trait Sink: Send + 'static {
    /// Consume one record. Called on the worker thread only.
    fn receive(&mut self, message: LogMessage) -> Result<()>;

    fn name(&self) -> &str {
        "sink"
    }
}

/// Receive operation bound to a concrete sink type at registration.
pub type ReceiveFn<T> = Box<dyn Fn(&mut T, LogMessage) -> Result<()> + Send + Sync>;

/// Registry entry, erased over the concrete sink type.
pub trait SinkWrapper: Send + Sync {
    fn send(&self, message: LogMessage) -> Result<()>;
    fn name(&self) -> &str;
}

pub type SharedSink = Arc<dyn SinkWrapper>;

pub(crate) struct BoundSink<T> {
    sink: Arc<Mutex<T>>,
    receive: ReceiveFn<T>,
    name: String,
}

impl<T: Send + 'static> BoundSink<T> {
    /// Wrap `sink` and hand back the erased registry entry plus a typed handle.
    pub(crate) fn bind<F>(sink: T, receive: F, name: String) -> (SharedSink, SinkHandle<T>)
    where
        F: Fn(&mut T, LogMessage) -> Result<()> + Send + Sync + 'static,
    {
        let sink = Arc::new(Mutex::new(sink));
        let handle = SinkHandle {
            sink: Arc::downgrade(&sink),
            name: name.clone(),
        };
        let bound: SharedSink = Arc::new(BoundSink {
            sink,
            receive: Box::new(receive),
            name,
        });
        (bound, handle)
    }
}

impl<T: Send + 'static> SinkWrapper for BoundSink<T> {
    fn send(&self, message: LogMessage) -> Result<()> {
        let mut sink = self.sink.lock();
        (self.receive)(&mut *sink, message)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-side handle to a registered sink.
///
/// Holds the sink weakly: once the registry and every in-flight delivery
/// released it, [`SinkHandle::call`] fails with [`LoggerError::SinkGone`].
pub struct SinkHandle<T> {
    sink: Weak<Mutex<T>>,
    name: String,
}

impl<T> SinkHandle<T> {
    /// Run `f` against the concrete sink, serialized with deliveries.
    pub fn call<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let sink = self
            .sink
            .upgrade()
            .ok_or_else(|| LoggerError::sink_gone(self.name.clone()))?;
        let mut guard = sink.lock();
        Ok(f(&mut *guard))
    }

    pub fn is_registered(&self) -> bool {
        self.sink.strong_count() > 0
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for SinkHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Weak::clone(&self.sink),
            name: self.name.clone(),
        }
    }
}
