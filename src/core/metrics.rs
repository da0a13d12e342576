//! Worker metrics for observability
//!
//! Counters are written by producers (enqueue side) and by the worker thread
//! (delivery side) and can be read from anywhere.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what the worker did with submitted records.
///
/// # Example
///
/// ```
/// use rust_log_worker::WorkerMetrics;
///
/// let metrics = WorkerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_delivered(3);
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.delivered(), 3);
/// ```
#[derive(Debug)]
pub struct WorkerMetrics {
    /// Records accepted by the facade and queued
    enqueued: AtomicU64,

    /// Records refused because logging was disabled or the worker stopped
    rejected: AtomicU64,

    /// Copies handed to sinks (one per sink per record)
    delivered: AtomicU64,

    /// Saves processed while no sink was registered
    no_sink_reports: AtomicU64,

    /// Receive calls that returned an error
    sink_errors: AtomicU64,

    /// Fatal records processed by the worker
    fatal_events: AtomicU64,
}

impl WorkerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            no_sink_reports: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            fatal_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn no_sink_reports(&self) -> u64 {
        self.no_sink_reports.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fatal_events(&self) -> u64 {
        self.fatal_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self, copies: u64) -> u64 {
        self.delivered.fetch_add(copies, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_no_sink(&self) -> u64 {
        self.no_sink_reports.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_fatal(&self) -> u64 {
        self.fatal_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of receive calls that failed, as a percentage (0.0 - 100.0)
    pub fn sink_error_rate(&self) -> f64 {
        let errors = self.sink_errors() as f64;
        let attempts = self.delivered() as f64;
        if attempts == 0.0 {
            0.0
        } else {
            (errors / attempts) * 100.0
        }
    }
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WorkerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            rejected: AtomicU64::new(self.rejected()),
            delivered: AtomicU64::new(self.delivered()),
            no_sink_reports: AtomicU64::new(self.no_sink_reports()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            fatal_events: AtomicU64::new(self.fatal_events()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = WorkerMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.rejected(), 0);
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.no_sink_reports(), 0);
        assert_eq!(metrics.fatal_events(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = WorkerMetrics::new();
        assert_eq!(metrics.record_rejected(), 0);
        assert_eq!(metrics.record_rejected(), 1);
        assert_eq!(metrics.rejected(), 2);
    }

    #[test]
    fn test_sink_error_rate() {
        let metrics = WorkerMetrics::new();
        assert_eq!(metrics.sink_error_rate(), 0.0);

        metrics.record_delivered(20);
        metrics.record_sink_error();
        metrics.record_sink_error();

        let rate = metrics.sink_error_rate();
        assert!((9.9..=10.1).contains(&rate), "Error rate was {}", rate);
    }

    #[test]
    fn test_clone_is_snapshot() {
        let metrics = WorkerMetrics::new();
        metrics.record_enqueued();

        let snapshot = metrics.clone();
        metrics.record_enqueued();

        assert_eq!(snapshot.enqueued(), 1);
        assert_eq!(metrics.enqueued(), 2);
    }
}
