//! Logging lifecycle shared by the facade and the worker
//!
//! The phase only moves forward: `Normal -> Flushing -> Disabled -> Terminated`.
//! Producers read it before enqueueing; nothing ever resets it.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LoggingPhase {
    /// Records are accepted and delivered
    Normal = 0,
    /// A fatal record is being fanned out to the sinks
    Flushing = 1,
    /// No further records are accepted
    Disabled = 2,
    /// The termination handoff has been invoked
    Terminated = 3,
}

impl LoggingPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoggingPhase::Normal,
            1 => LoggingPhase::Flushing,
            2 => LoggingPhase::Disabled,
            _ => LoggingPhase::Terminated,
        }
    }
}

#[derive(Debug)]
pub struct LoggingState {
    phase: AtomicU8,
    fatal_claimed: AtomicBool,
}

impl LoggingState {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(LoggingPhase::Normal as u8),
            fatal_claimed: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> LoggingPhase {
        LoggingPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// True while new records may be enqueued.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.phase() == LoggingPhase::Normal
    }

    /// Move to `phase` unless already past it.
    pub(crate) fn advance(&self, phase: LoggingPhase) {
        self.phase.fetch_max(phase as u8, Ordering::AcqRel);
    }

    /// First caller wins; every later call returns false.
    pub(crate) fn claim_fatal(&self) -> bool {
        self.fatal_claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for LoggingState {
    fn default() -> Self {
        Self::new()
    }
}
