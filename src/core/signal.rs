//! Fatal signal identifiers and the abnormal-termination handoff
//!
//! After the worker has flushed every sink on a fatal event it hands the
//! process to a [`TerminationHandler`]. The default handler restores the
//! default disposition of the triggering signal and raises it again, so the
//! process ends with the same cause an unhandled crash would have produced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the signal that triggered a fatal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FatalSignal(i32);

impl FatalSignal {
    pub const ABORT: FatalSignal = FatalSignal(libc::SIGABRT);
    pub const FLOATING_POINT: FatalSignal = FatalSignal(libc::SIGFPE);
    pub const ILLEGAL_INSTRUCTION: FatalSignal = FatalSignal(libc::SIGILL);
    pub const SEGMENTATION_FAULT: FatalSignal = FatalSignal(libc::SIGSEGV);
    pub const TERMINATE: FatalSignal = FatalSignal(libc::SIGTERM);
    pub const INTERRUPT: FatalSignal = FatalSignal(libc::SIGINT);

    pub const fn from_raw(id: i32) -> Self {
        FatalSignal(id)
    }

    pub const fn id(&self) -> i32 {
        self.0
    }

    /// Conventional name, e.g. `SIGSEGV`.
    pub fn name(&self) -> String {
        let known = match self.0 {
            libc::SIGABRT => "SIGABRT",
            libc::SIGFPE => "SIGFPE",
            libc::SIGILL => "SIGILL",
            libc::SIGSEGV => "SIGSEGV",
            libc::SIGTERM => "SIGTERM",
            libc::SIGINT => "SIGINT",
            other => return format!("UNKNOWN SIGNAL({})", other),
        };
        known.to_string()
    }
}

/// Contract violations and explicit fatal calls are reported as SIGABRT.
impl Default for FatalSignal {
    fn default() -> Self {
        FatalSignal::ABORT
    }
}

impl fmt::Display for FatalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Ends the process after a fatal event.
///
/// `exit_with_signal` is not expected to return. If it does, the worker
/// reports the failure on the fallback channel and calls `force_exit`.
pub trait TerminationHandler: Send + Sync {
    fn exit_with_signal(&self, signal: FatalSignal);

    fn force_exit(&self) {
        std::process::abort();
    }
}

/// Re-raises the triggering signal with its default disposition.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTerminationHandler;

impl TerminationHandler for DefaultTerminationHandler {
    #[cfg(unix)]
    fn exit_with_signal(&self, signal: FatalSignal) {
        // SAFETY: resetting a disposition and raising a signal on the current
        // process has no memory-safety preconditions.
        unsafe {
            libc::signal(signal.id(), libc::SIG_DFL);
            libc::raise(signal.id());
        }
    }

    #[cfg(not(unix))]
    fn exit_with_signal(&self, _signal: FatalSignal) {
        std::process::abort();
    }
}
