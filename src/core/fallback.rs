//! Always-available synchronous diagnostic output
//!
//! Used when a save finds no sinks, for the fatal trailer, and for the
//! worker's own `[LOGGER ...]` diagnostics.

use std::io::Write;

pub trait FallbackChannel: Send + Sync {
    /// Write `text` and make sure it reached its destination before returning.
    fn write(&self, text: &str);
}

/// Writes to the process's standard error stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrFallback;

impl FallbackChannel for StderrFallback {
    fn write(&self, text: &str) {
        let stderr = std::io::stderr();
        let mut lock = stderr.lock();
        // Nowhere left to report a failing stderr.
        let _ = lock.write_all(text.as_bytes());
        if !text.ends_with('\n') {
            let _ = lock.write_all(b"\n");
        }
        let _ = lock.flush();
    }
}
