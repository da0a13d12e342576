//! Process-wide logging entry point
//!
//! At most one [`LogWorker`] is installed at a time. Free functions route
//! records to it; before initialization (or after shutdown) records go to
//! stderr instead of being dropped silently.

use super::envelope::{FatalEnvelope, LogEnvelope};
use super::error::{LoggerError, Result};
use super::fallback::{FallbackChannel, StderrFallback};
use super::log_message::LogMessage;
use super::log_worker::{LogWorker, WorkerHandle};
use super::signal::FatalSignal;
use parking_lot::RwLock;

static ACTIVE_WORKER: RwLock<Option<WorkerHandle>> = parking_lot::const_rwlock(None);

/// Install `worker` as the process-wide destination for [`save_message`] and
/// [`fatal_message`].
pub fn initialize_logging(worker: &LogWorker) -> Result<()> {
    let mut active = ACTIVE_WORKER.write();
    if active.is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    if !worker.phase_accepting() {
        return Err(LoggerError::LoggingDisabled);
    }
    *active = Some(worker.handle());
    Ok(())
}

pub fn is_logging_initialized() -> bool {
    ACTIVE_WORKER.read().is_some()
}

fn active_worker() -> Option<WorkerHandle> {
    ACTIVE_WORKER.read().clone()
}

pub fn save_message(message: LogMessage) {
    match active_worker() {
        Some(worker) => worker.save(LogEnvelope::new(message)),
        None => StderrFallback.write(&format!(
            "[LOGGER WARNING] Logging is not initialized. Message: [{}]",
            message
        )),
    }
}

pub fn fatal_message(message: LogMessage, signal: FatalSignal) -> Result<()> {
    match active_worker() {
        Some(worker) => worker.fatal(FatalEnvelope::new(message, signal)),
        None => {
            StderrFallback.write(&format!(
                "[LOGGER WARNING] Logging is not initialized. Fatal message ({}): [{}]",
                signal, message
            ));
            Err(LoggerError::NotInitialized)
        }
    }
}

/// Detach the installed worker, if any. The worker itself keeps running
/// until it is dropped.
pub fn shutdown_logging() -> bool {
    ACTIVE_WORKER.write().take().is_some()
}

/// Detach only if the installed worker is the one with `worker_id`.
pub(crate) fn shutdown_logging_for_active_only(worker_id: u64) -> bool {
    let mut active = ACTIVE_WORKER.write();
    if active.as_ref().map(WorkerHandle::id) == Some(worker_id) {
        *active = None;
        true
    } else {
        false
    }
}
