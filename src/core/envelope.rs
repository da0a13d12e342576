//! Single-owner message envelopes handed to the worker
//!
//! Neither envelope implements `Clone`: a producer moves its record into the
//! queue and the worker becomes the only owner. Copies for sinks are made
//! from the inner [`LogMessage`] during fan-out.

use super::log_level::LogLevel;
use super::log_message::LogMessage;
use super::signal::FatalSignal;

#[derive(Debug)]
pub struct LogEnvelope {
    message: Box<LogMessage>,
}

impl LogEnvelope {
    pub fn new(message: LogMessage) -> Self {
        Self {
            message: Box::new(message),
        }
    }

    pub fn message(&self) -> &LogMessage {
        &self.message
    }

    pub fn into_message(self) -> LogMessage {
        *self.message
    }
}

impl From<LogMessage> for LogEnvelope {
    fn from(message: LogMessage) -> Self {
        LogEnvelope::new(message)
    }
}

/// A crash record plus the signal that caused it.
#[derive(Debug)]
pub struct FatalEnvelope {
    message: Box<LogMessage>,
    signal: FatalSignal,
}

impl FatalEnvelope {
    /// The record's level is forced to [`LogLevel::Fatal`].
    pub fn new(mut message: LogMessage, signal: FatalSignal) -> Self {
        message.level = LogLevel::Fatal;
        Self {
            message: Box::new(message),
            signal,
        }
    }

    /// Fatal record for a failed check or explicit fatal call (SIGABRT).
    pub fn contract_violation(message: LogMessage) -> Self {
        Self::new(message, FatalSignal::default())
    }

    pub fn message(&self) -> &LogMessage {
        &self.message
    }

    pub fn signal(&self) -> FatalSignal {
        self.signal
    }

    pub fn signal_description(&self) -> String {
        self.signal.name()
    }

    pub fn into_parts(self) -> (LogMessage, FatalSignal) {
        (*self.message, self.signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_envelope_forces_fatal_level() {
        let envelope = FatalEnvelope::new(
            LogMessage::new(LogLevel::Info, "segfault in parser"),
            FatalSignal::SEGMENTATION_FAULT,
        );
        assert_eq!(envelope.message().level, LogLevel::Fatal);
        assert_eq!(envelope.signal_description(), "SIGSEGV");
    }

    #[test]
    fn test_contract_violation_uses_abort() {
        let envelope =
            FatalEnvelope::contract_violation(LogMessage::new(LogLevel::Fatal, "CHECK failed"));
        let (message, signal) = envelope.into_parts();
        assert_eq!(signal, FatalSignal::ABORT);
        assert_eq!(message.message, "CHECK failed");
    }
}
