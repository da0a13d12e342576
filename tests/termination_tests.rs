//! End-to-end test of the default termination handler
//!
//! The fatal path ends the process, so the test re-runs this binary as a
//! child and inspects how the child exited.

#![cfg(unix)]

use rust_log_worker::prelude::*;
use std::os::unix::process::ExitStatusExt;
use std::process::Command;
use std::thread;
use std::time::Duration;

const CHILD_ENV: &str = "RUST_LOG_WORKER_FATAL_CHILD";
const TEST_NAME: &str = "test_fatal_exits_with_the_triggering_signal";

fn run_fatal_child() {
    let worker = LogWorker::new().expect("Failed to start worker");
    worker
        .fatal(FatalEnvelope::new(
            LogMessage::new(LogLevel::Fatal, "invalid memory access"),
            FatalSignal::SEGMENTATION_FAULT,
        ))
        .expect("Fatal should be dispatched");

    // The worker ends the process; getting past this means it did not
    thread::sleep(Duration::from_secs(10));
    std::process::exit(0);
}

#[test]
fn test_fatal_exits_with_the_triggering_signal() {
    if std::env::var_os(CHILD_ENV).is_some() {
        run_fatal_child();
        return;
    }

    let exe = std::env::current_exe().expect("Failed to locate test binary");
    let output = Command::new(exe)
        .args([TEST_NAME, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .expect("Failed to run child process");

    assert_eq!(output.status.signal(), Some(libc::SIGSEGV));
    assert_eq!(output.status.code(), None);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid memory access"));
    assert!(stderr.contains("Exiting with signal: SIGSEGV"));
}
