//! Active object: one dedicated thread draining a FIFO queue of tasks
//!
//! The state `S` is moved onto the worker thread at spawn and is only ever
//! touched by tasks, so it needs no lock. Any thread may enqueue through a
//! [`TaskSender`]; tasks run one at a time in exact enqueue order.
//!
//! The queue is unbounded: producers never block on [`TaskSender::send`].
//! [`TaskSender::spawn_task`] additionally returns a [`CompletionToken`] the
//! caller can block on until its task has run.

use super::error::{LoggerError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

type Task<S> = Box<dyn FnOnce(&mut S) + Send>;

enum Command<S> {
    Run(Task<S>),
    Stop,
}

/// Cloneable producer side of an [`Active`] worker.
pub struct TaskSender<S> {
    sender: Sender<Command<S>>,
    stopping: Arc<AtomicBool>,
    worker: ThreadId,
}

impl<S> Clone for TaskSender<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            stopping: Arc::clone(&self.stopping),
            worker: self.worker,
        }
    }
}

impl<S> TaskSender<S> {
    /// Enqueue `task` without waiting. Fails once a stop was requested.
    pub fn send<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        if self.stopping.load(Ordering::Acquire) {
            return Err(LoggerError::WorkerStopped);
        }
        self.sender
            .send(Command::Run(Box::new(task)))
            .map_err(|_| LoggerError::WorkerStopped)
    }

    /// Enqueue `task` and return a token that resolves to its result.
    pub fn spawn_task<F, R>(&self, task: F) -> Result<CompletionToken<R>>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (done, receiver) = bounded(1);
        self.send(move |state| {
            // The caller may have dropped its token; the task still ran.
            let _ = done.send(task(state));
        })?;
        Ok(CompletionToken {
            receiver,
            worker: self.worker,
        })
    }

    #[inline]
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker
    }
}

/// One-shot handle for a task submitted with [`TaskSender::spawn_task`].
#[must_use = "a completion token does nothing unless waited on"]
pub struct CompletionToken<R> {
    receiver: Receiver<R>,
    worker: ThreadId,
}

impl<R> CompletionToken<R> {
    /// Block until the task has finished and return its result.
    ///
    /// Returns [`LoggerError::WorkerStopped`] if the worker stopped before
    /// running the task, and [`LoggerError::WaitOnWorkerThread`] when called
    /// from a task, where waiting could never complete.
    pub fn wait(self) -> Result<R> {
        if thread::current().id() == self.worker {
            return Err(LoggerError::WaitOnWorkerThread);
        }
        self.receiver.recv().map_err(|_| LoggerError::WorkerStopped)
    }
}

pub struct Active<S> {
    tasks: TaskSender<S>,
    handle: Option<JoinHandle<()>>,
}

impl<S: Send + 'static> Active<S> {
    /// Spawn the worker thread, moving `state` onto it.
    pub fn spawn(name: &str, state: S) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let stopping = Arc::new(AtomicBool::new(false));
        let stop_requested = Arc::clone(&stopping);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || Self::run(receiver, state, stop_requested))
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning log worker",
                    format!("thread '{}' could not be started", name),
                    e,
                )
            })?;
        let worker = handle.thread().id();

        Ok(Self {
            tasks: TaskSender {
                sender,
                stopping,
                worker,
            },
            handle: Some(handle),
        })
    }

    fn run(receiver: Receiver<Command<S>>, mut state: S, stop_requested: Arc<AtomicBool>) {
        // recv() parks the thread while the queue is empty
        while let Ok(command) = receiver.recv() {
            if stop_requested.load(Ordering::Acquire) {
                break;
            }
            match command {
                Command::Run(task) => {
                    if let Err(panic_info) =
                        panic::catch_unwind(AssertUnwindSafe(|| task(&mut state)))
                    {
                        eprintln!(
                            "[LOGGER CRITICAL] Log worker task panicked: {}. Aborting process.",
                            panic_message(&*panic_info)
                        );
                        std::process::abort();
                    }
                }
                Command::Stop => break,
            }
        }
    }
}

impl<S> Active<S> {
    pub fn tasks(&self) -> &TaskSender<S> {
        &self.tasks
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the worker once its in-flight task completes. Queued tasks are
    /// discarded. Idempotent.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.tasks.stopping.store(true, Ordering::Release);
        // Wakes the worker if it is parked on an empty queue
        let _ = self.tasks.sender.send(Command::Stop);

        // Joining ourselves would deadlock; the loop exits after this task.
        if thread::current().id() == handle.thread().id() {
            return;
        }
        if handle.join().is_err() {
            eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown");
        }
    }
}

impl<S> Drop for Active<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
