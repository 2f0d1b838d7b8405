// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Persistent worker thread with a single-slot mailbox
//!
//! A worker runs one task at a time. Between tasks it blocks on its mailbox,
//! which is the only place it ever suspends. Busy and idle intervals are
//! accumulated in nanoseconds; fatigue is the busy total scaled by the
//! worker's multiplier.

use std::any::Any;
use std::cmp::Ordering as CmpOrdering;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::error::{SchedulingError, SchedulingResult};
use crate::stats::WorkerStats;

/// Unit of work executed on a worker thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// How a task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Panicked,
}

/// Called on the worker thread after each task, once the worker is idle again
pub type IdleHook = Arc<dyn Fn(usize, TaskOutcome) + Send + Sync>;

/// Hook for workers used outside a pool
pub fn noop_hook() -> IdleHook {
    Arc::new(|_, _| {})
}

enum Mailbox {
    Run(Task),
    /// Sentinel: exit the run loop without running anything
    Stop,
}

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Busy,
    Stopped,
}

/// A persistent worker thread
///
/// # Design
/// - Dedicated named thread pulls tasks from a capacity-1 channel
/// - `assign` never blocks: a busy or stopped worker rejects the task
/// - Panicking tasks are caught; the worker keeps running
pub struct Worker {
    id: usize,
    multiplier: f64,
    alive: AtomicBool,
    /// Set from `assign` until the task has finished and been accounted for
    busy: AtomicBool,
    stopped: AtomicBool,
    time_used: AtomicU64,
    time_idle: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_panicked: AtomicU64,
    mailbox: Sender<Mailbox>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    /// Spawn a worker thread named `lae-worker-{id}`
    ///
    /// # Arguments
    /// - `id`: Worker index, unique within its pool
    /// - `multiplier`: Fatigue multiplier
    /// - `on_idle`: Invoked after every task, once the worker accepts work again
    pub fn spawn(id: usize, multiplier: f64, on_idle: IdleHook) -> SchedulingResult<Arc<Self>> {
        let (mailbox, inbox) = channel::bounded(1);
        let worker = Arc::new(Self {
            id,
            multiplier,
            alive: AtomicBool::new(true),
            busy: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            time_used: AtomicU64::new(0),
            time_idle: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            mailbox,
            handle: Mutex::new(None),
        });

        let runner = Arc::clone(&worker);
        let handle = thread::Builder::new()
            .name(format!("lae-worker-{}", id))
            .spawn(move || runner.run(inbox, on_idle))?;
        *worker.handle.lock() = Some(handle);

        debug!(worker_id = id, multiplier, "Worker started");
        Ok(worker)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Multiplier times cumulative busy nanoseconds
    pub fn fatigue(&self) -> f64 {
        self.multiplier * self.time_used.load(Ordering::Relaxed) as f64
    }

    /// Compare two workers by current fatigue (least fatigued first)
    pub fn cmp_fatigue(&self, other: &Worker) -> CmpOrdering {
        self.fatigue().total_cmp(&other.fatigue())
    }

    /// Cumulative busy time in nanoseconds
    pub fn time_used(&self) -> u64 {
        self.time_used.load(Ordering::Relaxed)
    }

    /// Cumulative idle time in nanoseconds
    pub fn time_idle(&self) -> u64 {
        self.time_idle.load(Ordering::Relaxed)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn state(&self) -> WorkerState {
        if self.stopped.load(Ordering::Acquire) {
            WorkerState::Stopped
        } else if self.busy.load(Ordering::Acquire) {
            WorkerState::Busy
        } else {
            WorkerState::Idle
        }
    }

    pub fn stats(&self) -> WorkerStats {
        WorkerStats {
            id: self.id,
            multiplier: self.multiplier,
            fatigue: self.fatigue(),
            time_used_ns: self.time_used(),
            time_idle_ns: self.time_idle(),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
        }
    }

    /// Hand one task to this worker without blocking
    ///
    /// # Errors
    /// `InvalidState` if the worker has been shut down or already holds a task.
    pub fn assign(&self, task: Task) -> SchedulingResult<()> {
        if !self.is_alive() {
            return Err(SchedulingError::InvalidState(format!(
                "worker {} is not alive",
                self.id
            )));
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SchedulingError::InvalidState(format!(
                "worker {} is busy",
                self.id
            )));
        }

        match self.mailbox.try_send(Mailbox::Run(task)) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.busy.store(false, Ordering::Release);
                let reason = match e {
                    TrySendError::Full(_) => "mailbox is full",
                    TrySendError::Disconnected(_) => "worker thread has exited",
                };
                Err(SchedulingError::InvalidState(format!(
                    "worker {}: {}",
                    self.id, reason
                )))
            }
        }
    }

    /// Stop accepting tasks and deliver the stop sentinel
    ///
    /// A task already in the mailbox still runs first. Does not wait for the
    /// thread to exit; see [`Worker::join`].
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
        // Fails only when the thread is already gone
        let _ = self.mailbox.send(Mailbox::Stop);
    }

    /// Wait for the worker thread to exit
    pub fn join(&self) -> SchedulingResult<()> {
        let handle = self.handle.lock().take();
        match handle {
            Some(handle) => handle
                .join()
                .map_err(|_| SchedulingError::WorkerPanicked { id: self.id }),
            None => Ok(()),
        }
    }

    fn run(self: Arc<Self>, inbox: Receiver<Mailbox>, on_idle: IdleHook) {
        let mut idle_since = Instant::now();

        while let Ok(message) = inbox.recv() {
            let task = match message {
                Mailbox::Run(task) => task,
                Mailbox::Stop => break,
            };
            self.time_idle
                .fetch_add(as_nanos(idle_since.elapsed()), Ordering::Relaxed);

            let started = Instant::now();
            let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(()) => TaskOutcome::Completed,
                Err(payload) => {
                    error!(
                        worker_id = self.id,
                        "Task panicked: {}",
                        panic_message(payload.as_ref())
                    );
                    TaskOutcome::Panicked
                }
            };
            let elapsed = started.elapsed();

            self.time_used
                .fetch_add(as_nanos(elapsed), Ordering::Relaxed);
            match outcome {
                TaskOutcome::Completed => self.tasks_completed.fetch_add(1, Ordering::Relaxed),
                TaskOutcome::Panicked => self.tasks_panicked.fetch_add(1, Ordering::Relaxed),
            };
            trace!(
                worker_id = self.id,
                busy_ns = as_nanos(elapsed),
                "Task finished"
            );

            idle_since = Instant::now();
            self.busy.store(false, Ordering::Release);
            on_idle(self.id, outcome);
        }

        self.alive.store(false, Ordering::Release);
        self.busy.store(false, Ordering::Release);
        self.stopped.store(true, Ordering::Release);
        debug!(worker_id = self.id, "Worker stopped");
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("multiplier", &self.multiplier)
            .field("state", &self.state())
            .field("fatigue", &self.fatigue())
            .finish()
    }
}

fn as_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
