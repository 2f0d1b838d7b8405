// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fatigue-aware worker pool
//!
//! Idle workers sit in a shared list; `submit` takes the least-fatigued one,
//! blocking while none is idle. A worker returns itself to the list from its
//! completion hook, after its busy time has been recorded, so the fatigue
//! seen at selection time is always up to date.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use lae_config::SchedulerConfig;
use parking_lot::{Condvar, Mutex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{SchedulingError, SchedulingResult};
use crate::stats::{format_report, WorkerStats};
use crate::worker::{IdleHook, Task, TaskOutcome, Worker};

/// State shared between the pool and the workers' completion hooks
struct Dispatcher {
    /// Ids of workers ready for a task
    idle: Mutex<Vec<usize>>,
    idle_ready: Condvar,
    /// Tasks submitted and not yet finished
    in_flight: Mutex<usize>,
    drained: Condvar,
    accepting: AtomicBool,
    panics: AtomicUsize,
}

impl Dispatcher {
    fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            idle_ready: Condvar::new(),
            in_flight: Mutex::new(0),
            drained: Condvar::new(),
            accepting: AtomicBool::new(true),
            panics: AtomicUsize::new(0),
        }
    }

    fn release(&self, worker_id: usize) {
        self.idle.lock().push(worker_id);
        self.idle_ready.notify_one();
    }

    fn finish_one(&self) {
        let mut in_flight = self.in_flight.lock();
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.drained.notify_all();
        }
    }

    fn on_idle(&self, worker_id: usize, outcome: TaskOutcome) {
        if outcome == TaskOutcome::Panicked {
            self.panics.fetch_add(1, Ordering::Relaxed);
        }
        self.release(worker_id);
        self.finish_one();
    }
}

/// Fixed-size pool of fatigue-tracking workers
///
/// Each worker draws a fatigue multiplier uniformly from
/// `[fatigue_min, fatigue_max)` at construction. Batches submitted through
/// [`WorkerPool::submit_all`] are barriers: the call returns only after every
/// task in the batch has run.
///
/// Concurrent `submit_all` calls from different threads share one in-flight
/// counter, so each waits for the other's tasks as well.
pub struct WorkerPool {
    workers: Vec<Arc<Worker>>,
    dispatcher: Arc<Dispatcher>,
}

impl WorkerPool {
    /// Pool of `workers` threads with default fatigue settings
    pub fn new(workers: usize) -> SchedulingResult<Self> {
        Self::with_config(&SchedulerConfig::with_workers(workers))
    }

    /// Pool sized and seeded from `config`
    ///
    /// # Errors
    /// - `InvalidState` if `workers` is zero or the fatigue range is empty
    /// - `Spawn` if a worker thread cannot be started
    pub fn with_config(config: &SchedulerConfig) -> SchedulingResult<Self> {
        if config.workers == 0 {
            return Err(SchedulingError::InvalidState(
                "worker pool needs at least one worker".to_string(),
            ));
        }
        let range_ok = config.fatigue_min.is_finite()
            && config.fatigue_max.is_finite()
            && config.fatigue_min > 0.0
            && config.fatigue_min < config.fatigue_max;
        if !range_ok {
            return Err(SchedulingError::InvalidState(format!(
                "invalid fatigue range [{}, {})",
                config.fatigue_min, config.fatigue_max
            )));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let dispatcher = Arc::new(Dispatcher::new());
        let mut workers = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let multiplier = rng.gen_range(config.fatigue_min..config.fatigue_max);
            let hook_target = Arc::clone(&dispatcher);
            let hook: IdleHook =
                Arc::new(move |worker_id, outcome| hook_target.on_idle(worker_id, outcome));

            match Worker::spawn(id, multiplier, hook) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    warn!(worker_id = id, error = %e, "Failed to spawn worker, stopping pool");
                    for worker in &workers {
                        worker.shutdown();
                    }
                    for worker in &workers {
                        let _ = worker.join();
                    }
                    return Err(e);
                }
            }
            dispatcher.idle.lock().push(id);
        }

        info!(
            workers = config.workers,
            fatigue_min = config.fatigue_min,
            fatigue_max = config.fatigue_max,
            seeded = config.seed.is_some(),
            "Worker pool started"
        );

        Ok(Self {
            workers,
            dispatcher,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tasks submitted and not yet finished
    pub fn in_flight(&self) -> usize {
        *self.dispatcher.in_flight.lock()
    }

    /// Hand `task` to the least-fatigued idle worker
    ///
    /// Blocks until a worker is idle. Ties in fatigue go to whichever tied
    /// worker became idle first.
    ///
    /// # Errors
    /// `Interrupted` if the pool shuts down before a worker frees up.
    pub fn submit(&self, task: Task) -> SchedulingResult<()> {
        let worker = self.acquire_idle()?;
        self.dispatch(&worker, task)
    }

    /// Run every task and wait until all of them have finished
    ///
    /// An empty batch returns immediately. A panicking task does not stop the
    /// rest of the batch.
    ///
    /// # Errors
    /// - `Interrupted` if the pool shut down before every task was submitted;
    ///   tasks already submitted are still waited for
    /// - `TaskPanicked` if any task of the batch panicked
    pub fn submit_all<I>(&self, tasks: I) -> SchedulingResult<()>
    where
        I: IntoIterator<Item = Task>,
    {
        let panics_before = self.dispatcher.panics.load(Ordering::Acquire);
        let mut submitted = 0usize;
        let mut result = Ok(());

        for task in tasks {
            if let Err(e) = self.submit(task) {
                result = Err(e);
                break;
            }
            submitted += 1;
        }

        self.wait_drained();
        debug!(tasks = submitted, "Batch finished");
        result?;

        let count = self
            .dispatcher
            .panics
            .load(Ordering::Acquire)
            .saturating_sub(panics_before);
        if count > 0 {
            return Err(SchedulingError::TaskPanicked { count });
        }
        Ok(())
    }

    /// Block until no submitted task is still running
    pub fn wait_drained(&self) {
        let mut in_flight = self.dispatcher.in_flight.lock();
        while *in_flight > 0 {
            self.dispatcher.drained.wait(&mut in_flight);
        }
    }

    /// Stop accepting work and signal every worker to exit
    ///
    /// Callers blocked in `submit` wake with `Interrupted`. Tasks already
    /// handed to a worker still run. Safe to call more than once.
    pub fn shutdown(&self) {
        if !self.dispatcher.accepting.swap(false, Ordering::AcqRel) {
            return;
        }
        {
            let _idle = self.dispatcher.idle.lock();
            self.dispatcher.idle_ready.notify_all();
        }
        for worker in &self.workers {
            worker.shutdown();
        }
        info!(workers = self.workers.len(), "Worker pool shutting down");
    }

    /// Wait for every worker thread to exit
    ///
    /// Call after [`WorkerPool::shutdown`]; otherwise this blocks forever.
    pub fn join(&self) -> SchedulingResult<()> {
        let mut first_error = None;
        for worker in &self.workers {
            if let Err(e) = worker.join() {
                warn!(worker_id = worker.id(), error = %e, "Worker join failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Per-worker counters in worker id order
    pub fn stats(&self) -> Vec<WorkerStats> {
        self.workers.iter().map(|w| w.stats()).collect()
    }

    /// One `id: X Fatigue: F Time Used: U Time Idle: I` line per worker
    pub fn report(&self) -> String {
        format_report(&self.stats())
    }

    /// Assign `task` to a worker taken from the idle set
    ///
    /// A shutdown that lands between acquiring the worker and assigning to it
    /// is reported as `Interrupted`, like a shutdown seen while waiting.
    fn dispatch(&self, worker: &Worker, task: Task) -> SchedulingResult<()> {
        *self.dispatcher.in_flight.lock() += 1;

        if let Err(e) = worker.assign(task) {
            self.dispatcher.finish_one();
            if !self.dispatcher.accepting.load(Ordering::Acquire) {
                debug!(worker_id = worker.id(), "Pool shut down before assignment");
                return Err(SchedulingError::Interrupted);
            }
            warn!(worker_id = worker.id(), error = %e, "Assignment failed");
            if worker.is_alive() {
                self.dispatcher.release(worker.id());
            }
            return Err(e);
        }
        Ok(())
    }

    fn acquire_idle(&self) -> SchedulingResult<Arc<Worker>> {
        let mut idle = self.dispatcher.idle.lock();
        loop {
            if !self.dispatcher.accepting.load(Ordering::Acquire) {
                return Err(SchedulingError::Interrupted);
            }

            let chosen = idle
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| self.workers[**a].cmp_fatigue(&self.workers[**b]))
                .map(|(position, _)| position);

            if let Some(position) = chosen {
                let id = idle.remove(position);
                return Ok(Arc::clone(&self.workers[id]));
            }
            self.dispatcher.idle_ready.wait(&mut idle);
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
        let _ = self.join();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::thread;
    use std::time::Duration;

    fn seeded(workers: usize, seed: u64) -> SchedulerConfig {
        SchedulerConfig {
            seed: Some(seed),
            ..SchedulerConfig::with_workers(workers)
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(SchedulingError::InvalidState(_))
        ));
    }

    #[test]
    fn test_empty_fatigue_range_rejected() {
        let config = SchedulerConfig {
            fatigue_min: 1.0,
            fatigue_max: 1.0,
            ..SchedulerConfig::with_workers(2)
        };
        assert!(matches!(
            WorkerPool::with_config(&config),
            Err(SchedulingError::InvalidState(_))
        ));
    }

    #[test]
    fn test_multipliers_within_range_and_reproducible() {
        let a = WorkerPool::with_config(&seeded(4, 7)).unwrap();
        let b = WorkerPool::with_config(&seeded(4, 7)).unwrap();

        let ma: Vec<f64> = a.stats().iter().map(|s| s.multiplier).collect();
        let mb: Vec<f64> = b.stats().iter().map(|s| s.multiplier).collect();
        assert_eq!(ma, mb);
        assert!(ma.iter().all(|m| (0.5..1.5).contains(m)));
    }

    #[test]
    fn test_least_fatigued_worker_is_chosen() {
        let pool = WorkerPool::with_config(&seeded(2, 1)).unwrap();

        // Make worker 0 measurably fatigued, then check the next task lands on 1
        let first = Arc::new(AtomicU64::new(u64::MAX));
        let slot = Arc::clone(&first);
        pool.submit_all(vec![Box::new(move || {
            thread::sleep(Duration::from_millis(5));
            slot.store(current_worker(), Ordering::SeqCst);
        }) as Task])
            .unwrap();
        let busy_worker = first.load(Ordering::SeqCst);

        let second = Arc::new(AtomicU64::new(u64::MAX));
        let slot = Arc::clone(&second);
        pool.submit_all(vec![Box::new(move || {
            slot.store(current_worker(), Ordering::SeqCst);
        }) as Task])
            .unwrap();

        assert_ne!(second.load(Ordering::SeqCst), busy_worker);
    }

    #[test]
    fn test_in_flight_returns_to_zero() {
        let pool = WorkerPool::new(3).unwrap();
        let tasks: Vec<Task> = (0..10)
            .map(|_| Box::new(|| thread::sleep(Duration::from_micros(100))) as Task)
            .collect();
        pool.submit_all(tasks).unwrap();
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_shutdown_after_acquire_reports_interrupted() {
        let pool = WorkerPool::new(1).unwrap();
        let worker = pool.acquire_idle().unwrap();
        pool.shutdown();

        let result = pool.dispatch(&worker, Box::new(|| {}));
        assert!(matches!(result, Err(SchedulingError::Interrupted)));
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let pool = WorkerPool::new(2).unwrap();
        pool.shutdown();
        pool.shutdown();
        pool.join().unwrap();
        assert!(matches!(
            pool.submit(Box::new(|| {})),
            Err(SchedulingError::Interrupted)
        ));
    }

    fn current_worker() -> u64 {
        thread::current()
            .name()
            .and_then(|name| name.strip_prefix("lae-worker-"))
            .and_then(|id| id.parse().ok())
            .unwrap_or(u64::MAX)
    }
}
