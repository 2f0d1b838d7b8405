// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-scheduling
//!
//! A fixed pool of persistent worker threads. Each worker tracks how long it
//! has spent busy and idle and derives a "fatigue" score from its busy time;
//! the pool always hands new work to the least-fatigued idle worker.
//!
//! ## Design
//! - One OS thread per worker, fed through a single-slot mailbox
//! - Workers re-enqueue themselves through a completion hook once their
//!   bookkeeping is done, so an idle worker is always ready to accept work
//! - `submit_all` is a full barrier: it returns once every task of the batch
//!   has finished

pub mod error;
pub mod pool;
pub mod stats;
pub mod worker;

pub use error::{SchedulingError, SchedulingResult};
pub use pool::WorkerPool;
pub use stats::WorkerStats;
pub use worker::{noop_hook, IdleHook, Task, TaskOutcome, Worker, WorkerState};
