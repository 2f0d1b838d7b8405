// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by workers and the worker pool
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Task handed to a worker that cannot take it (stopped or busy), or a
    /// pool built with unusable settings
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A blocking wait was aborted because the pool shut down
    #[error("Interrupted: worker pool is shut down")]
    Interrupted,

    /// Tasks in the last batch panicked; the rest of the batch still ran
    #[error("{count} task(s) panicked during batch execution")]
    TaskPanicked { count: usize },

    /// Worker thread terminated abnormally
    #[error("Worker {id} terminated abnormally")]
    WorkerPanicked { id: usize },

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
