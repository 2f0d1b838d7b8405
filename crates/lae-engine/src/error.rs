// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use lae_graph::GraphError;
use lae_memory::MemoryError;
use lae_scheduling::SchedulingError;

/// Errors raised while reducing a graph
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    /// The worker pool did not shut down cleanly after the run
    #[error("Interrupted while shutting down the worker pool")]
    Interrupted,
}

pub type EngineResult<T> = Result<T, EngineError>;
