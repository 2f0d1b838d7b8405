// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # LAE - Linear Algebra Engine
//!
//! Evaluates matrix expressions (`+`, `*`, unary `-`, transpose `T`) by
//! splitting every operation into one task per row and running those tasks
//! on a pool of persistent worker threads. Work always goes to the idle
//! worker with the lowest accumulated, randomly weighted busy time
//! ("fatigue").
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lae::prelude::*;
//!
//! let mut graph = lae::io::parse_str(
//!     r#"{"operator": "*", "operands": [[[1, 2], [3, 4]], [[5, 6], [7, 8]]]}"#,
//! )?;
//! graph.normalize();
//!
//! let mut engine = LinearAlgebraEngine::new(4)?;
//! let reduced = engine.run(graph)?;
//! println!("{:?}", reduced.root_matrix()?);
//! println!("{}", engine.worker_report());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: lae-config, lae-observability              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core: lae-memory, lae-scheduling, lae-graph            │
//! │  (shared rows, worker pool, expression arena)           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Execution: lae-engine                                  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: lae-io, `lae` binary                              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use lae_config as config;
pub use lae_engine as engine;
pub use lae_graph as graph;
pub use lae_io as io;
pub use lae_memory as memory;
pub use lae_observability as observability;
pub use lae_scheduling as scheduling;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::config::{LaeConfig, SchedulerConfig};
    pub use crate::engine::{EngineError, LinearAlgebraEngine};
    pub use crate::graph::{ComputationGraph, Node, NodeId, Operator};
    pub use crate::io::{OutputPayload, IoError};
    pub use crate::memory::{SharedMatrix, SharedVector, VectorOrientation};
    pub use crate::scheduling::{WorkerPool, WorkerStats};
}
