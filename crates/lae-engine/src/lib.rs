// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-engine
//!
//! Evaluates a [`lae_graph::ComputationGraph`] one operation at a time. Each
//! step stages the operands into two scratch [`lae_memory::SharedMatrix`]
//! buffers, runs one task per row on the worker pool, waits for the whole
//! batch, and collapses the node into the computed literal.

pub mod engine;
pub mod error;

pub use engine::LinearAlgebraEngine;
pub use error::{EngineError, EngineResult};
