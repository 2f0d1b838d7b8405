// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-graph
//!
//! Matrix expression trees stored in an arena.
//!
//! Leaves are literal matrices; interior nodes apply one of four operators
//! (`+`, `*`, `-`, `T`) to their children. The engine repeatedly picks the
//! deepest reducible operation, computes it, and collapses that node into a
//! literal until only the root literal is left.

pub mod error;
pub mod graph;
pub mod operator;

pub use error::{GraphError, GraphResult};
pub use graph::{ComputationGraph, Node, NodeId};
pub use operator::Operator;
