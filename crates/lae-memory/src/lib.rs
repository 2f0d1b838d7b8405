// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-memory
//!
//! Shared numeric storage for the LAE engine.
//!
//! A [`SharedMatrix`] is an ordered sequence of [`SharedVector`]s. Every vector
//! carries its own reader-writer lock, so row-level tasks running on different
//! workers can mutate distinct rows in place while reading others.
//!
//! ## Locking discipline
//! - Every accessor takes the vector's lock (shared for reads, exclusive for writes).
//! - Operations touching two vectors acquire both locks in ascending
//!   [`SharedVector::id`] order, regardless of which side is mutated.
//! - Matrix operands are snapshotted row by row before the target is
//!   write-locked, so no operation ever holds more than two vector locks.

pub mod error;
pub mod matrix;
pub mod vector;

pub use error::{MemoryError, MemoryResult};
pub use matrix::SharedMatrix;
pub use vector::{SharedVector, VectorOrientation};
