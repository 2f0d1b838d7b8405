// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by shared vector and matrix operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// Operand shapes are incompatible for the requested operation
    #[error("Illegal operation: dimensions mismatch (expected {expected}, found {found})")]
    DimensionMismatch { expected: usize, found: usize },

    /// Element or row index past the end
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type MemoryResult<T> = Result<T, MemoryError>;

pub(crate) fn ensure_len(expected: usize, found: usize) -> MemoryResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(MemoryError::DimensionMismatch { expected, found })
    }
}
