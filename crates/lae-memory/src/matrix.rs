// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Matrix as an ordered sequence of shared vectors

use std::sync::Arc;

use ndarray::{Array2, ArrayView2};
use parking_lot::RwLock;

use crate::error::{ensure_len, MemoryError, MemoryResult};
use crate::vector::{SharedVector, VectorOrientation};

/// Ordered sequence of [`SharedVector`]s sharing one orientation
///
/// The matrix only guards its row sequence; element access goes through each
/// vector's own lock. Loading swaps the whole sequence at once, so a reader
/// sees either the old rows or the new ones.
#[derive(Debug, Default)]
pub struct SharedMatrix {
    vectors: RwLock<Vec<Arc<SharedVector>>>,
}

impl SharedMatrix {
    /// Empty matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix loaded row-major from `data`
    pub fn from_array(data: ArrayView2<'_, f64>) -> Self {
        let matrix = Self::new();
        matrix.load_row_major(data);
        matrix
    }

    /// Replace contents with one `Row` vector per input row
    pub fn load_row_major(&self, data: ArrayView2<'_, f64>) {
        let vectors = data
            .rows()
            .into_iter()
            .map(|row| Arc::new(SharedVector::new(row.to_vec(), VectorOrientation::Row)))
            .collect();
        *self.vectors.write() = vectors;
    }

    /// Replace contents with one `Column` vector per input column
    pub fn load_column_major(&self, data: ArrayView2<'_, f64>) {
        let vectors = data
            .columns()
            .into_iter()
            .map(|column| {
                Arc::new(SharedVector::new(
                    column.to_vec(),
                    VectorOrientation::Column,
                ))
            })
            .collect();
        *self.vectors.write() = vectors;
    }

    /// Snapshot of the contents, one output row per stored vector
    ///
    /// # Errors
    /// `DimensionMismatch` if the stored vectors no longer share one length.
    pub fn read_row_major(&self) -> MemoryResult<Array2<f64>> {
        let rows = self.snapshot_rows();
        let Some(width) = rows.first().map(Vec::len) else {
            return Ok(Array2::zeros((0, 0)));
        };

        let mut flat = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            ensure_len(width, row.len())?;
            flat.extend_from_slice(row);
        }

        Array2::from_shape_vec((rows.len(), width), flat).map_err(|_| {
            MemoryError::DimensionMismatch {
                expected: rows.len() * width,
                found: rows.iter().map(Vec::len).sum(),
            }
        })
    }

    pub fn get(&self, index: usize) -> MemoryResult<Arc<SharedVector>> {
        let vectors = self.vectors.read();
        vectors
            .get(index)
            .cloned()
            .ok_or(MemoryError::IndexOutOfBounds {
                index,
                len: vectors.len(),
            })
    }

    pub fn length(&self) -> usize {
        self.vectors.read().len()
    }

    /// Orientation of the first vector; `None` for an empty matrix
    pub fn orientation(&self) -> Option<VectorOrientation> {
        self.vectors.read().first().map(|v| v.orientation())
    }

    /// Handles to the current vectors
    pub fn rows(&self) -> Vec<Arc<SharedVector>> {
        self.vectors.read().clone()
    }

    /// Contents of every vector, each copied under its own read lock
    pub(crate) fn snapshot_rows(&self) -> Vec<Vec<f64>> {
        self.rows().iter().map(|v| v.to_vec()).collect()
    }
}
