// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Lock-guarded row/column vector

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ensure_len, MemoryError, MemoryResult};
use crate::matrix::SharedMatrix;

static NEXT_VECTOR_ID: AtomicU64 = AtomicU64::new(0);

/// Whether a vector is stored as a matrix row or a matrix column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorOrientation {
    Row,
    Column,
}

impl VectorOrientation {
    pub fn flipped(self) -> Self {
        match self {
            VectorOrientation::Row => VectorOrientation::Column,
            VectorOrientation::Column => VectorOrientation::Row,
        }
    }
}

#[derive(Debug)]
struct VectorState {
    data: Vec<f64>,
    orientation: VectorOrientation,
}

/// A mutable vector guarded by a reader-writer lock
///
/// Each vector gets a process-unique id at construction. Binary operations
/// lock their operands in ascending id order, so `a.add(&b)` and `b.add(&a)`
/// can run concurrently without deadlocking.
#[derive(Debug)]
pub struct SharedVector {
    id: u64,
    state: RwLock<VectorState>,
}

impl SharedVector {
    pub fn new(data: Vec<f64>, orientation: VectorOrientation) -> Self {
        Self {
            id: NEXT_VECTOR_ID.fetch_add(1, Ordering::Relaxed),
            state: RwLock::new(VectorState { data, orientation }),
        }
    }

    /// Stable identity used for lock ordering
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get(&self, index: usize) -> MemoryResult<f64> {
        let state = self.state.read();
        state
            .data
            .get(index)
            .copied()
            .ok_or(MemoryError::IndexOutOfBounds {
                index,
                len: state.data.len(),
            })
    }

    pub fn length(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn orientation(&self) -> VectorOrientation {
        self.state.read().orientation
    }

    /// Copy of the current contents
    pub fn to_vec(&self) -> Vec<f64> {
        self.state.read().data.clone()
    }

    /// Flip orientation in place; contents are untouched
    pub fn transpose(&self) {
        let mut state = self.state.write();
        state.orientation = state.orientation.flipped();
    }

    pub fn negate(&self) {
        let mut state = self.state.write();
        for value in state.data.iter_mut() {
            *value = -*value;
        }
    }

    /// Elementwise `self += other`
    ///
    /// # Errors
    /// `DimensionMismatch` if the lengths differ; `self` is left untouched.
    pub fn add(&self, other: &SharedVector) -> MemoryResult<()> {
        if self.id == other.id {
            let mut state = self.state.write();
            for value in state.data.iter_mut() {
                *value += *value;
            }
            return Ok(());
        }

        let (mut target, source) = self.lock_write_read(other);
        ensure_len(target.data.len(), source.data.len())?;
        for (t, s) in target.data.iter_mut().zip(source.data.iter()) {
            *t += *s;
        }
        Ok(())
    }

    /// Inner product of two equal-length vectors
    pub fn dot(&self, other: &SharedVector) -> MemoryResult<f64> {
        if self.id == other.id {
            let state = self.state.read();
            return Ok(state.data.iter().map(|v| v * v).sum());
        }

        let (first, second) = if self.id < other.id {
            (self, other)
        } else {
            (other, self)
        };
        let a = first.state.read();
        let b = second.state.read();
        ensure_len(a.data.len(), b.data.len())?;
        Ok(a.data.iter().zip(b.data.iter()).map(|(x, y)| x * y).sum())
    }

    /// Replace `self` with `self × matrix`
    ///
    /// The vector length must equal the matrix row count and all matrix rows
    /// must share one width; the result has that width. This is the only
    /// operation that changes a vector's length.
    ///
    /// Matrix rows are read (each under its own read lock, one at a time)
    /// before `self` is write-locked, so `self` may itself be a row of
    /// `matrix`.
    pub fn row_times_matrix(&self, matrix: &SharedMatrix) -> MemoryResult<()> {
        let rows = matrix.snapshot_rows();
        let width = rows.first().map_or(0, Vec::len);
        for row in &rows {
            ensure_len(width, row.len())?;
        }

        let mut state = self.state.write();
        ensure_len(rows.len(), state.data.len())?;

        let mut product = vec![0.0; width];
        for (scale, row) in state.data.iter().zip(rows.iter()) {
            for (out, value) in product.iter_mut().zip(row.iter()) {
                *out += scale * value;
            }
        }
        state.data = product;
        Ok(())
    }

    fn lock_write_read<'a>(
        &'a self,
        other: &'a SharedVector,
    ) -> (
        RwLockWriteGuard<'a, VectorState>,
        RwLockReadGuard<'a, VectorState>,
    ) {
        if self.id < other.id {
            let target = self.state.write();
            let source = other.state.read();
            (target, source)
        } else {
            let source = other.state.read();
            let target = self.state.write();
            (target, source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(data: &[f64]) -> SharedVector {
        SharedVector::new(data.to_vec(), VectorOrientation::Row)
    }

    fn column(data: &[f64]) -> SharedVector {
        SharedVector::new(data.to_vec(), VectorOrientation::Column)
    }

    #[test]
    fn test_accessors() {
        let v = row(&[1.0, 2.0, 3.0]);
        assert_eq!(v.get(0), Ok(1.0));
        assert_eq!(v.get(2), Ok(3.0));
        assert_eq!(v.length(), 3);
        assert_eq!(v.orientation(), VectorOrientation::Row);
        assert_eq!(
            v.get(3),
            Err(MemoryError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let a = row(&[1.0]);
        let b = row(&[1.0]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_transpose_flips_and_restores() {
        let v = row(&[1.0, 2.0]);
        v.transpose();
        assert_eq!(v.orientation(), VectorOrientation::Column);
        assert_eq!(v.to_vec(), vec![1.0, 2.0]);
        v.transpose();
        assert_eq!(v.orientation(), VectorOrientation::Row);

        let c = column(&[4.0]);
        c.transpose();
        assert_eq!(c.orientation(), VectorOrientation::Row);
    }

    #[test]
    fn test_negate_twice_restores() {
        let v = row(&[1.0, -2.0, 3.5, 0.0]);
        v.negate();
        assert_eq!(v.to_vec(), vec![-1.0, 2.0, -3.5, -0.0]);
        v.negate();
        assert_eq!(v.to_vec(), vec![1.0, -2.0, 3.5, 0.0]);
    }

    #[test]
    fn test_add() {
        let a = row(&[1.0, 2.0, 3.0]);
        let b = row(&[4.0, 5.0, 6.0]);
        a.add(&b).unwrap();
        assert_eq!(a.to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!(b.to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_add_both_lock_orders() {
        let first = row(&[1.0, -2.0]);
        let second = row(&[-1.0, 2.0]);
        assert!(first.id() < second.id());

        second.add(&first).unwrap();
        assert_eq!(second.to_vec(), vec![0.0, 0.0]);
        first.add(&second).unwrap();
        assert_eq!(first.to_vec(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_add_to_itself_doubles() {
        let a = row(&[1.0, 2.5]);
        a.add(&a).unwrap();
        assert_eq!(a.to_vec(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_add_mismatch_leaves_self_untouched() {
        let a = row(&[1.0, 2.0]);
        let b = row(&[1.0, 2.0, 3.0]);
        assert_eq!(
            a.add(&b),
            Err(MemoryError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(a.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_dot() {
        let a = row(&[1.0, 2.0, 3.0]);
        let b = column(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), Ok(32.0));
        assert_eq!(b.dot(&a), Ok(32.0));
        assert_eq!(a.dot(&a), Ok(14.0));
        assert_eq!(a.dot(&column(&[0.0, 0.0, 0.0])), Ok(0.0));
    }

    #[test]
    fn test_dot_mismatch() {
        let a = row(&[1.0, 2.0]);
        let b = column(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            a.dot(&b),
            Err(MemoryError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_row_times_matrix() {
        // [1, 2] x [[1,2,3],[4,5,6]] = [9, 12, 15]
        let v = row(&[1.0, 2.0]);
        let m = SharedMatrix::from_array(ndarray::array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].view());
        v.row_times_matrix(&m).unwrap();
        assert_eq!(v.to_vec(), vec![9.0, 12.0, 15.0]);
        assert_eq!(v.orientation(), VectorOrientation::Row);
    }

    #[test]
    fn test_row_times_identity_is_unchanged() {
        let v = row(&[1.0, 2.0, 3.0]);
        let identity = SharedMatrix::from_array(ndarray::Array2::<f64>::eye(3).view());
        v.row_times_matrix(&identity).unwrap();
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_row_times_matrix_mismatch_leaves_self_untouched() {
        let v = row(&[1.0, 2.0]);
        let m = SharedMatrix::from_array(
            ndarray::array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].view(),
        );
        assert_eq!(
            v.row_times_matrix(&m),
            Err(MemoryError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(v.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_row_times_matrix_containing_self() {
        let m = SharedMatrix::from_array(ndarray::array![[1.0, 1.0], [0.0, 2.0]].view());
        let first = m.get(0).unwrap();
        // [1, 1] x [[1,1],[0,2]] = [1, 3]
        first.row_times_matrix(&m).unwrap();
        assert_eq!(first.to_vec(), vec![1.0, 3.0]);
    }
}
