// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Concurrency Tests: Shared Vectors and Matrices
//!
//! - Opposite-direction adds on the same pair never deadlock
//! - Concurrent readers of one vector agree on its contents
//! - Row tasks on distinct rows of one matrix do not interfere

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use lae_memory::{SharedMatrix, SharedVector, VectorOrientation};
use ndarray::Array2;

const ROUNDS: usize = 2_000;

#[test]
fn cross_adds_complete_without_deadlock() {
    let a = Arc::new(SharedVector::new(vec![1.0; 16], VectorOrientation::Row));
    let b = Arc::new(SharedVector::new(vec![1.0; 16], VectorOrientation::Row));
    let start = Arc::new(Barrier::new(2));

    let forward = {
        let (a, b, start) = (Arc::clone(&a), Arc::clone(&b), Arc::clone(&start));
        thread::spawn(move || {
            start.wait();
            for _ in 0..ROUNDS {
                a.add(&b).unwrap();
                a.negate();
            }
        })
    };
    let backward = {
        let (a, b, start) = (Arc::clone(&a), Arc::clone(&b), Arc::clone(&start));
        thread::spawn(move || {
            start.wait();
            for _ in 0..ROUNDS {
                b.add(&a).unwrap();
                b.negate();
            }
        })
    };

    forward.join().unwrap();
    backward.join().unwrap();
    assert_eq!(a.length(), 16);
    assert_eq!(b.length(), 16);
}

#[test]
fn concurrent_readers_see_consistent_values() {
    let v = Arc::new(SharedVector::new(vec![1.0, 2.0, 3.0], VectorOrientation::Row));
    let other = Arc::new(SharedVector::new(vec![3.0, 2.0, 1.0], VectorOrientation::Column));

    thread::scope(|scope| {
        for _ in 0..4 {
            let (v, other) = (Arc::clone(&v), Arc::clone(&other));
            scope.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(v.dot(&v).unwrap(), 14.0);
                    assert_eq!(v.dot(&other).unwrap(), 10.0);
                    assert_eq!(other.dot(&v).unwrap(), 10.0);
                    thread::sleep(Duration::from_micros(20));
                }
            });
        }
    });

    assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn distinct_row_tasks_do_not_interfere() {
    let size = 64;
    let left_data = Array2::from_shape_fn((size, size), |(i, j)| (i + j) as f64);
    let right_data = Array2::<f64>::eye(size);
    let left = Arc::new(SharedMatrix::from_array(left_data.view()));
    let right = Arc::new(SharedMatrix::from_array(right_data.view()));

    thread::scope(|scope| {
        for row in left.rows() {
            let right = Arc::clone(&right);
            scope.spawn(move || {
                row.row_times_matrix(&right).unwrap();
                row.negate();
            });
        }
    });

    assert_eq!(left.read_row_major().unwrap(), left_data.mapv(|v| -v));
}
