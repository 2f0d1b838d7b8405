// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reduction Benchmarks
//!
//! Purpose:
//! - Measure one reduction step per operator on square matrices.
//! - Compare pool sizes on the same workload.
//!
//! Notes:
//! - One engine per benchmark; `reduce` keeps its pool alive between
//!   iterations so thread startup is not measured.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lae_engine::LinearAlgebraEngine;
use lae_graph::{ComputationGraph, Operator};
use ndarray::Array2;

fn square(size: usize, salt: usize) -> Array2<f64> {
    Array2::from_shape_fn((size, size), |(i, j)| ((i * 31 + j * 17 + salt) % 13) as f64)
}

fn single_step(operator: Operator, size: usize) -> ComputationGraph {
    let mut graph = ComputationGraph::new();
    let mut children = vec![graph.literal(square(size, 1))];
    if operator.arity() == 2 {
        children.push(graph.literal(square(size, 2)));
    }
    let root = graph.operation_of(operator, children);
    graph.set_root(root).expect("root was just added");
    graph
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_step");
    let mut engine = LinearAlgebraEngine::new(4).expect("engine should start");

    for size in [16usize, 64, 128] {
        group.throughput(Throughput::Elements((size * size) as u64));
        for operator in Operator::ALL {
            let template = single_step(operator, size);
            group.bench_with_input(
                BenchmarkId::new(operator.to_string(), size),
                &template,
                |b, template| {
                    b.iter(|| {
                        let mut graph = template.clone();
                        black_box(engine.reduce(&mut graph).ok());
                        graph
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_pool_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_by_workers");
    let template = single_step(Operator::Multiply, 96);

    for workers in [1usize, 2, 4, 8] {
        let mut engine = LinearAlgebraEngine::new(workers).expect("engine should start");
        group.bench_with_input(BenchmarkId::from_parameter(workers), &template, |b, template| {
            b.iter(|| {
                let mut graph = template.clone();
                black_box(engine.reduce(&mut graph).ok());
                graph
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_operators, bench_pool_sizes);
criterion_main!(benches);
