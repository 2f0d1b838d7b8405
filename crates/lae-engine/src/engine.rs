// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Step-by-step graph reduction

use std::sync::Arc;

use lae_config::SchedulerConfig;
use lae_graph::{ComputationGraph, GraphError, NodeId, Operator};
use lae_memory::{MemoryError, MemoryResult, SharedMatrix, SharedVector};
use lae_scheduling::{Task, WorkerPool, WorkerStats};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{EngineError, EngineResult};

/// Linear algebra engine backed by a fatigue-aware worker pool
///
/// # Reduction step
/// | Operator    | Left scratch          | Right scratch     | Row task               |
/// |-------------|-----------------------|-------------------|------------------------|
/// | `Add`       | operand 0, row-major  | operand 1, rows   | `left[i] += right[i]`  |
/// | `Multiply`  | operand 0, row-major  | operand 1, rows   | `left[i] *= right`     |
/// | `Negate`    | operand 0, row-major  | -                 | `left[i] = -left[i]`   |
/// | `Transpose` | operand 0, col-major  | -                 | flip `left[i]`         |
///
/// After the batch, the left scratch read back row-major is the result.
pub struct LinearAlgebraEngine {
    left: Arc<SharedMatrix>,
    right: Arc<SharedMatrix>,
    pool: WorkerPool,
}

impl LinearAlgebraEngine {
    /// Engine with `workers` threads and default fatigue settings
    pub fn new(workers: usize) -> EngineResult<Self> {
        Self::with_config(&SchedulerConfig::with_workers(workers))
    }

    pub fn with_config(config: &SchedulerConfig) -> EngineResult<Self> {
        Ok(Self {
            left: Arc::new(SharedMatrix::new()),
            right: Arc::new(SharedMatrix::new()),
            pool: WorkerPool::with_config(config)?,
        })
    }

    /// Reduce `graph` to a single literal, then shut the worker pool down
    ///
    /// The pool is shut down whether or not reduction succeeds; the engine
    /// cannot reduce further graphs afterwards, but its worker report stays
    /// available.
    #[instrument(skip_all, fields(nodes = graph.node_count(), workers = self.pool.size()))]
    pub fn run(&mut self, mut graph: ComputationGraph) -> EngineResult<ComputationGraph> {
        info!("Starting reduction");
        let reduced = self.reduce(&mut graph);

        self.pool.shutdown();
        let joined = self.pool.join();

        let steps = reduced?;
        if let Err(e) = joined {
            warn!(error = %e, "Worker pool did not shut down cleanly");
            return Err(EngineError::Interrupted);
        }

        let (rows, cols) = graph.root_matrix()?.dim();
        info!(steps, rows, cols, "Reduction finished");
        Ok(graph)
    }

    /// Reduce `graph` in place without shutting the pool down
    ///
    /// Operations are computed in [`ComputationGraph::reduction_order`], the
    /// same deepest-leftmost-first order as repeated
    /// [`ComputationGraph::find_reducible`] calls. Returns the number of
    /// reduction steps taken.
    pub fn reduce(&mut self, graph: &mut ComputationGraph) -> EngineResult<usize> {
        let mut steps = 0;
        for node in graph.reduction_order() {
            self.load_and_compute(graph, node)?;
            steps += 1;
        }
        if !graph.is_reduced() {
            return Err(GraphError::MissingRoot.into());
        }
        Ok(steps)
    }

    /// Compute one operation whose operands are all literals and collapse it
    ///
    /// If a row task fails, the first recorded error is returned and the node
    /// is left as is. Other rows of the batch may already have been updated
    /// in the scratch buffers.
    pub fn load_and_compute(
        &mut self,
        graph: &mut ComputationGraph,
        node: NodeId,
    ) -> EngineResult<()> {
        let operator = graph.operator(node)?;
        let children = graph.children(node)?.to_vec();
        if children.len() != operator.arity() {
            return Err(GraphError::InvalidArity {
                operator,
                expected: operator.arity(),
                found: children.len(),
            }
            .into());
        }

        match operator {
            Operator::Add | Operator::Multiply => {
                self.left.load_row_major(graph.matrix(children[0])?.view());
                self.right.load_row_major(graph.matrix(children[1])?.view());
            }
            Operator::Negate => self.left.load_row_major(graph.matrix(children[0])?.view()),
            Operator::Transpose => self
                .left
                .load_column_major(graph.matrix(children[0])?.view()),
        }

        let rows = self.left.length();
        if operator == Operator::Add && self.right.length() != rows {
            return Err(MemoryError::DimensionMismatch {
                expected: rows,
                found: self.right.length(),
            }
            .into());
        }
        debug!(node = %node, operator = %operator, rows, "Reducing node");

        let failure: Arc<Mutex<Option<MemoryError>>> = Arc::new(Mutex::new(None));
        let tasks: Vec<Task> = (0..rows)
            .map(|index| {
                let left = Arc::clone(&self.left);
                let right = Arc::clone(&self.right);
                let failure = Arc::clone(&failure);
                Box::new(move || {
                    let outcome = left
                        .get(index)
                        .and_then(|row| apply_row(operator, &row, &right, index));
                    if let Err(e) = outcome {
                        failure.lock().get_or_insert(e);
                    }
                }) as Task
            })
            .collect();

        let batch = self.pool.submit_all(tasks);
        if let Some(e) = failure.lock().take() {
            debug!(node = %node, error = %e, "Row task failed");
            return Err(e.into());
        }
        batch?;

        let result = self.left.read_row_major()?;
        graph.collapse(node, result)?;
        Ok(())
    }

    /// One line per worker: `id: X Fatigue: F Time Used: U Time Idle: I`
    pub fn worker_report(&self) -> String {
        self.pool.report()
    }

    pub fn worker_stats(&self) -> Vec<WorkerStats> {
        self.pool.stats()
    }
}

fn apply_row(
    operator: Operator,
    row: &SharedVector,
    right: &SharedMatrix,
    index: usize,
) -> MemoryResult<()> {
    match operator {
        Operator::Add => row.add(right.get(index)?.as_ref()),
        Operator::Multiply => row.row_times_matrix(right),
        Operator::Negate => {
            row.negate();
            Ok(())
        }
        Operator::Transpose => {
            row.transpose();
            Ok(())
        }
    }
}
