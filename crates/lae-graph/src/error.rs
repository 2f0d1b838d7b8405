// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::graph::NodeId;
use crate::operator::Operator;

/// Errors raised while building or reducing a computation graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A literal was expected where an operation was found, or vice versa
    #[error("Invalid node type: node {node} is {found}, expected {expected}")]
    InvalidNodeType {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Operator {operator} expects {expected} operand(s), found {found}")]
    InvalidArity {
        operator: Operator,
        expected: usize,
        found: usize,
    },

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Graph has no root node")]
    MissingRoot,
}

pub type GraphResult<T> = Result<T, GraphError>;
