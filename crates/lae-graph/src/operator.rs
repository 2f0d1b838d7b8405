// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Matrix operators and their textual tokens

use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

/// Operation applied by an interior graph node
///
/// | Token | Operator    | Operands |
/// |-------|-------------|----------|
/// | `+`   | `Add`       | 2        |
/// | `*`   | `Multiply`  | 2        |
/// | `-`   | `Negate`    | 1        |
/// | `T`   | `Transpose` | 1        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Multiply,
    Negate,
    Transpose,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Multiply,
        Operator::Negate,
        Operator::Transpose,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Multiply => "*",
            Operator::Negate => "-",
            Operator::Transpose => "T",
        }
    }

    /// Number of operands the engine computes with
    pub fn arity(self) -> usize {
        match self {
            Operator::Add | Operator::Multiply => 2,
            Operator::Negate | Operator::Transpose => 1,
        }
    }

    /// Whether `op(a, b, c)` may be rewritten as `op(op(a, b), c)`
    pub fn is_left_foldable(self) -> bool {
        self.arity() == 2
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or_else(|| GraphError::UnsupportedOperator(s.to_string()))
    }
}
