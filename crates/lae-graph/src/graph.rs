// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Arena-backed expression graph

use std::fmt;

use ndarray::Array2;
use tracing::{debug, trace};

use crate::error::{GraphError, GraphResult};
use crate::operator::Operator;

/// Index of a node inside its [`ComputationGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A graph node: either a literal matrix or an operator over child nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Array2<f64>),
    Operation {
        operator: Operator,
        children: Vec<NodeId>,
    },
}

impl Node {
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Literal(_) => "a literal",
            Node::Operation { .. } => "an operation",
        }
    }
}

/// Matrix expression tree with in-place reduction
///
/// Nodes are only ever added, never removed. Reducing an operation overwrites
/// its slot with the computed literal, so parents keep pointing at the same
/// [`NodeId`]. A child may be shared by several parents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputationGraph {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ComputationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a literal leaf
    pub fn literal(&mut self, data: Array2<f64>) -> NodeId {
        self.push(Node::Literal(data))
    }

    /// Add an operation from its textual token
    ///
    /// Operand count is not checked here; see [`ComputationGraph::normalize`]
    /// and the engine's reduction step.
    ///
    /// # Errors
    /// - `UnsupportedOperator` if `token` is not one of `+ * - T`
    /// - `UnknownNode` if a child id does not belong to this graph
    pub fn operation(&mut self, token: &str, children: Vec<NodeId>) -> GraphResult<NodeId> {
        let operator: Operator = token.parse()?;
        if let Some(missing) = children.iter().find(|c| c.0 >= self.nodes.len()) {
            return Err(GraphError::UnknownNode(*missing));
        }
        Ok(self.operation_of(operator, children))
    }

    /// Add an operation; `children` must be ids from this graph
    pub fn operation_of(&mut self, operator: Operator, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Operation { operator, children })
    }

    pub fn set_root(&mut self, id: NodeId) -> GraphResult<()> {
        self.node(id)?;
        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(id.0).ok_or(GraphError::UnknownNode(id))
    }

    /// Operand ids of `id`; empty for a literal
    pub fn children(&self, id: NodeId) -> GraphResult<&[NodeId]> {
        match self.node(id)? {
            Node::Literal(_) => Ok(&[]),
            Node::Operation { children, .. } => Ok(children),
        }
    }

    pub fn operator(&self, id: NodeId) -> GraphResult<Operator> {
        match self.node(id)? {
            Node::Operation { operator, .. } => Ok(*operator),
            node => Err(GraphError::InvalidNodeType {
                node: id,
                expected: "an operation",
                found: node.kind(),
            }),
        }
    }

    /// Payload of a literal node
    pub fn matrix(&self, id: NodeId) -> GraphResult<&Array2<f64>> {
        match self.node(id)? {
            Node::Literal(data) => Ok(data),
            node => Err(GraphError::InvalidNodeType {
                node: id,
                expected: "a literal",
                found: node.kind(),
            }),
        }
    }

    pub fn root_matrix(&self) -> GraphResult<&Array2<f64>> {
        let root = self.root.ok_or(GraphError::MissingRoot)?;
        self.matrix(root)
    }

    /// True once the root is a literal
    pub fn is_reduced(&self) -> bool {
        self.root
            .and_then(|root| self.nodes.get(root.0))
            .is_some_and(Node::is_literal)
    }

    /// Number of nodes in the arena, including collapsed ones
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest, leftmost operation whose operands are all literals
    ///
    /// Children are searched left to right before their parent. Returns
    /// `None` when there is no root or the root is already a literal.
    pub fn find_reducible(&self) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            let Some(Node::Operation { children, .. }) = self.nodes.get(current.0) else {
                return None;
            };
            match children.iter().find(|c| self.is_operation(**c)) {
                Some(&child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Every operation under the root in the order repeated
    /// [`find_reducible`](Self::find_reducible) calls would return them,
    /// provided each one is collapsed before the next
    ///
    /// Shared operations appear once, at their first use.
    pub fn reduction_order(&self) -> Vec<NodeId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let mut order = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            let Some(Node::Operation { children, .. }) = self.nodes.get(id.0) else {
                continue;
            };
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;
            stack.push((id, true));
            stack.extend(children.iter().rev().map(|&child| (child, false)));
        }
        order
    }

    fn is_operation(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Node::Operation { .. }))
    }

    /// Rewrite every `+` or `*` with more than two operands as a
    /// left-associated chain of binary operations
    ///
    /// `op(a, b, c, d)` becomes `op(op(op(a, b), c), d)`; the outermost
    /// operation keeps its id. Unary operators and binary nodes with two or
    /// fewer operands are untouched.
    pub fn normalize(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let before = self.nodes.len();
        let mut visited = vec![false; before];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if id.0 >= self.nodes.len() {
                continue;
            }
            if visited.len() < self.nodes.len() {
                visited.resize(self.nodes.len(), false);
            }
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;

            self.nest(id);
            if let Some(Node::Operation { children, .. }) = self.nodes.get(id.0) {
                stack.extend(children.iter().rev());
            }
        }

        debug!(
            added_nodes = self.nodes.len() - before,
            "Normalized computation graph"
        );
    }

    fn nest(&mut self, id: NodeId) {
        let (operator, children) = match self.nodes.get(id.0) {
            Some(Node::Operation { operator, children })
                if operator.is_left_foldable() && children.len() > 2 =>
            {
                (*operator, children.clone())
            }
            _ => return,
        };
        let Some((last, init)) = children.split_last() else {
            return;
        };

        let mut chain = self.operation_of(operator, vec![init[0], init[1]]);
        for &next in &init[2..] {
            chain = self.operation_of(operator, vec![chain, next]);
        }
        if let Some(Node::Operation { children, .. }) = self.nodes.get_mut(id.0) {
            *children = vec![chain, *last];
        }
        trace!(node = %id, operator = %operator, operands = init.len() + 1, "Nested operation");
    }

    /// Replace operation `id` with the literal `result`
    ///
    /// # Errors
    /// `InvalidNodeType` if `id` is already a literal.
    pub fn collapse(&mut self, id: NodeId, result: Array2<f64>) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(GraphError::UnknownNode(id))?;
        if node.is_literal() {
            return Err(GraphError::InvalidNodeType {
                node: id,
                expected: "an operation",
                found: "a literal",
            });
        }
        *node = Node::Literal(result);
        Ok(())
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}
