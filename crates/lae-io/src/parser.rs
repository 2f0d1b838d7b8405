// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! JSON expression parser

use std::fs;
use std::path::Path;

use lae_graph::{ComputationGraph, NodeId};
use ndarray::Array2;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{malformed, IoError, IoResult};

/// Parse an expression file into a graph rooted at the top-level node
pub fn parse_file(path: impl AsRef<Path>) -> IoResult<ComputationGraph> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_str(&input)?;
    debug!(path = %path.display(), nodes = graph.node_count(), "Parsed expression file");
    Ok(graph)
}

/// Parse an expression document
///
/// Multi-operand operations are kept as written; call
/// [`ComputationGraph::normalize`] before reducing.
pub fn parse_str(input: &str) -> IoResult<ComputationGraph> {
    let document: Value = serde_json::from_str(input)?;
    let mut graph = ComputationGraph::new();
    let root = build_node(&mut graph, &document, "$")?;
    graph.set_root(root)?;
    Ok(graph)
}

fn build_node(graph: &mut ComputationGraph, value: &Value, location: &str) -> IoResult<NodeId> {
    match value {
        Value::Array(rows) => Ok(graph.literal(parse_literal(rows, location)?)),
        Value::Object(fields) => build_operation(graph, fields, location),
        other => Err(malformed(
            location,
            format!(
                "expected a matrix or an operation, found {}",
                json_kind(other)
            ),
        )),
    }
}

fn build_operation(
    graph: &mut ComputationGraph,
    fields: &Map<String, Value>,
    location: &str,
) -> IoResult<NodeId> {
    let token = fields
        .get("operator")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(location, "missing string field \"operator\""))?;
    let operands = fields
        .get("operands")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(location, "missing array field \"operands\""))?;

    let mut children = Vec::with_capacity(operands.len());
    for (index, operand) in operands.iter().enumerate() {
        let child_location = format!("{}.operands[{}]", location, index);
        children.push(build_node(graph, operand, &child_location)?);
    }
    Ok(graph.operation(token, children)?)
}

fn parse_literal(rows: &[Value], location: &str) -> IoResult<Array2<f64>> {
    if rows.is_empty() {
        return Err(malformed(location, "matrix has no rows"));
    }

    let mut width = None;
    let mut flat = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let row_location = format!("{}[{}]", location, i);
        let cells = row
            .as_array()
            .ok_or_else(|| malformed(&row_location, format!("expected a row, found {}", json_kind(row))))?;

        match width {
            None if cells.is_empty() => return Err(malformed(&row_location, "row is empty")),
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => {
                return Err(malformed(
                    &row_location,
                    format!("row has {} values, expected {}", cells.len(), w),
                ))
            }
            Some(_) => {}
        }

        for (j, cell) in cells.iter().enumerate() {
            let number = cell.as_f64().ok_or_else(|| {
                malformed(
                    &format!("{}[{}]", row_location, j),
                    format!("expected a number, found {}", json_kind(cell)),
                )
            })?;
            flat.push(number);
        }
    }

    let width = width.unwrap_or(0);
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| malformed(location, e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lae_graph::{GraphError, Node, Operator};
    use ndarray::array;

    #[test]
    fn test_parse_literal_root() {
        let graph = parse_str("[[1, 2], [3, 4.5]]").unwrap();
        assert!(graph.is_reduced());
        assert_eq!(graph.root_matrix().unwrap(), &array![[1.0, 2.0], [3.0, 4.5]]);
    }

    #[test]
    fn test_parse_nested_operation() {
        let graph = parse_str(
            r#"{"operator": "+", "operands": [
                [[1, 2]],
                {"operator": "-", "operands": [[[3, 4]]]}
            ]}"#,
        )
        .unwrap();

        let root = graph.root().unwrap();
        assert_eq!(graph.operator(root), Ok(Operator::Add));
        let children = graph.children(root).unwrap();
        assert!(graph.node(children[0]).unwrap().is_literal());
        assert_eq!(graph.operator(children[1]), Ok(Operator::Negate));
    }

    #[test]
    fn test_multi_operand_kept_until_normalized() {
        let mut graph =
            parse_str(r#"{"operator": "*", "operands": [[[1]], [[2]], [[3]]]}"#).unwrap();
        let root = graph.root().unwrap();
        assert_eq!(graph.children(root).unwrap().len(), 3);

        graph.normalize();
        assert_eq!(graph.children(root).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_operator() {
        let err = parse_str(r#"{"operator": "X", "operands": [[[1]]]}"#).unwrap_err();
        assert!(matches!(
            err,
            IoError::Graph(GraphError::UnsupportedOperator(ref token)) if token == "X"
        ));
        assert_eq!(err.to_string(), "Unsupported operator: X");
    }

    #[test]
    fn test_ragged_literal_rejected() {
        let err = parse_str("[[1, 2], [3]]").unwrap_err();
        match err {
            IoError::Malformed { location, .. } => assert_eq!(location, "$[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_literals_rejected() {
        assert!(matches!(parse_str("[]"), Err(IoError::Malformed { .. })));
        assert!(matches!(parse_str("[[]]"), Err(IoError::Malformed { .. })));
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let err = parse_str(r#"{"operator": "T", "operands": [[[1, "a"]]]}"#).unwrap_err();
        match err {
            IoError::Malformed { location, .. } => assert_eq!(location, "$.operands[0][0][1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(matches!(
            parse_str(r#"{"operands": [[[1]]]}"#),
            Err(IoError::Malformed { .. })
        ));
        assert!(matches!(
            parse_str(r#"{"operator": "-"}"#),
            Err(IoError::Malformed { .. })
        ));
        assert!(matches!(parse_str("42"), Err(IoError::Malformed { .. })));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_str("{"), Err(IoError::Json(_))));
    }

    #[test]
    fn test_arity_not_checked_at_parse_time() {
        let graph = parse_str(r#"{"operator": "+", "operands": [[[1]]]}"#).unwrap();
        let root = graph.root().unwrap();
        assert!(matches!(
            graph.node(root).unwrap(),
            Node::Operation { children, .. } if children.len() == 1
        ));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("/nonexistent/lae/input.json").unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
