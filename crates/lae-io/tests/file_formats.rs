// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! File-based parser and writer tests.
//!
//! These tests go through real files in a temporary directory, the way the
//! `lae` tool reads its input and writes its output.

use std::fs;

use lae_graph::Operator;
use lae_io::{parse_file, read_output, write, IoError, OutputPayload};
use ndarray::array;
use tempfile::tempdir;

#[test]
fn parses_expression_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        r#"{
            "operator": "*",
            "operands": [
                [[1, 2], [3, 4]],
                {"operator": "T", "operands": [[[5, 6], [7, 8]]]}
            ]
        }"#,
    )
    .unwrap();

    let graph = parse_file(&input).unwrap();
    let root = graph.root().unwrap();
    assert_eq!(graph.operator(root), Ok(Operator::Multiply));

    let children = graph.children(root).unwrap();
    assert_eq!(graph.matrix(children[0]).unwrap(), &array![[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(graph.operator(children[1]), Ok(Operator::Transpose));
}

#[test]
fn unknown_operator_in_file_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, r#"{"operator": "/", "operands": [[[1]], [[2]]]}"#).unwrap();

    let err = parse_file(&input).unwrap_err();
    assert!(matches!(err, IoError::Graph(_)));
    assert!(err.to_string().contains('/'));
}

#[test]
fn compact_and_pretty_outputs_agree() {
    let dir = tempdir().unwrap();
    let compact = dir.path().join("compact.json");
    let pretty = dir.path().join("pretty.json");
    let payload = OutputPayload::from_matrix(&array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);

    write(&payload, &compact, false).unwrap();
    write(&payload, &pretty, true).unwrap();

    assert_eq!(read_output(&compact).unwrap(), payload);
    assert_eq!(read_output(&pretty).unwrap(), payload);
    assert!(fs::read_to_string(&pretty).unwrap().lines().count() > 1);
}
