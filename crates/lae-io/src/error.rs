// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use lae_graph::GraphError;

/// Errors raised while reading input or writing results
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON that does not describe a valid expression
    #[error("Malformed input at {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// JSON has no encoding for NaN or infinity
    #[error("Result is not finite at row {row}, column {column}: {value}")]
    NonFinite { row: usize, column: usize, value: f64 },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type IoResult<T> = Result<T, IoError>;

pub(crate) fn malformed(location: &str, reason: impl Into<String>) -> IoError {
    IoError::Malformed {
        location: location.to_string(),
        reason: reason.into(),
    }
}
