// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Result file writer

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Content of an output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPayload {
    /// Row-major matrix
    Result(Vec<Vec<f64>>),
    Error(String),
}

impl OutputPayload {
    pub fn from_matrix(matrix: &Array2<f64>) -> Self {
        OutputPayload::Result(matrix.rows().into_iter().map(|row| row.to_vec()).collect())
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        OutputPayload::Error(message.into())
    }
}

/// Serialize `payload` to `path`, replacing any existing file
///
/// # Errors
/// `NonFinite` if a result cell is NaN or infinite; nothing is written then.
pub fn write(payload: &OutputPayload, path: impl AsRef<Path>, pretty: bool) -> IoResult<()> {
    let path = path.as_ref();
    if let OutputPayload::Result(rows) = payload {
        check_finite(rows)?;
    }
    let mut body = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    body.push('\n');

    fs::write(path, body).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Wrote output file");
    Ok(())
}

/// Write a successful result, pretty-printed
pub fn write_result(matrix: &Array2<f64>, path: impl AsRef<Path>) -> IoResult<()> {
    write(&OutputPayload::from_matrix(matrix), path, true)
}

/// Write an error message, pretty-printed
pub fn write_error(message: &str, path: impl AsRef<Path>) -> IoResult<()> {
    write(&OutputPayload::from_error(message), path, true)
}

fn check_finite(rows: &[Vec<f64>]) -> IoResult<()> {
    for (row, cells) in rows.iter().enumerate() {
        if let Some((column, &value)) = cells.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(IoError::NonFinite { row, column, value });
        }
    }
    Ok(())
}

/// Load a previously written output file
pub fn read_output(path: impl AsRef<Path>) -> IoResult<OutputPayload> {
    let path = path.as_ref();
    let body = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&body)?)
}
