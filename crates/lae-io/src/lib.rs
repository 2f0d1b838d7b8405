// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-io
//!
//! File formats for the `lae` tool.
//!
//! ## Input
//! A JSON document whose top-level value is a node. A node is either a
//! literal matrix (a non-empty array of equal-length numeric rows) or an
//! operation:
//!
//! ```json
//! {"operator": "+", "operands": [[[1, 2]], {"operator": "-", "operands": [[[3, 4]]]}]}
//! ```
//!
//! ## Output
//! `{"result": [[...], ...]}` on success, `{"error": "<message>"}` on failure.

pub mod error;
pub mod parser;
pub mod writer;

pub use error::{IoError, IoResult};
pub use parser::{parse_file, parse_str};
pub use writer::{read_output, write, write_error, write_result, OutputPayload};
